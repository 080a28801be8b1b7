pub mod crop_batch_use_case;
pub mod crop_image_use_case;
