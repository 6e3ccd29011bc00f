//! Image upload: client-side uploader widget and the proxy endpoint that
//! stores images and serves them back.

pub mod naming;
pub mod server;
pub mod uploader;
pub mod validate;

pub use naming::stored_file_name;
pub use server::{ServerConfig, UploadResponse, build_router, start_server};
pub use uploader::{HttpImageSink, ImageFile, ImageSink, ImageUploader};
pub use validate::{is_image_type, validate_image};
