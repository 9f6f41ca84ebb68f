// API 处理器

pub mod directory;
pub mod file;
pub mod health;
pub mod upload;

pub use directory::{create_directory, list_directories};
pub use file::{delete_file, list_files};
pub use health::health_check;
pub use upload::upload_file;
