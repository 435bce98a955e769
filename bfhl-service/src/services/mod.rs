pub mod classifier;
pub mod file_validator;

pub use classifier::{classify_items, Classification, ItemKind};
pub use file_validator::{is_base64, FileVerdict, ALLOWED_MIME_TYPES};
