pub mod bfhl;

pub use bfhl::{classify, operation_code};
