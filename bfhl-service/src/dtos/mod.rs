pub mod bfhl;

pub use bfhl::{BfhlRequest, BfhlResponse, OperationCodeResponse};
