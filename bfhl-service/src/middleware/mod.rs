pub mod payload;

pub use payload::BfhlPayload;
