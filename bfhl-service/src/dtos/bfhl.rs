use crate::config::IdentityConfig;
use crate::services::{Classification, FileVerdict};
use serde::Serialize;
use serde_json::{Map, Value};

/// Parsed `POST /bfhl` body. Fields stay untyped until validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BfhlRequest {
    pub data: Option<Value>,
    pub file_b64: Option<Value>,
}

impl BfhlRequest {
    /// Picks the known fields out of a JSON body. Non-object bodies carry no fields.
    pub fn from_json(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self::from_map(&mut fields),
            _ => Self::default(),
        }
    }

    fn from_map(fields: &mut Map<String, Value>) -> Self {
        Self {
            data: fields.remove("data"),
            file_b64: fields.remove("file_b64"),
        }
    }

    /// The attachment, if present as a string.
    pub fn file_b64(&self) -> Option<&str> {
        self.file_b64.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Serialize)]
pub struct OperationCodeResponse {
    pub operation_code: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BfhlResponse {
    pub is_success: bool,
    pub user_id: String,
    pub email: String,
    pub roll_number: String,
    pub numbers: Vec<Value>,
    pub alphabets: Vec<String>,
    pub highest_lowercase_alphabet: Vec<String>,
    pub is_prime_found: bool,
    pub file_valid: bool,
    pub file_mime_type: Option<String>,
    pub file_size_kb: Option<u64>,
}

impl BfhlResponse {
    pub fn new(
        identity: &IdentityConfig,
        classification: Classification,
        file: Option<FileVerdict>,
    ) -> Self {
        let (file_valid, file_mime_type, file_size_kb) = match file {
            Some(FileVerdict::Valid { mime_type, size_kb }) => {
                (true, Some(mime_type), Some(size_kb))
            }
            Some(FileVerdict::Invalid) | None => (false, None, None),
        };

        Self {
            is_success: true,
            user_id: identity.user_id.clone(),
            email: identity.email.clone(),
            roll_number: identity.roll_number.clone(),
            numbers: classification.numbers,
            alphabets: classification.alphabets,
            highest_lowercase_alphabet: classification
                .highest_lowercase
                .map(|c| c.to_string())
                .into_iter()
                .collect(),
            is_prime_found: classification.is_prime_found,
            file_valid,
            file_mime_type,
            file_size_kb,
        }
    }
}
