use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};
use service_core::error::AppError;

use crate::dtos::BfhlRequest;

/// Highest `data[N]` index still read as a list position.
const MAX_FORM_INDEX: usize = 20;

/// `POST /bfhl` body extractor.
///
/// Accepts JSON, url-encoded forms and multipart text fields. Form arrays use
/// `data[]=..` or `data[N]=..` keys; a repeated plain `data` key also builds a
/// list. Bodies in any other format carry no fields. Unparseable bodies and
/// multipart file parts are rejected as invalid input.
#[derive(Debug, Clone)]
pub struct BfhlPayload(pub BfhlRequest);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
    Other,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let essence = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match essence.as_str() {
            "application/json" => BodyKind::Json,
            "application/x-www-form-urlencoded" => BodyKind::Form,
            "multipart/form-data" => BodyKind::Multipart,
            other if other.ends_with("+json") => BodyKind::Json,
            _ => BodyKind::Other,
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for BfhlPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request = match BodyKind::from_headers(req.headers()) {
            BodyKind::Json => {
                let body = Bytes::from_request(req, state).await.map_err(|e| {
                    tracing::debug!(error = %e, "Failed to read request body");
                    AppError::InvalidInput
                })?;
                let value: Value = serde_json::from_slice(&body).map_err(|e| {
                    tracing::debug!(error = %e, "Malformed JSON body");
                    AppError::InvalidInput
                })?;
                BfhlRequest::from_json(value)
            }
            BodyKind::Form => {
                let body = Bytes::from_request(req, state).await.map_err(|e| {
                    tracing::debug!(error = %e, "Failed to read request body");
                    AppError::InvalidInput
                })?;
                let pairs: Vec<(String, String)> =
                    serde_urlencoded::from_bytes(&body).map_err(|e| {
                        tracing::debug!(error = %e, "Malformed form body");
                        AppError::InvalidInput
                    })?;

                let mut fields = FormFields::default();
                for (key, value) in pairs {
                    fields.push(&key, value);
                }
                fields.into_request()
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                    tracing::debug!(error = %e, "Malformed multipart body");
                    AppError::InvalidInput
                })?;
                read_multipart(multipart).await?
            }
            BodyKind::Other => BfhlRequest::default(),
        };

        Ok(BfhlPayload(request))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<BfhlRequest, AppError> {
    let mut fields = FormFields::default();

    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read multipart field");
            AppError::InvalidInput
        })?;
        let Some(field) = field else {
            break;
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            tracing::debug!(field = %name, "Rejecting unexpected file part");
            return Err(AppError::InvalidInput);
        }

        let value = field.text().await.map_err(|e| {
            tracing::debug!(error = %e, field = %name, "Failed to read multipart text");
            AppError::InvalidInput
        })?;
        fields.push(&name, value);
    }

    Ok(fields.into_request())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataKey {
    /// `data`
    Plain,
    /// `data[]`
    Append,
    /// `data[3]`
    Index(usize),
    /// `data[name]`
    Named,
}

impl DataKey {
    fn parse(key: &str) -> Option<Self> {
        let rest = key.strip_prefix("data")?;
        if rest.is_empty() {
            return Some(DataKey::Plain);
        }

        let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
        if inner.is_empty() {
            Some(DataKey::Append)
        } else if let Ok(index) = inner.parse::<usize>() {
            Some(DataKey::Index(index))
        } else {
            Some(DataKey::Named)
        }
    }
}

/// Flat key/value pairs folded into request fields.
#[derive(Debug, Default)]
struct FormFields {
    data: Vec<(DataKey, String)>,
    file_b64: Vec<String>,
}

impl FormFields {
    fn push(&mut self, key: &str, value: String) {
        if key == "file_b64" {
            self.file_b64.push(value);
        } else if let Some(data_key) = DataKey::parse(key) {
            self.data.push((data_key, value));
        }
    }

    fn into_request(self) -> BfhlRequest {
        BfhlRequest {
            data: Self::data_value(self.data),
            file_b64: match self.file_b64.len() {
                0 => None,
                1 => self.file_b64.into_iter().next().map(Value::String),
                _ => Some(Value::Array(
                    self.file_b64.into_iter().map(Value::String).collect(),
                )),
            },
        }
    }

    fn data_value(mut entries: Vec<(DataKey, String)>) -> Option<Value> {
        if entries.is_empty() {
            return None;
        }

        let keyed = entries.iter().any(|(key, _)| match key {
            DataKey::Named => true,
            DataKey::Index(i) => *i > MAX_FORM_INDEX,
            _ => false,
        });
        if keyed {
            return Some(Value::Object(Map::new()));
        }

        if entries.len() == 1 && entries[0].0 == DataKey::Plain {
            return entries.pop().map(|(_, value)| Value::String(value));
        }

        if entries
            .iter()
            .all(|(key, _)| matches!(key, DataKey::Index(_)))
        {
            entries.sort_by_key(|(key, _)| match key {
                DataKey::Index(i) => *i,
                _ => 0,
            });
        }

        Some(Value::Array(
            entries
                .into_iter()
                .map(|(_, value)| Value::String(value))
                .collect(),
        ))
    }
}
