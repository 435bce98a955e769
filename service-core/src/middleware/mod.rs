pub mod tracing;

pub use self::tracing::{RequestId, REQUEST_ID_HEADER, http_span, request_id_middleware};
