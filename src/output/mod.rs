//! Output formatting and response generation.

mod redaction;
mod response;

pub use redaction::redact_secrets;
pub use response::{ParseResponse, format_error, format_response};
