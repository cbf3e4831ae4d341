//! Error taxonomy for the code issuance service.
//!
//! Every failure is terminal to the single request that raised it; nothing
//! is retried internally. Verification failures and missing records are
//! expected, caller-facing outcomes; store failures are surfaced as
//! server-side errors.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller input: empty payload, non-positive size, unknown variant,
    /// missing client key.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The codec could not render the payload, e.g. the text exceeds the
    /// symbol's capacity at the requested error-correction level.
    #[error("symbol rendering failed: {0}")]
    Render(String),

    /// No symbol was found in the image, or it could not be read under
    /// best-effort decoding.
    #[error("unreadable symbol: {0}")]
    Decode(String),

    /// A freshly rendered (or logo-composited) symbol failed the
    /// readability gate. Nothing is persisted when this is raised.
    #[error("rendered symbol failed the readability check")]
    NotReadable,

    /// A decoded payload is not a well-formed URL.
    #[error("malformed url: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// The referenced record or client collection does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The backing store cancelled or failed the operation.
    #[error("store operation failed: {0}")]
    Store(String),
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidArgument(_)
            | Error::Render(_)
            | Error::Decode(_)
            | Error::MalformedUrl(_) => StatusCode::BAD_REQUEST,
            Error::NotReadable => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
