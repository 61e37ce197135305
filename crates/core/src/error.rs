/// Domain-level error shared by every crate in the workspace.
///
/// HTTP mapping lives in `folio_api::error::AppError`; nothing here knows
/// about status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
