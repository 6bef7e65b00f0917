//! Request handlers.

pub mod delivery;
pub mod health;
pub mod index;
pub mod summaries;

pub use delivery::*;
pub use health::*;
pub use index::*;
pub use summaries::*;

use trim_models::SummaryVariant;

use crate::error::{ApiError, ApiResult};

/// Parse the `:variant` path segment; unknown names are 404.
pub(crate) fn parse_variant(raw: &str) -> ApiResult<SummaryVariant> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Unknown summary variant: {}", raw)))
}
