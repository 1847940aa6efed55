//! Shared response envelope types for JSON handlers.
//!
//! JSON endpoints under `/api/v1` use a `{ "data": ... }` envelope. The
//! autocomplete endpoint keeps the bare array its front-end script expects.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
