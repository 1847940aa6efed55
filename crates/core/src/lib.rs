//! Domain logic for the chemical identifier gateway.
//!
//! Pure code only: no database, no subprocesses, no HTTP. Shared by the API
//! server, the conversion backends, and the batch job executable.

pub mod conversion;
pub mod encoding;
pub mod error;
pub mod inchi;
pub mod search;
pub mod types;
