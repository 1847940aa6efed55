//! DCI gateway web server library.
//!
//! Exposes config, state, error handling, routes and views so integration
//! tests and the binary entrypoint build the same application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod views;
