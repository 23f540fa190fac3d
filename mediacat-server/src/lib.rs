//! HTTP frontend for the mediacat merge library.
//!
//! Exposes three routes: an upload form at `/`, a health probe at
//! `/health`, and the merge endpoint at `POST /merge` which accepts a
//! multipart batch and responds with the merged file.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
