//! A Gemini capsule that fronts machine translation engines.
//!
//! All navigation state lives in the request path, so the server keeps
//! nothing between requests. See [`navigation`] for the path layout and
//! [`gateway`] for the routes.

pub mod config;
pub mod engines;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod language;
pub mod navigation;
pub mod render;
pub mod retry;
pub mod router;
