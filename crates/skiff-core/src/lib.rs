//! Core request/response model and host collaborator traits for Skiff.
//!
//! This crate provides the fundamental types and seams:
//! - `Request` / `Response` - intercepted traffic descriptors
//! - `Fetch` trait - the host's network primitive
//! - `ClientHub` trait - broadcast access to controlled client contexts

mod clients;
mod fetch;
mod request;
mod response;

pub use clients::*;
pub use fetch::*;
pub use request::*;
pub use response::*;
