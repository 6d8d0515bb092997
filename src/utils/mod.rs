//! Browser utilities shared by the adapters and the page shell.
//!
//! Provides:
//! - [`dom`] - window, storage and element lookups, click reading
//! - [`post_json`], [`with_deadline`] - network requests with a deadline
//! - [`log`] - `tracing` subscriber writing to the browser console

pub mod dom;
mod fetch;
pub mod log;

pub use fetch::{post_json, with_deadline};
