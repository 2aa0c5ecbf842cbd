//! Core types and pure logic for the KCS lead intake service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the registration pipeline (normalize → validate → map), the admin query
//! builder, and the [`store::SubmissionStore`] trait that storage backends
//! implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod map;
pub mod normalize;
pub mod query;
pub mod store;
pub mod submission;
pub mod validate;

pub use error::{Error, Result};
