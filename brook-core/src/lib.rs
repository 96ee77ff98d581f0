//! # brook-core
//!
//! Core traits for the Brook stream decoration toolkit.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! crates that implement or consume streams without needing the dispatch and
//! decorator machinery of `brook-std`.
//!
//! # Contents
//!
//! - [`Stream`]: the capability contract (read, write, seek, size, metadata,
//!   lifecycle, infallible byte conversion)
//! - [`Operation`]: the closed set of operation names used to key behavior
//!   tables
//! - [`SharedStream`]: a cloneable handle for streams observed from several
//!   places at once
//! - [`diagnostic`]: recording of failures that must not propagate
//!
//! # Error Types
//!
//! - [`StreamError`] - Every stream failure
//! - [`BoxError`] - Errors raised by user behaviors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod diagnostic;
mod error;
mod metadata;
mod operation;
mod shared;
mod stream;

// Re-exports
pub use diagnostic::{Diagnostic, Severity};
pub use error::{BoxError, StreamError, StreamResult};
pub use metadata::{MetaValue, Metadata};
pub use operation::Operation;
pub use shared::SharedStream;
pub use stream::{BoxResource, READ_CHUNK, Resource, Stream};
