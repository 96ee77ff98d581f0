//! # brook-std
//!
//! Standard implementations for the Brook stream decoration toolkit.
//!
//! This crate provides:
//! - **Dispatch streams**: [`DispatchStream`] built from a [`FnTable`] of closures
//! - **Decoration**: [`decorate`] to override part of an existing stream
//! - **Decorators**: [`NoSeekStream`], and the [`decorator`] attribute for writing more
//! - **Resources**: [`ResourceStream`] and the [`stream_for`] factory
//! - **Combinators**: [`StreamExt`]
//! - **Testing**: [`testing::SpyStream`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use brook_core;
pub use brook_macros::decorator;

// Modules
mod decorate;
pub mod decorators;
pub mod dispatch;
mod ext;
pub mod resource;
pub mod testing;

pub use decorate::decorate;
pub use decorators::NoSeekStream;
pub use dispatch::{Behavior, DispatchStream, FnTable};
pub use ext::StreamExt;
pub use resource::{Capabilities, IntoStream, ResourceStream, StreamOptions, stream_for};
