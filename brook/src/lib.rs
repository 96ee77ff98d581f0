//! # brook - Stream Decoration Without Subclassing
//!
//! `brook` lets you build byte streams out of closures and wrap existing
//! streams while overriding only the operations you care about.
//!
//! ## Quick Start
//!
//! ```rust
//! use brook::prelude::*;
//!
//! // An ad hoc stream: every operation is a closure
//! let mut hello = DispatchStream::new(FnTable::new().read(|_| Ok(b"hello".to_vec())));
//! assert_eq!(hello.read(5).unwrap(), b"hello");
//!
//! // Override one operation of an existing stream, forward the rest
//! let mut quiet = decorate(stream_for("foo"), FnTable::new().is_writable(|| Ok(false)));
//! assert!(!quiet.is_writable().unwrap());
//! assert_eq!(quiet.read(3).unwrap(), b"foo");
//!
//! // Forbid seeking
//! let mut fixed = stream_for("bar").no_seek();
//! assert!(fixed.seek(std::io::SeekFrom::Start(1)).is_err());
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use brook_core::{
    // Resources
    BoxResource,
    // Errors
    BoxError,
    // Diagnostics
    Diagnostic,
    // Metadata
    MetaValue,
    Metadata,
    // Operations
    Operation,
    READ_CHUNK,
    Resource,
    Severity,
    // Shared handle
    SharedStream,
    // Stream contract
    Stream,
    StreamError,
    StreamResult,
    diagnostic,
};

// Dispatch and decoration
pub use brook_std::{
    Behavior, DispatchStream, FnTable, NoSeekStream, StreamExt, decorate,
    dispatch::{ActionFn, QueryFn, ReadFn, SeekFn, WriteFn},
};

// Resources
pub use brook_std::{Capabilities, IntoStream, ResourceStream, StreamOptions, stream_for};

pub use brook_core;
pub use brook_macros::decorator;

/// Standard decorators.
pub mod decorators {
    #![allow(clippy::wildcard_imports)]
    pub use brook_std::decorators::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use brook_std::testing::*;
}

/// Prelude module - common imports for Brook.
///
/// # Usage
///
/// ```rust,ignore
/// use brook::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        DispatchStream, FnTable, NoSeekStream, SharedStream, Stream, StreamError, StreamExt,
        StreamResult, decorate, stream_for,
    };
}
