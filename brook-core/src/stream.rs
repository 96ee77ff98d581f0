//! # The Stream Contract
//!
//! [`Stream`] is the capability set every Brook stream exposes: positional
//! reads and writes, seeking, size and metadata queries, lifecycle
//! operations, and a string conversion that never fails.
//!
//! The trait is object safe, so streams can be boxed, shared, and wrapped by
//! decorators that override a subset of the operations.
//!
//! # Provided Operations
//!
//! A handful of operations have default implementations built on the
//! required ones:
//!
//! - [`Stream::rewind`] seeks to the start
//! - [`Stream::contents`] drains the stream with a `read` loop
//! - [`Stream::try_to_bytes`] rewinds when seekable, then reads the contents
//! - [`Stream::to_bytes`] turns any failure of `try_to_bytes` into a
//!   diagnostic and an empty result
//!
//! Decorators that leave these alone get them routed through their own
//! overrides.

use crate::{
    diagnostic::{Severity, report},
    error::StreamResult,
    metadata::{MetaValue, Metadata},
};
use std::io::{Read, Seek, SeekFrom, Write};

/// Chunk size used by the default [`Stream::contents`] loop.
pub const READ_CHUNK: usize = 8 * 1024;

/// An underlying byte resource that a stream can hand back on `detach`.
pub trait Resource: Read + Write + Seek {}

impl<T: Read + Write + Seek> Resource for T {}

/// A detached resource.
pub type BoxResource = Box<dyn Resource>;

/// A readable, writable, seekable byte stream.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Stream`",
    label = "missing `Stream` implementation",
    note = "Implement `Stream` directly, or use `#[brook::decorator]` to forward to an inner stream."
)]
pub trait Stream {
    /// Read up to `length` bytes from the current position.
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>>;

    /// Write `data` at the current position, returning the bytes written.
    fn write(&mut self, data: &[u8]) -> StreamResult<usize>;

    /// Move the position.
    fn seek(&mut self, position: SeekFrom) -> StreamResult<()>;

    /// Seek to the start of the stream.
    fn rewind(&mut self) -> StreamResult<()> {
        self.seek(SeekFrom::Start(0))
    }

    /// The current position.
    fn tell(&mut self) -> StreamResult<u64>;

    /// Whether the position is at the end of the stream.
    fn eof(&mut self) -> StreamResult<bool>;

    /// Size in bytes, `None` when unknown.
    fn size(&self) -> StreamResult<Option<u64>>;

    /// Whether `read` is supported.
    fn is_readable(&self) -> StreamResult<bool>;

    /// Whether `write` is supported.
    fn is_writable(&self) -> StreamResult<bool>;

    /// Whether `seek` is supported.
    fn is_seekable(&self) -> StreamResult<bool>;

    /// The remaining bytes, from the current position to the end.
    fn contents(&mut self) -> StreamResult<Vec<u8>> {
        let mut buffer = Vec::new();
        loop {
            let chunk = self.read(READ_CHUNK)?;
            if chunk.is_empty() {
                break;
            }
            buffer.extend_from_slice(&chunk);
        }
        Ok(buffer)
    }

    /// Metadata describing the stream.
    fn metadata(&self) -> StreamResult<Metadata>;

    /// A single metadata entry.
    fn metadata_value(&self, key: &str) -> StreamResult<Option<MetaValue>> {
        Ok(self.metadata()?.remove(key))
    }

    /// Close the stream and release the underlying resource.
    fn close(&mut self) -> StreamResult<()>;

    /// Take the underlying resource out of the stream.
    ///
    /// The stream is unusable afterwards.
    fn detach(&mut self) -> StreamResult<Option<BoxResource>>;

    /// The whole stream as bytes: rewinds when seekable, then reads to the end.
    fn try_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
        if self.is_seekable()? {
            self.seek(SeekFrom::Start(0))?;
        }
        self.contents()
    }

    /// Infallible form of [`Stream::try_to_bytes`].
    ///
    /// A failure is reported as a [`Severity::Error`] diagnostic and an empty
    /// vector is returned.
    fn to_bytes(&mut self) -> Vec<u8> {
        match self.try_to_bytes() {
            Ok(bytes) => bytes,
            Err(error) => {
                let source = format!("{}::to_bytes", std::any::type_name::<Self>());
                report(Severity::Error, &source, &error);
                Vec::new()
            }
        }
    }
}

macro_rules! forward_stream {
    () => {
        fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
            (**self).read(length)
        }

        fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
            (**self).write(data)
        }

        fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
            (**self).seek(position)
        }

        fn rewind(&mut self) -> StreamResult<()> {
            (**self).rewind()
        }

        fn tell(&mut self) -> StreamResult<u64> {
            (**self).tell()
        }

        fn eof(&mut self) -> StreamResult<bool> {
            (**self).eof()
        }

        fn size(&self) -> StreamResult<Option<u64>> {
            (**self).size()
        }

        fn is_readable(&self) -> StreamResult<bool> {
            (**self).is_readable()
        }

        fn is_writable(&self) -> StreamResult<bool> {
            (**self).is_writable()
        }

        fn is_seekable(&self) -> StreamResult<bool> {
            (**self).is_seekable()
        }

        fn contents(&mut self) -> StreamResult<Vec<u8>> {
            (**self).contents()
        }

        fn metadata(&self) -> StreamResult<Metadata> {
            (**self).metadata()
        }

        fn metadata_value(&self, key: &str) -> StreamResult<Option<MetaValue>> {
            (**self).metadata_value(key)
        }

        fn close(&mut self) -> StreamResult<()> {
            (**self).close()
        }

        fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
            (**self).detach()
        }

        fn try_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
            (**self).try_to_bytes()
        }

        fn to_bytes(&mut self) -> Vec<u8> {
            (**self).to_bytes()
        }
    };
}

// Allow boxed and borrowed streams wherever a `Stream` is expected.
impl<S: Stream + ?Sized> Stream for Box<S> {
    forward_stream!();
}

impl<S: Stream + ?Sized> Stream for &mut S {
    forward_stream!();
}
