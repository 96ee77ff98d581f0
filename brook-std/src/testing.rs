//! Testing utilities for Brook.
//!
//! This module provides utilities to make testing streams and decorators easier.
//!
//! # Features
//!
//! - [`SpyStream`]: A stream wrapper that records every operation it receives
//! - [`CallLog`]: The shared record a [`SpyStream`] writes to
//! - [`failing`]: A ready-made error for behaviors that must fail

use brook_core::{
    BoxResource, MetaValue, Metadata, Operation, Stream, StreamError, StreamResult,
};
use std::{
    io::SeekFrom,
    sync::{Arc, Mutex},
};

// ============================================================================
// Call Log
// ============================================================================

/// The operations a [`SpyStream`] has received, in order.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the recorded operations.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `operation` was received.
    pub fn count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    /// Whether `operation` was received at least once.
    pub fn contains(&self, operation: Operation) -> bool {
        self.count(operation) > 0
    }

    /// Clear all recorded operations.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, operation: Operation) {
        self.calls.lock().unwrap().push(operation);
    }
}

// ============================================================================
// Spy Stream
// ============================================================================

/// A stream that forwards everything to an inner stream and records each
/// operation in a [`CallLog`].
///
/// Useful for proving that a decorator never reaches the inner stream for
/// some operation.
///
/// # Example
///
/// ```rust
/// use brook_std::{stream_for, testing::SpyStream};
/// use brook_core::{Operation, Stream};
///
/// let (mut spy, log) = SpyStream::new(stream_for("abc"));
/// spy.read(1).unwrap();
/// assert_eq!(log.calls(), [Operation::Read]);
/// ```
pub struct SpyStream<S> {
    inner: S,
    log: CallLog,
}

impl<S: Stream> SpyStream<S> {
    /// Wrap `inner`, returning the spy and its log.
    pub fn new(inner: S) -> (Self, CallLog) {
        let log = CallLog::new();
        (
            Self {
                inner,
                log: log.clone(),
            },
            log,
        )
    }

    /// Wrap `inner`, recording into an existing log.
    pub fn with_log(inner: S, log: CallLog) -> Self {
        Self { inner, log }
    }

    /// Unwrap the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Stream> Stream for SpyStream<S> {
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
        self.log.record(Operation::Read);
        self.inner.read(length)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        self.log.record(Operation::Write);
        self.inner.write(data)
    }

    fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
        self.log.record(Operation::Seek);
        self.inner.seek(position)
    }

    fn rewind(&mut self) -> StreamResult<()> {
        self.log.record(Operation::Rewind);
        self.inner.rewind()
    }

    fn tell(&mut self) -> StreamResult<u64> {
        self.log.record(Operation::Tell);
        self.inner.tell()
    }

    fn eof(&mut self) -> StreamResult<bool> {
        self.log.record(Operation::Eof);
        self.inner.eof()
    }

    fn size(&self) -> StreamResult<Option<u64>> {
        self.log.record(Operation::Size);
        self.inner.size()
    }

    fn is_readable(&self) -> StreamResult<bool> {
        self.log.record(Operation::IsReadable);
        self.inner.is_readable()
    }

    fn is_writable(&self) -> StreamResult<bool> {
        self.log.record(Operation::IsWritable);
        self.inner.is_writable()
    }

    fn is_seekable(&self) -> StreamResult<bool> {
        self.log.record(Operation::IsSeekable);
        self.inner.is_seekable()
    }

    fn contents(&mut self) -> StreamResult<Vec<u8>> {
        self.log.record(Operation::Contents);
        self.inner.contents()
    }

    fn metadata(&self) -> StreamResult<Metadata> {
        self.log.record(Operation::Metadata);
        self.inner.metadata()
    }

    fn metadata_value(&self, key: &str) -> StreamResult<Option<MetaValue>> {
        self.log.record(Operation::Metadata);
        self.inner.metadata_value(key)
    }

    fn close(&mut self) -> StreamResult<()> {
        self.log.record(Operation::Close);
        self.inner.close()
    }

    fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
        self.log.record(Operation::Detach);
        self.inner.detach()
    }

    fn try_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
        self.log.record(Operation::ToBytes);
        self.inner.try_to_bytes()
    }

    fn to_bytes(&mut self) -> Vec<u8> {
        self.log.record(Operation::ToBytes);
        self.inner.to_bytes()
    }
}

// ============================================================================
// Failing Behavior
// ============================================================================

/// A custom error carrying `message`, for behaviors that must fail.
pub fn failing(message: &str) -> StreamError {
    StreamError::custom(message.to_owned())
}
