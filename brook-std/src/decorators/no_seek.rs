use brook_core::{Stream, StreamError, StreamResult};
use brook_macros::decorator;
use std::io::SeekFrom;

/// A decorator that forbids seeking.
///
/// `is_seekable` is always `false` and `seek` always fails with
/// [`StreamError::SeekDisallowed`]; neither ever reaches the inner stream.
/// Every other operation is forwarded unchanged, so `to_bytes` yields the
/// remaining content from the current position.
///
/// # Example
///
/// ```rust
/// use brook_std::{NoSeekStream, stream_for};
/// use brook_core::Stream;
/// use std::io::SeekFrom;
///
/// let mut inner = stream_for("foo");
/// inner.seek(SeekFrom::Start(1)).unwrap();
///
/// let mut wrapped = NoSeekStream::new(&mut inner);
/// assert!(!wrapped.is_seekable().unwrap());
/// assert!(wrapped.seek(SeekFrom::Start(0)).is_err());
/// assert_eq!(wrapped.to_bytes(), b"oo");
/// ```
#[derive(Debug)]
pub struct NoSeekStream<S> {
    inner: S,
}

impl<S: Stream> NoSeekStream<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The inner stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// The inner stream, mutably.
    ///
    /// Seeking through this reference bypasses the restriction.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[decorator(inner)]
impl<S: Stream> Stream for NoSeekStream<S> {
    fn seek(&mut self, _position: SeekFrom) -> StreamResult<()> {
        Err(StreamError::SeekDisallowed {
            type_name: "NoSeekStream",
        })
    }

    fn is_seekable(&self) -> StreamResult<bool> {
        Ok(false)
    }
}
