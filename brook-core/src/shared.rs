//! # Shared Stream Handle
//!
//! Provides `SharedStream<S>`, a cloneable handle to one stream.
//!
//! Every clone refers to the same stream and the same position, so a caller
//! can keep a handle while a decorator owns another one:
//!
//! ```rust
//! use brook_core::{SharedStream, Stream};
//! # use brook_core::{BoxResource, Metadata, StreamResult};
//! # use std::io::SeekFrom;
//! # struct Counter(u64);
//! # impl Stream for Counter {
//! #     fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> { self.0 += length as u64; Ok(vec![0; length]) }
//! #     fn write(&mut self, data: &[u8]) -> StreamResult<usize> { Ok(data.len()) }
//! #     fn seek(&mut self, _: SeekFrom) -> StreamResult<()> { Ok(()) }
//! #     fn tell(&mut self) -> StreamResult<u64> { Ok(self.0) }
//! #     fn eof(&mut self) -> StreamResult<bool> { Ok(false) }
//! #     fn size(&self) -> StreamResult<Option<u64>> { Ok(None) }
//! #     fn is_readable(&self) -> StreamResult<bool> { Ok(true) }
//! #     fn is_writable(&self) -> StreamResult<bool> { Ok(true) }
//! #     fn is_seekable(&self) -> StreamResult<bool> { Ok(false) }
//! #     fn metadata(&self) -> StreamResult<Metadata> { Ok(Metadata::new()) }
//! #     fn close(&mut self) -> StreamResult<()> { Ok(()) }
//! #     fn detach(&mut self) -> StreamResult<Option<BoxResource>> { Ok(None) }
//! # }
//! let mut a = SharedStream::new(Counter(0));
//! let mut b = a.clone();
//! b.read(3).unwrap();
//! assert_eq!(a.tell().unwrap(), 3);
//! ```

use crate::{
    diagnostic::{Severity, report},
    error::{StreamError, StreamResult},
    metadata::{MetaValue, Metadata},
    stream::{BoxResource, Stream},
};
use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    io::SeekFrom,
    rc::Rc,
};

/// A shared, reference-counted stream handle.
pub struct SharedStream<S: ?Sized>(Rc<RefCell<S>>);

impl<S> SharedStream<S> {
    /// Wrap a stream in a new shared handle.
    pub fn new(stream: S) -> Self {
        Self(Rc::new(RefCell::new(stream)))
    }

    /// Attempt to unwrap the stream if this is the only handle.
    ///
    /// Returns `Err(self)` if there are other handles.
    pub fn try_unwrap(self) -> Result<S, Self> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(SharedStream)
    }
}

impl<S: ?Sized> SharedStream<S> {
    /// Returns the number of handles to this stream.
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Whether two handles refer to the same stream.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Run `f` with exclusive access to the stream.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> StreamResult<R> {
        Ok(f(&mut *self.exclusive()?))
    }

    fn exclusive(&self) -> StreamResult<RefMut<'_, S>> {
        self.0.try_borrow_mut().map_err(|_| StreamError::Busy)
    }

    fn shared(&self) -> StreamResult<Ref<'_, S>> {
        self.0.try_borrow().map_err(|_| StreamError::Busy)
    }
}

impl<S: ?Sized> Clone for SharedStream<S> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<S: ?Sized> fmt::Debug for SharedStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream")
            .field("handles", &self.strong_count())
            .finish_non_exhaustive()
    }
}

impl<S: Stream + ?Sized> Stream for SharedStream<S> {
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
        self.exclusive()?.read(length)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        self.exclusive()?.write(data)
    }

    fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
        self.exclusive()?.seek(position)
    }

    fn rewind(&mut self) -> StreamResult<()> {
        self.exclusive()?.rewind()
    }

    fn tell(&mut self) -> StreamResult<u64> {
        self.exclusive()?.tell()
    }

    fn eof(&mut self) -> StreamResult<bool> {
        self.exclusive()?.eof()
    }

    fn size(&self) -> StreamResult<Option<u64>> {
        self.shared()?.size()
    }

    fn is_readable(&self) -> StreamResult<bool> {
        self.shared()?.is_readable()
    }

    fn is_writable(&self) -> StreamResult<bool> {
        self.shared()?.is_writable()
    }

    fn is_seekable(&self) -> StreamResult<bool> {
        self.shared()?.is_seekable()
    }

    fn contents(&mut self) -> StreamResult<Vec<u8>> {
        self.exclusive()?.contents()
    }

    fn metadata(&self) -> StreamResult<Metadata> {
        self.shared()?.metadata()
    }

    fn metadata_value(&self, key: &str) -> StreamResult<Option<MetaValue>> {
        self.shared()?.metadata_value(key)
    }

    fn close(&mut self) -> StreamResult<()> {
        self.exclusive()?.close()
    }

    fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
        self.exclusive()?.detach()
    }

    fn try_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
        self.exclusive()?.try_to_bytes()
    }

    fn to_bytes(&mut self) -> Vec<u8> {
        match self.exclusive() {
            Ok(mut stream) => stream.to_bytes(),
            Err(error) => {
                report(Severity::Error, "brook_core::SharedStream::to_bytes", &error);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::capture;

    /// In-memory stream over a fixed buffer.
    struct Tape {
        data: Vec<u8>,
        position: usize,
    }

    impl Tape {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                position: 0,
            }
        }
    }

    impl Stream for Tape {
        fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
            let end = (self.position + length).min(self.data.len());
            let chunk = self.data[self.position..end].to_vec();
            self.position = end;
            Ok(chunk)
        }

        fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
            self.data.extend_from_slice(data);
            Ok(data.len())
        }

        fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
            match position {
                SeekFrom::Start(offset) => self.position = offset as usize,
                _ => return Err(StreamError::Unsupported("start offsets only")),
            }
            Ok(())
        }

        fn tell(&mut self) -> StreamResult<u64> {
            Ok(self.position as u64)
        }

        fn eof(&mut self) -> StreamResult<bool> {
            Ok(self.position >= self.data.len())
        }

        fn size(&self) -> StreamResult<Option<u64>> {
            Ok(Some(self.data.len() as u64))
        }

        fn is_readable(&self) -> StreamResult<bool> {
            Ok(true)
        }

        fn is_writable(&self) -> StreamResult<bool> {
            Ok(true)
        }

        fn is_seekable(&self) -> StreamResult<bool> {
            Ok(true)
        }

        fn metadata(&self) -> StreamResult<Metadata> {
            Ok(Metadata::new())
        }

        fn close(&mut self) -> StreamResult<()> {
            Ok(())
        }

        fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
            Ok(None)
        }
    }

    #[test]
    fn clones_share_one_position() {
        let mut a = SharedStream::new(Tape::new(b"hello"));
        let mut b = a.clone();

        assert_eq!(b.read(2).unwrap(), b"he");
        assert_eq!(a.tell().unwrap(), 2);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.strong_count(), 2);
        assert!(!a.ptr_eq(&SharedStream::new(Tape::new(b"hello"))));
    }

    #[test]
    fn reentrant_access_is_busy() {
        let shared = SharedStream::new(Tape::new(b"abc"));
        let mut handle = shared.clone();

        let inner = shared.with(|_| handle.read(1)).unwrap();
        assert!(matches!(inner, Err(StreamError::Busy)));

        let mut other = shared.clone();
        let size = shared.with(|_| other.size()).unwrap();
        assert!(matches!(size, Err(StreamError::Busy)));

        assert_eq!(handle.read(1).unwrap(), b"a");
    }

    #[test]
    fn with_gives_exclusive_access() {
        let shared = SharedStream::new(Tape::new(b"abc"));
        let position = shared
            .with(|stream| -> StreamResult<u64> {
                stream.seek(SeekFrom::Start(2))?;
                stream.tell()
            })
            .unwrap()
            .unwrap();
        assert_eq!(position, 2);
    }

    #[test]
    fn busy_to_bytes_is_reported() {
        let shared = SharedStream::new(Tape::new(b"abc"));
        let mut handle = shared.clone();

        let (bytes, diagnostics) = capture(|| shared.with(|_| handle.to_bytes()).unwrap());

        assert!(bytes.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].source, "brook_core::SharedStream::to_bytes");
        assert_eq!(
            diagnostics[0].message,
            "brook_core::SharedStream::to_bytes exception: stream is busy with another operation"
        );

        assert_eq!(handle.to_bytes(), b"abc");
    }

    #[test]
    fn try_unwrap_needs_the_last_handle() {
        let shared = SharedStream::new(Tape::new(b"abc"));
        let clone = shared.clone();

        let shared = shared.try_unwrap().err().expect("a clone is still alive");
        drop(clone);

        let tape = shared.try_unwrap().map_err(|_| "still shared").unwrap();
        assert_eq!(tape.data, b"abc");
    }
}
