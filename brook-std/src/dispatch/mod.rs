//! # Dispatch Stream
//!
//! A [`DispatchStream`] is a stream whose operations are closures looked up
//! in a [`FnTable`] at call time. It gives an ad hoc stream, or a stream that
//! overrides a few operations of another one, without writing a new type.
//!
//! # Rules
//!
//! - An operation with no behavior fails with
//!   [`StreamError::NotImplemented`].
//! - `close` without a behavior is a no-op, and the behavior fires at most
//!   once across explicit `close()` calls and the drop.
//! - `to_bytes` never fails: errors become a diagnostic and an empty result.
//! - After `detach`, capability queries report `false` and the size is
//!   unknown, whatever the table says.
//! - A dispatch stream cannot be cloned or deserialized.

mod table;

pub use table::{ActionFn, Behavior, FnTable, QueryFn, ReadFn, SeekFn, WriteFn};

use brook_core::{
    BoxResource, Metadata, Operation, Stream, StreamError, StreamResult,
    diagnostic::{Severity, report},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeStruct};
use std::io::SeekFrom;

const TYPE_NAME: &str = "DispatchStream";
const TO_BYTES_SOURCE: &str = concat!(module_path!(), "::DispatchStream::to_bytes");
const DROP_SOURCE: &str = concat!(module_path!(), "::DispatchStream::drop");

macro_rules! dispatch {
    (mut $table:expr, $variant:ident ( $($arg:expr),* )) => {
        match $table.get_mut(Operation::$variant) {
            Some(Behavior::$variant(behavior)) => behavior($($arg),*),
            _ => Err(not_implemented(Operation::$variant)),
        }
    };
    ($table:expr, $variant:ident ( $($arg:expr),* )) => {
        match $table.get(Operation::$variant) {
            Some(Behavior::$variant(behavior)) => behavior($($arg),*),
            _ => Err(not_implemented(Operation::$variant)),
        }
    };
}

fn not_implemented(operation: Operation) -> StreamError {
    #[cfg(feature = "tracing")]
    tracing::trace!(%operation, "no behavior attached");

    StreamError::NotImplemented {
        operation,
        type_name: TYPE_NAME,
    }
}

/// A stream built from a table of closures.
///
/// # Example
///
/// ```rust
/// use brook_std::{DispatchStream, FnTable};
/// use brook_core::Stream;
///
/// let mut stream = DispatchStream::new(FnTable::new().read(|length| Ok(vec![b'a'; length])));
/// assert_eq!(stream.read(2).unwrap(), b"aa");
/// assert!(stream.seek(std::io::SeekFrom::Start(0)).is_err());
/// ```
pub struct DispatchStream {
    table: FnTable,
    detached: bool,
}

impl DispatchStream {
    /// Create a stream from a behavior table.
    pub fn new(table: FnTable) -> Self {
        Self {
            table,
            detached: false,
        }
    }

    /// Create a stream from operation names.
    ///
    /// Fails with [`StreamError::InvalidConfiguration`] if a name is not a
    /// stream operation or does not match its behavior.
    pub fn from_entries<I, K>(entries: I) -> StreamResult<Self>
    where
        I: IntoIterator<Item = (K, Behavior)>,
        K: AsRef<str>,
    {
        FnTable::from_entries(entries).map(Self::new)
    }

    /// Wrap `stream`, overriding the operations present in `overrides`.
    ///
    /// See [`decorate`](crate::decorate).
    pub fn decorate<S: Stream + 'static>(stream: S, overrides: FnTable) -> Self {
        crate::decorate(stream, overrides)
    }

    /// Attach a teardown behavior to a stream that has none.
    ///
    /// Existing behaviors are never replaced; attaching a second `close`
    /// fails with [`StreamError::InvalidConfiguration`].
    pub fn attach_close(
        &mut self,
        behavior: impl FnMut() -> StreamResult<()> + 'static,
    ) -> StreamResult<()> {
        if self.table.contains(Operation::Close) {
            return Err(StreamError::InvalidConfiguration(
                "a `close` behavior is already attached".to_owned(),
            ));
        }
        self.table = std::mem::take(&mut self.table).close(behavior);
        Ok(())
    }

    /// Operations that currently have a behavior.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.table.operations()
    }

    /// The behavior table.
    pub fn table(&self) -> &FnTable {
        &self.table
    }

    /// Whether `detach` has succeeded on this stream.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn fallback_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
        if self.is_seekable()? {
            self.seek(SeekFrom::Start(0))?;
        }
        let mut buffer = Vec::new();
        loop {
            let chunk = self.read(brook_core::READ_CHUNK)?;
            if chunk.is_empty() {
                return Ok(buffer);
            }
            buffer.extend_from_slice(&chunk);
        }
    }
}

impl Stream for DispatchStream {
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
        dispatch!(mut self.table, Read(length))
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        dispatch!(mut self.table, Write(data))
    }

    fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
        dispatch!(mut self.table, Seek(position))
    }

    fn rewind(&mut self) -> StreamResult<()> {
        dispatch!(mut self.table, Rewind())
    }

    fn tell(&mut self) -> StreamResult<u64> {
        dispatch!(mut self.table, Tell())
    }

    fn eof(&mut self) -> StreamResult<bool> {
        dispatch!(mut self.table, Eof())
    }

    fn size(&self) -> StreamResult<Option<u64>> {
        if self.detached {
            return Ok(None);
        }
        dispatch!(self.table, Size())
    }

    fn is_readable(&self) -> StreamResult<bool> {
        if self.detached {
            return Ok(false);
        }
        dispatch!(self.table, IsReadable())
    }

    fn is_writable(&self) -> StreamResult<bool> {
        if self.detached {
            return Ok(false);
        }
        dispatch!(self.table, IsWritable())
    }

    fn is_seekable(&self) -> StreamResult<bool> {
        if self.detached {
            return Ok(false);
        }
        dispatch!(self.table, IsSeekable())
    }

    fn contents(&mut self) -> StreamResult<Vec<u8>> {
        dispatch!(mut self.table, Contents())
    }

    fn metadata(&self) -> StreamResult<Metadata> {
        dispatch!(self.table, Metadata())
    }

    fn close(&mut self) -> StreamResult<()> {
        match self.table.remove(Operation::Close) {
            Some(Behavior::Close(mut behavior)) => behavior(),
            _ => Ok(()),
        }
    }

    fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
        let resource = dispatch!(mut self.table, Detach())?;
        self.detached = true;
        Ok(resource)
    }

    fn try_to_bytes(&mut self) -> StreamResult<Vec<u8>> {
        match self.table.get_mut(Operation::ToBytes) {
            Some(Behavior::ToBytes(behavior)) => behavior(),
            _ => self.fallback_to_bytes(),
        }
    }

    fn to_bytes(&mut self) -> Vec<u8> {
        self.try_to_bytes().unwrap_or_else(|error| {
            report(Severity::Error, TO_BYTES_SOURCE, &error);
            Vec::new()
        })
    }
}

impl Drop for DispatchStream {
    fn drop(&mut self) {
        if !self.table.contains(Operation::Close) {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("closing dispatch stream on drop");

        if let Err(error) = self.close() {
            report(Severity::Warning, DROP_SOURCE, &error);
        }
    }
}

impl std::fmt::Debug for DispatchStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(TYPE_NAME)
            .field("operations", &self.table)
            .field("detached", &self.detached)
            .finish()
    }
}

/// Writes an inert description: the operations present and the detached flag.
impl Serialize for DispatchStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let operations: Vec<&'static str> = self.operations().map(Operation::as_str).collect();
        let mut state = serializer.serialize_struct(TYPE_NAME, 2)?;
        state.serialize_field("operations", &operations)?;
        state.serialize_field("detached", &self.detached)?;
        state.end()
    }
}

/// Always fails: closures cannot be rebuilt from data.
impl<'de> Deserialize<'de> for DispatchStream {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(de::Error::custom(StreamError::ReconstructionForbidden {
            type_name: TYPE_NAME,
        }))
    }
}
