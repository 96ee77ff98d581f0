//! Behavior tables for [`DispatchStream`](super::DispatchStream).

use brook_core::{BoxResource, Metadata, Operation, StreamError, StreamResult};
use std::{collections::BTreeMap, fmt, io::SeekFrom};

/// Behavior for `read`.
pub type ReadFn = Box<dyn FnMut(usize) -> StreamResult<Vec<u8>>>;
/// Behavior for `write`.
pub type WriteFn = Box<dyn FnMut(&[u8]) -> StreamResult<usize>>;
/// Behavior for `seek`.
pub type SeekFn = Box<dyn FnMut(SeekFrom) -> StreamResult<()>>;
/// Behavior for operations that move or inspect the position.
pub type ActionFn<T> = Box<dyn FnMut() -> StreamResult<T>>;
/// Behavior for read-only queries.
pub type QueryFn<T> = Box<dyn Fn() -> StreamResult<T>>;

/// The implementation of one stream operation.
///
/// Each variant carries a closure with exactly the signature of the
/// operation it implements, so the operation a behavior belongs to is
/// always [`Behavior::operation`].
pub enum Behavior {
    /// `read(length)`
    Read(ReadFn),
    /// `write(data)`
    Write(WriteFn),
    /// `seek(position)`
    Seek(SeekFn),
    /// `tell()`
    Tell(ActionFn<u64>),
    /// `eof()`
    Eof(ActionFn<bool>),
    /// `size()`
    Size(QueryFn<Option<u64>>),
    /// `is_readable()`
    IsReadable(QueryFn<bool>),
    /// `is_writable()`
    IsWritable(QueryFn<bool>),
    /// `is_seekable()`
    IsSeekable(QueryFn<bool>),
    /// `rewind()`
    Rewind(ActionFn<()>),
    /// `contents()`
    Contents(ActionFn<Vec<u8>>),
    /// `metadata()`
    Metadata(QueryFn<Metadata>),
    /// `close()`
    Close(ActionFn<()>),
    /// `detach()`
    Detach(ActionFn<Option<BoxResource>>),
    /// `to_bytes()`
    ToBytes(ActionFn<Vec<u8>>),
}

impl Behavior {
    /// The operation this behavior implements.
    pub fn operation(&self) -> Operation {
        match self {
            Behavior::Read(_) => Operation::Read,
            Behavior::Write(_) => Operation::Write,
            Behavior::Seek(_) => Operation::Seek,
            Behavior::Tell(_) => Operation::Tell,
            Behavior::Eof(_) => Operation::Eof,
            Behavior::Size(_) => Operation::Size,
            Behavior::IsReadable(_) => Operation::IsReadable,
            Behavior::IsWritable(_) => Operation::IsWritable,
            Behavior::IsSeekable(_) => Operation::IsSeekable,
            Behavior::Rewind(_) => Operation::Rewind,
            Behavior::Contents(_) => Operation::Contents,
            Behavior::Metadata(_) => Operation::Metadata,
            Behavior::Close(_) => Operation::Close,
            Behavior::Detach(_) => Operation::Detach,
            Behavior::ToBytes(_) => Operation::ToBytes,
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Behavior").field(&self.operation()).finish()
    }
}

/// A mapping from [`Operation`] to [`Behavior`].
///
/// Built either with the typed builder methods, which cannot produce an
/// invalid table:
///
/// ```rust
/// use brook_std::FnTable;
///
/// let table = FnTable::new()
///     .read(|length| Ok(vec![b'x'; length]))
///     .is_readable(|| Ok(true));
/// assert_eq!(table.len(), 2);
/// ```
///
/// or from operation names, which are validated:
///
/// ```rust
/// use brook_std::{Behavior, FnTable};
///
/// let err = FnTable::from_entries([("__toString", Behavior::ToBytes(Box::new(|| Ok(vec![]))))])
///     .unwrap_err();
/// assert!(err.to_string().contains("__toString"));
/// ```
#[derive(Default)]
pub struct FnTable {
    entries: BTreeMap<Operation, Behavior>,
}

macro_rules! builder {
    ($( $(#[$doc:meta])* $method:ident => $variant:ident ( $($bound:tt)+ ) ),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(self, behavior: impl $($bound)+ + 'static) -> Self {
                self.with(Behavior::$variant(Box::new(behavior)))
            }
        )*
    };
}

impl FnTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from operation names.
    ///
    /// Fails with [`StreamError::InvalidConfiguration`] naming the first
    /// unknown or mismatched key.
    pub fn from_entries<I, K>(entries: I) -> StreamResult<Self>
    where
        I: IntoIterator<Item = (K, Behavior)>,
        K: AsRef<str>,
    {
        let mut table = Self::new();
        for (name, behavior) in entries {
            table.insert(name.as_ref(), behavior)?;
        }
        Ok(table)
    }

    /// Insert a behavior under an operation name.
    ///
    /// Returns the behavior previously stored for that operation.
    pub fn insert(&mut self, name: &str, behavior: Behavior) -> StreamResult<Option<Behavior>> {
        let operation: Operation = name.parse()?;
        if behavior.operation() != operation {
            return Err(StreamError::InvalidConfiguration(format!(
                "behavior for `{}` supplied under `{name}`",
                behavior.operation()
            )));
        }
        Ok(self.entries.insert(operation, behavior))
    }

    /// Builder-style insert of a typed behavior.
    pub fn with(mut self, behavior: Behavior) -> Self {
        self.entries.insert(behavior.operation(), behavior);
        self
    }

    builder! {
        /// Set the `read` behavior.
        read => Read(FnMut(usize) -> StreamResult<Vec<u8>>),
        /// Set the `write` behavior.
        write => Write(FnMut(&[u8]) -> StreamResult<usize>),
        /// Set the `seek` behavior.
        seek => Seek(FnMut(SeekFrom) -> StreamResult<()>),
        /// Set the `tell` behavior.
        tell => Tell(FnMut() -> StreamResult<u64>),
        /// Set the `eof` behavior.
        eof => Eof(FnMut() -> StreamResult<bool>),
        /// Set the `size` behavior.
        size => Size(Fn() -> StreamResult<Option<u64>>),
        /// Set the `is_readable` behavior.
        is_readable => IsReadable(Fn() -> StreamResult<bool>),
        /// Set the `is_writable` behavior.
        is_writable => IsWritable(Fn() -> StreamResult<bool>),
        /// Set the `is_seekable` behavior.
        is_seekable => IsSeekable(Fn() -> StreamResult<bool>),
        /// Set the `rewind` behavior.
        rewind => Rewind(FnMut() -> StreamResult<()>),
        /// Set the `contents` behavior.
        contents => Contents(FnMut() -> StreamResult<Vec<u8>>),
        /// Set the `metadata` behavior.
        metadata => Metadata(Fn() -> StreamResult<Metadata>),
        /// Set the `close` behavior.
        close => Close(FnMut() -> StreamResult<()>),
        /// Set the `detach` behavior.
        detach => Detach(FnMut() -> StreamResult<Option<BoxResource>>),
        /// Set the `to_bytes` behavior.
        to_bytes => ToBytes(FnMut() -> StreamResult<Vec<u8>>),
    }

    /// Overlay `overrides` on this table; `overrides` wins on collision.
    pub fn merge(mut self, overrides: FnTable) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Whether the table has a behavior for `operation`.
    pub fn contains(&self, operation: Operation) -> bool {
        self.entries.contains_key(&operation)
    }

    /// Remove the behavior for `operation`.
    pub fn remove(&mut self, operation: Operation) -> Option<Behavior> {
        self.entries.remove(&operation)
    }

    /// Operations with a behavior, in [`Operation::ALL`] order.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries.keys().copied()
    }

    /// Number of behaviors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get(&self, operation: Operation) -> Option<&Behavior> {
        self.entries.get(&operation)
    }

    pub(crate) fn get_mut(&mut self, operation: Operation) -> Option<&mut Behavior> {
        self.entries.get_mut(&operation)
    }
}

impl fmt::Debug for FnTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.operations()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keys_follow_behavior() {
        let table = FnTable::new().seek(|_| Ok(())).close(|| Ok(()));
        let ops: Vec<_> = table.operations().collect();
        assert_eq!(ops, [Operation::Seek, Operation::Close]);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = FnTable::from_entries([("flush", Behavior::Close(Box::new(|| Ok(()))))])
            .unwrap_err();
        assert!(matches!(err, StreamError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("`flush`"));
    }

    #[test]
    fn mismatched_behavior_is_rejected() {
        let mut table = FnTable::new();
        let err = table
            .insert("read", Behavior::Tell(Box::new(|| Ok(0))))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid stream configuration: behavior for `tell` supplied under `read`"
        );
        assert!(table.is_empty());
    }

    #[test]
    fn insert_returns_previous_behavior() {
        let mut table = FnTable::new().tell(|| Ok(1));
        let previous = table
            .insert("tell", Behavior::Tell(Box::new(|| Ok(2))))
            .unwrap();
        assert_eq!(previous.map(|b| b.operation()), Some(Operation::Tell));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = FnTable::new().tell(|| Ok(1)).eof(|| Ok(false));
        let mut merged = base.merge(FnTable::new().tell(|| Ok(7)));
        assert_eq!(merged.len(), 2);
        match merged.get_mut(Operation::Tell) {
            Some(Behavior::Tell(tell)) => assert_eq!(tell().unwrap(), 7),
            other => panic!("unexpected entry: {other:?}"),
        }
    }
}
