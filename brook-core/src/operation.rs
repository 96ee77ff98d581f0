//! The closed set of stream operation names.

use crate::error::StreamError;
use std::{fmt, str::FromStr};

/// Name of a dispatchable [`Stream`](crate::Stream) operation.
///
/// The set is closed: behavior tables are keyed by this enum, and the
/// string forms accepted by [`FromStr`] are exactly the names returned by
/// [`Operation::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// `read(length)`
    Read,
    /// `write(data)`
    Write,
    /// `seek(position)`
    Seek,
    /// `tell()`
    Tell,
    /// `eof()`
    Eof,
    /// `size()`
    Size,
    /// `is_readable()`
    IsReadable,
    /// `is_writable()`
    IsWritable,
    /// `is_seekable()`
    IsSeekable,
    /// `rewind()`
    Rewind,
    /// `contents()`
    Contents,
    /// `metadata()`
    Metadata,
    /// `close()`
    Close,
    /// `detach()`
    Detach,
    /// `to_bytes()`
    ToBytes,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 15] = [
        Operation::Read,
        Operation::Write,
        Operation::Seek,
        Operation::Tell,
        Operation::Eof,
        Operation::Size,
        Operation::IsReadable,
        Operation::IsWritable,
        Operation::IsSeekable,
        Operation::Rewind,
        Operation::Contents,
        Operation::Metadata,
        Operation::Close,
        Operation::Detach,
        Operation::ToBytes,
    ];

    /// The method name of this operation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Seek => "seek",
            Operation::Tell => "tell",
            Operation::Eof => "eof",
            Operation::Size => "size",
            Operation::IsReadable => "is_readable",
            Operation::IsWritable => "is_writable",
            Operation::IsSeekable => "is_seekable",
            Operation::Rewind => "rewind",
            Operation::Contents => "contents",
            Operation::Metadata => "metadata",
            Operation::Close => "close",
            Operation::Detach => "detach",
            Operation::ToBytes => "to_bytes",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = StreamError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| {
                StreamError::InvalidConfiguration(format!("unknown stream operation `{name}`"))
            })
    }
}
