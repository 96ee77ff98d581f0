//! Combinators available on every stream.

use crate::{
    decorators::NoSeekStream,
    dispatch::{DispatchStream, FnTable},
};
use brook_core::{SharedStream, Stream};

/// Extension methods for [`Stream`].
pub trait StreamExt: Stream + Sized {
    /// Override some operations, forwarding the rest.
    ///
    /// See [`decorate`](crate::decorate).
    fn decorate(self, overrides: FnTable) -> DispatchStream
    where
        Self: 'static,
    {
        crate::decorate(self, overrides)
    }

    /// Forbid seeking.
    fn no_seek(self) -> NoSeekStream<Self> {
        NoSeekStream::new(self)
    }

    /// Move the stream behind a cloneable handle.
    fn shared(self) -> SharedStream<Self> {
        SharedStream::new(self)
    }

    /// Box the stream.
    fn boxed(self) -> Box<dyn Stream>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<S: Stream> StreamExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_for;
    use std::io::SeekFrom;

    #[test]
    fn combinators_stack() {
        let shared = stream_for("abcdef").shared();
        let mut stream = shared
            .clone()
            .no_seek()
            .decorate(FnTable::new().tell(|| Ok(0)))
            .boxed();

        assert_eq!(stream.read(2).unwrap(), b"ab");
        assert_eq!(stream.tell().unwrap(), 0);
        assert!(!stream.is_seekable().unwrap());
        assert!(stream.seek(SeekFrom::Start(0)).is_err());

        let mut outside = shared;
        assert_eq!(outside.tell().unwrap(), 2);
    }
}
