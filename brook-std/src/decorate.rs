//! Decoration: wrap a stream and override a subset of its operations.

use crate::dispatch::{DispatchStream, FnTable};
use brook_core::{Stream, StreamError, StreamResult};
use std::{
    cell::{Ref, RefCell, RefMut},
    io::SeekFrom,
    rc::Rc,
};

/// Wrap `stream` in a [`DispatchStream`] that forwards every operation to
/// it, except those present in `overrides`.
///
/// Nothing is buffered: seeking or reading through the decorator moves the
/// position of `stream`. Pass a [`SharedStream`](brook_core::SharedStream)
/// handle to keep observing the same stream from outside.
///
/// `close` and `detach` forward to the inner stream. After a successful
/// `detach` the decorator reports no capabilities and an unknown size.
///
/// # Example
///
/// ```rust
/// use brook_std::{FnTable, decorate, stream_for};
/// use brook_core::Stream;
///
/// let mut upper = decorate(
///     stream_for("foo"),
///     FnTable::new().to_bytes(|| Ok(b"FOO".to_vec())),
/// );
/// assert_eq!(upper.read(2).unwrap(), b"fo");
/// assert_eq!(upper.to_bytes(), b"FOO");
/// ```
pub fn decorate<S: Stream + 'static>(stream: S, overrides: FnTable) -> DispatchStream {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        inner = std::any::type_name::<S>(),
        overrides = ?overrides,
        "decorating stream"
    );

    let inner = Rc::new(RefCell::new(stream));
    DispatchStream::new(forwarding_table(&inner).merge(overrides))
}

/// One forwarding behavior per operation, all bound to `inner`.
fn forwarding_table<S: Stream + 'static>(inner: &Rc<RefCell<S>>) -> FnTable {
    let table = FnTable::new();

    let stream = Rc::clone(inner);
    let table = table.read(move |length: usize| exclusive(&stream)?.read(length));

    let stream = Rc::clone(inner);
    let table = table.write(move |data: &[u8]| exclusive(&stream)?.write(data));

    let stream = Rc::clone(inner);
    let table = table.seek(move |position: SeekFrom| exclusive(&stream)?.seek(position));

    let stream = Rc::clone(inner);
    let table = table.tell(move || exclusive(&stream)?.tell());

    let stream = Rc::clone(inner);
    let table = table.eof(move || exclusive(&stream)?.eof());

    let stream = Rc::clone(inner);
    let table = table.size(move || shared(&stream)?.size());

    let stream = Rc::clone(inner);
    let table = table.is_readable(move || shared(&stream)?.is_readable());

    let stream = Rc::clone(inner);
    let table = table.is_writable(move || shared(&stream)?.is_writable());

    let stream = Rc::clone(inner);
    let table = table.is_seekable(move || shared(&stream)?.is_seekable());

    let stream = Rc::clone(inner);
    let table = table.rewind(move || exclusive(&stream)?.rewind());

    let stream = Rc::clone(inner);
    let table = table.contents(move || exclusive(&stream)?.contents());

    let stream = Rc::clone(inner);
    let table = table.metadata(move || shared(&stream)?.metadata());

    let stream = Rc::clone(inner);
    let table = table.close(move || exclusive(&stream)?.close());

    let stream = Rc::clone(inner);
    let table = table.detach(move || exclusive(&stream)?.detach());

    let stream = Rc::clone(inner);
    table.to_bytes(move || -> StreamResult<Vec<u8>> { Ok(exclusive(&stream)?.to_bytes()) })
}

fn exclusive<S>(stream: &RefCell<S>) -> StreamResult<RefMut<'_, S>> {
    stream.try_borrow_mut().map_err(|_| StreamError::Busy)
}

fn shared<S>(stream: &RefCell<S>) -> StreamResult<Ref<'_, S>> {
    stream.try_borrow().map_err(|_| StreamError::Busy)
}
