//! The seek-restricting decorator.

use brook::{
    NoSeekStream, Operation, Stream, StreamError, StreamExt, stream_for, testing::SpyStream,
};
use std::io::SeekFrom;

mod common;
use common::shared;

#[test]
fn test_cannot_seek() {
    let (spy, log) = SpyStream::new(stream_for("foo"));
    let mut wrapped = NoSeekStream::new(spy);

    assert!(!wrapped.is_seekable().unwrap());

    let err = wrapped.seek(SeekFrom::Start(2)).unwrap_err();
    assert!(matches!(
        err,
        StreamError::SeekDisallowed {
            type_name: "NoSeekStream"
        }
    ));
    assert_eq!(err.to_string(), "Cannot seek a NoSeekStream");

    assert_eq!(log.count(Operation::Seek), 0);
    assert_eq!(log.count(Operation::IsSeekable), 0);
}

#[test]
fn test_to_bytes_does_not_seek() {
    let mut inner = stream_for("foo");
    inner.seek(SeekFrom::Start(1)).unwrap();

    let mut wrapped = NoSeekStream::new(&mut inner);
    assert_eq!(wrapped.to_bytes(), b"oo");
    wrapped.close().unwrap();

    assert!(!inner.is_readable().unwrap());
}

#[test]
fn test_failed_seek_keeps_position() {
    let inner = shared("abcdef");
    let mut handle = inner.clone();
    handle.seek(SeekFrom::Start(2)).unwrap();

    let mut wrapped = inner.no_seek();
    assert!(wrapped.seek(SeekFrom::Start(0)).is_err());
    assert!(wrapped.seek(SeekFrom::End(-1)).is_err());
    assert!(wrapped.rewind().is_err());

    assert_eq!(handle.tell().unwrap(), 2);
    assert_eq!(wrapped.tell().unwrap(), 2);
}

#[test]
fn test_remaining_operations_forward() {
    let inner = shared("abc");
    let mut handle = inner.clone();
    let mut wrapped = NoSeekStream::new(inner);

    assert_eq!(wrapped.read(1).unwrap(), b"a");
    assert_eq!(handle.tell().unwrap(), 1);
    assert_eq!(wrapped.write(b"Z").unwrap(), 1);
    assert_eq!(wrapped.tell().unwrap(), 2);
    assert_eq!(wrapped.size().unwrap(), Some(3));
    assert!(wrapped.is_readable().unwrap());
    assert!(wrapped.is_writable().unwrap());
    assert!(!wrapped.eof().unwrap());
    assert_eq!(wrapped.contents().unwrap(), b"c");
    assert!(wrapped.eof().unwrap());
    assert_eq!(wrapped.metadata().unwrap(), handle.metadata().unwrap());

    handle.rewind().unwrap();
    assert_eq!(handle.read(3).unwrap(), b"aZc");

    assert!(wrapped.detach().unwrap().is_some());
    assert!(!handle.is_readable().unwrap());
}

#[test]
fn test_to_bytes_on_inner_still_rewinds() {
    let mut inner = stream_for("foo");
    inner.read(2).unwrap();
    let mut wrapped = NoSeekStream::new(&mut inner);
    assert_eq!(wrapped.get_mut().to_bytes(), b"foo");
    assert_eq!(wrapped.get_ref().size().unwrap(), Some(3));
}
