//! Resource-backed streams and the `stream_for` factory.

use bitflags::bitflags;
use brook_core::{BoxResource, MetaValue, Metadata, Resource, Stream, StreamError, StreamResult};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// URI reported by streams created from in-memory data.
pub const MEMORY_URI: &str = "brook://memory";

bitflags! {
    /// What a [`ResourceStream`] is allowed to do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// `read` is allowed.
        const READABLE = 1 << 0;
        /// `write` is allowed.
        const WRITABLE = 1 << 1;
        /// `seek` is allowed.
        const SEEKABLE = 1 << 2;
    }
}

impl Capabilities {
    /// Capabilities implied by an fopen-style mode string.
    ///
    /// `r` or `+` makes a stream readable; `w`, `a`, `x`, `c` or `+` makes
    /// it writable. Seekability is not part of the mode and must be added by
    /// the caller.
    pub fn from_mode(mode: &str) -> Self {
        let mut capabilities = Capabilities::empty();
        if mode.contains(['r', '+']) {
            capabilities |= Capabilities::READABLE;
        }
        if mode.contains(['w', 'a', 'x', 'c', '+']) {
            capabilities |= Capabilities::WRITABLE;
        }
        capabilities
    }
}

/// Construction options for a [`ResourceStream`].
#[derive(Debug, Clone)]
pub struct StreamOptions {
    mode: String,
    seekable: bool,
    size: Option<u64>,
    uri: Option<String>,
    metadata: Metadata,
}

impl StreamOptions {
    /// Options for the given mode; seekable, size measured, no uri.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            seekable: true,
            size: None,
            uri: None,
            metadata: Metadata::new(),
        }
    }

    /// Whether the stream may seek.
    pub fn seekable(mut self, seekable: bool) -> Self {
        self.seekable = seekable;
        self
    }

    /// A known size, used instead of measuring the resource.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// The uri reported in metadata.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Extra metadata reported alongside the built-in entries.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A stream over any [`Resource`].
pub struct ResourceStream {
    resource: Option<BoxResource>,
    capabilities: Capabilities,
    size: Option<u64>,
    mode: String,
    uri: Option<String>,
    custom: Metadata,
}

impl ResourceStream {
    /// Wrap `resource`, taking capabilities from `mode`.
    pub fn new(resource: impl Resource + 'static, mode: &str) -> Self {
        Self::with_options(resource, StreamOptions::new(mode))
    }

    /// Wrap `resource` with explicit options.
    pub fn with_options(resource: impl Resource + 'static, options: StreamOptions) -> Self {
        let mut capabilities = Capabilities::from_mode(&options.mode);
        if options.seekable {
            capabilities |= Capabilities::SEEKABLE;
        }

        let mut stream = Self {
            resource: Some(Box::new(resource)),
            capabilities,
            size: options.size,
            mode: options.mode,
            uri: options.uri,
            custom: options.metadata,
        };
        if stream.size.is_none() {
            stream.size = stream.measure();
        }
        stream
    }

    /// The current capabilities; empty once closed or detached.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn resource(&mut self) -> StreamResult<&mut BoxResource> {
        self.resource.as_mut().ok_or(StreamError::Detached)
    }

    /// Length of a seekable resource, leaving its position untouched.
    fn measure(&mut self) -> Option<u64> {
        if !self.capabilities.contains(Capabilities::SEEKABLE) {
            return None;
        }
        let resource = self.resource.as_mut()?;
        let position = resource.stream_position().ok()?;
        let end = resource.seek(SeekFrom::End(0)).ok()?;
        resource.seek(SeekFrom::Start(position)).ok()?;
        Some(end)
    }

    fn release(&mut self) -> Option<BoxResource> {
        self.capabilities = Capabilities::empty();
        self.size = None;
        self.resource.take()
    }
}

impl Stream for ResourceStream {
    fn read(&mut self, length: usize) -> StreamResult<Vec<u8>> {
        let readable = self.capabilities.contains(Capabilities::READABLE);
        let resource = self.resource()?;
        if !readable {
            return Err(StreamError::Unsupported("Cannot read from non-readable stream"));
        }
        let mut buffer = Vec::with_capacity(length.min(brook_core::READ_CHUNK));
        if length > 0 {
            resource.take(length as u64).read_to_end(&mut buffer)?;
        }
        Ok(buffer)
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<usize> {
        let writable = self.capabilities.contains(Capabilities::WRITABLE);
        let resource = self.resource()?;
        if !writable {
            return Err(StreamError::Unsupported("Cannot write to a non-writable stream"));
        }
        resource.write_all(data)?;
        self.size = self.measure();
        Ok(data.len())
    }

    fn seek(&mut self, position: SeekFrom) -> StreamResult<()> {
        let seekable = self.capabilities.contains(Capabilities::SEEKABLE);
        let resource = self.resource()?;
        if !seekable {
            return Err(StreamError::Unsupported("Stream is not seekable"));
        }
        resource.seek(position)?;
        Ok(())
    }

    fn tell(&mut self) -> StreamResult<u64> {
        Ok(self.resource()?.stream_position()?)
    }

    fn eof(&mut self) -> StreamResult<bool> {
        let resource = self.resource()?;
        let position = resource.stream_position()?;
        let end = resource.seek(SeekFrom::End(0))?;
        resource.seek(SeekFrom::Start(position))?;
        Ok(position >= end)
    }

    fn size(&self) -> StreamResult<Option<u64>> {
        Ok(self.size)
    }

    fn is_readable(&self) -> StreamResult<bool> {
        Ok(self.capabilities.contains(Capabilities::READABLE))
    }

    fn is_writable(&self) -> StreamResult<bool> {
        Ok(self.capabilities.contains(Capabilities::WRITABLE))
    }

    fn is_seekable(&self) -> StreamResult<bool> {
        Ok(self.capabilities.contains(Capabilities::SEEKABLE))
    }

    fn contents(&mut self) -> StreamResult<Vec<u8>> {
        let readable = self.capabilities.contains(Capabilities::READABLE);
        let resource = self.resource()?;
        if !readable {
            return Err(StreamError::Unsupported("Cannot read from non-readable stream"));
        }
        let mut buffer = Vec::new();
        resource.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn metadata(&self) -> StreamResult<Metadata> {
        if self.resource.is_none() {
            return Ok(Metadata::new());
        }
        let mut metadata = Metadata::new()
            .with("mode", self.mode.as_str())
            .with("seekable", self.capabilities.contains(Capabilities::SEEKABLE));
        if let Some(uri) = &self.uri {
            metadata.insert("uri", MetaValue::from(uri.as_str()));
        }
        metadata.extend(&self.custom);
        Ok(metadata)
    }

    fn close(&mut self) -> StreamResult<()> {
        if let Some(mut resource) = self.release() {
            resource.flush()?;
        }
        Ok(())
    }

    fn detach(&mut self) -> StreamResult<Option<BoxResource>> {
        Ok(self.release())
    }
}

impl std::fmt::Debug for ResourceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStream")
            .field("attached", &self.resource.is_some())
            .field("capabilities", &self.capabilities)
            .field("size", &self.size)
            .field("mode", &self.mode)
            .field("uri", &self.uri)
            .finish()
    }
}

/// Sources that [`stream_for`] can turn into a stream.
pub trait IntoStream {
    /// Build the stream.
    fn into_stream(self) -> ResourceStream;
}

impl IntoStream for ResourceStream {
    fn into_stream(self) -> ResourceStream {
        self
    }
}

impl IntoStream for Cursor<Vec<u8>> {
    fn into_stream(self) -> ResourceStream {
        ResourceStream::with_options(self, StreamOptions::new("r+").uri(MEMORY_URI))
    }
}

impl IntoStream for Vec<u8> {
    fn into_stream(self) -> ResourceStream {
        Cursor::new(self).into_stream()
    }
}

impl IntoStream for &[u8] {
    fn into_stream(self) -> ResourceStream {
        self.to_vec().into_stream()
    }
}

impl IntoStream for String {
    fn into_stream(self) -> ResourceStream {
        self.into_bytes().into_stream()
    }
}

impl IntoStream for &str {
    fn into_stream(self) -> ResourceStream {
        self.as_bytes().into_stream()
    }
}

/// Create a stream from in-memory data or pass an existing stream through.
///
/// In-memory sources become a readable, writable, seekable stream
/// positioned at the start.
pub fn stream_for(source: impl IntoStream) -> ResourceStream {
    source.into_stream()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_map_to_capabilities() {
        assert_eq!(Capabilities::from_mode("r"), Capabilities::READABLE);
        assert_eq!(Capabilities::from_mode("wb"), Capabilities::WRITABLE);
        assert_eq!(
            Capabilities::from_mode("r+"),
            Capabilities::READABLE | Capabilities::WRITABLE
        );
        assert_eq!(
            Capabilities::from_mode("a+"),
            Capabilities::READABLE | Capabilities::WRITABLE
        );
    }

    #[test]
    fn memory_stream_starts_at_zero() {
        let mut stream = stream_for("foo");
        assert_eq!(stream.tell().unwrap(), 0);
        assert_eq!(stream.size().unwrap(), Some(3));
        assert!(!stream.eof().unwrap());
        assert_eq!(
            stream.metadata_value("uri").unwrap(),
            Some(MetaValue::from(MEMORY_URI))
        );
    }

    #[test]
    fn read_is_bounded_by_length() {
        let mut stream = stream_for("hello");
        assert_eq!(stream.read(0).unwrap(), b"");
        assert_eq!(stream.read(2).unwrap(), b"he");
        assert_eq!(stream.read(10).unwrap(), b"llo");
        assert!(stream.eof().unwrap());
        assert_eq!(stream.read(1).unwrap(), b"");
    }

    #[test]
    fn write_updates_size() {
        let mut stream = stream_for("foo");
        stream.seek(SeekFrom::End(0)).unwrap();
        assert_eq!(stream.write(b"bar").unwrap(), 3);
        assert_eq!(stream.size().unwrap(), Some(6));
        assert_eq!(stream.tell().unwrap(), 6);
        assert_eq!(stream.to_bytes(), b"foobar");
    }

    #[test]
    fn read_only_mode_refuses_writes() {
        let mut stream = ResourceStream::new(Cursor::new(b"abc".to_vec()), "r");
        assert!(!stream.is_writable().unwrap());
        assert!(matches!(stream.write(b"x"), Err(StreamError::Unsupported(_))));
        assert_eq!(stream.read(3).unwrap(), b"abc");
    }

    #[test]
    fn unseekable_option_blocks_seek_and_size() {
        let mut stream = ResourceStream::with_options(
            Cursor::new(b"abc".to_vec()),
            StreamOptions::new("r").seekable(false),
        );
        assert_eq!(stream.size().unwrap(), None);
        assert!(matches!(
            stream.seek(SeekFrom::Start(0)),
            Err(StreamError::Unsupported(_))
        ));
        stream.read(1).unwrap();
        assert_eq!(stream.to_bytes(), b"bc");
    }

    #[test]
    fn custom_metadata_is_merged() {
        let stream = ResourceStream::with_options(
            Cursor::new(Vec::new()),
            StreamOptions::new("w+").metadata(Metadata::new().with("origin", "test")),
        );
        let metadata = stream.metadata().unwrap();
        assert_eq!(metadata.get("mode"), Some(&MetaValue::from("w+")));
        assert_eq!(metadata.get("origin"), Some(&MetaValue::from("test")));
        assert_eq!(metadata.get("seekable"), Some(&MetaValue::Bool(true)));
    }

    #[test]
    fn detach_hands_back_the_resource() {
        let mut stream = stream_for("abc");
        stream.read(1).unwrap();
        let mut resource = stream.detach().unwrap().expect("resource");
        let mut rest = String::new();
        resource.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "bc");

        assert!(stream.capabilities().is_empty());
        assert_eq!(stream.size().unwrap(), None);
        assert!(stream.metadata().unwrap().is_empty());
        assert!(matches!(stream.read(1), Err(StreamError::Detached)));
        assert!(stream.detach().unwrap().is_none());
        stream.close().unwrap();
    }

    #[test]
    fn closed_stream_is_inert() {
        let mut stream = stream_for("abc");
        stream.close().unwrap();
        assert!(!stream.is_readable().unwrap());
        assert!(matches!(stream.tell(), Err(StreamError::Detached)));
        assert!(stream.to_bytes().is_empty());
    }
}
