//! Content model: body buffers and attachments.

use crate::content_type::ContentType;
use crate::error::Result;
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// A growable buffer holding one rendering of the message body.
///
/// A message carries up to two of these, one for the plain-text rendering and
/// one for the HTML rendering. Either may stay empty. The buffer implements
/// [`io::Write`] and [`fmt::Write`] so callers can stream content into it.
#[derive(Debug, Clone, Default)]
pub struct BodyPart {
    buf: Vec<u8>,
}

impl BodyPart {
    /// Creates an empty body buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends raw bytes to the body.
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) {
        self.buf.extend_from_slice(bytes.as_ref());
    }

    /// Replaces the body with the given content.
    pub fn set(&mut self, content: impl Into<Vec<u8>>) {
        self.buf = content.into();
    }

    /// Discards all content.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns the body content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no content has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl io::Write for BodyPart {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for BodyPart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.buf))
    }
}

/// A file attached to a message.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Filename presented to the recipient.
    pub filename: String,
    /// Declared media type of the content.
    pub content_type: ContentType,
    /// Raw attachment bytes.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from in-memory bytes.
    pub fn new(
        filename: impl Into<String>,
        content_type: ContentType,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data: data.into(),
        }
    }

    /// Creates an attachment by draining a reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn from_reader(
        filename: impl Into<String>,
        content_type: ContentType,
        mut reader: impl Read,
    ) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self {
            filename: filename.into(),
            content_type,
            data,
        })
    }

    /// Creates an attachment from a file on disk.
    ///
    /// The filename is taken from the final path component and the content is
    /// declared as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());
        let data = std::fs::read(path)?;
        Ok(Self {
            filename,
            content_type: ContentType::octet_stream(),
            data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn body_starts_empty() {
        let body = BodyPart::new();
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
    }

    #[test]
    fn body_append_accumulates() {
        let mut body = BodyPart::new();
        body.append("hello");
        body.append(b", world");
        assert_eq!(body.as_bytes(), b"hello, world");
        assert_eq!(body.len(), 12);
    }

    #[test]
    fn body_set_replaces() {
        let mut body = BodyPart::new();
        body.append("old");
        body.set("new");
        assert_eq!(body.as_bytes(), b"new");
    }

    #[test]
    fn body_io_write() {
        let mut body = BodyPart::new();
        write!(body, "{} + {}", 1, 2).unwrap();
        assert_eq!(body.as_bytes(), b"1 + 2");
    }

    #[test]
    fn body_clear() {
        let mut body = BodyPart::new();
        body.append("content");
        body.clear();
        assert!(body.is_empty());
    }

    #[test]
    fn body_display_is_lossy_text() {
        let mut body = BodyPart::new();
        body.set("visible text");
        assert_eq!(body.to_string(), "visible text");
    }

    #[test]
    fn attachment_from_file_reads_disk() {
        let path = std::env::temp_dir().join("mailship-attachment-test.bin");
        std::fs::write(&path, [7_u8, 8, 9]).unwrap();

        let att = Attachment::from_file(&path).unwrap();
        assert_eq!(att.filename, "mailship-attachment-test.bin");
        assert_eq!(att.data, vec![7, 8, 9]);
        assert_eq!(att.content_type, ContentType::octet_stream());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn attachment_from_bytes() {
        let att = Attachment::new("a.txt", ContentType::text_plain(), vec![1, 2, 3]);
        assert_eq!(att.filename, "a.txt");
        assert_eq!(att.data, vec![1, 2, 3]);
    }

    #[test]
    fn attachment_from_reader() {
        let att = Attachment::from_reader(
            "r.bin",
            ContentType::octet_stream(),
            &b"stream content"[..],
        )
        .unwrap();
        assert_eq!(att.data, b"stream content");
    }
}
