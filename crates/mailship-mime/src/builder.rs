//! MIME message assembly.
//!
//! [`MessageBuilder`] collects the structured fields of an email and
//! serializes them into a complete RFC 5322 byte stream: header block,
//! then a single body, a `multipart/alternative` group when both body
//! renderings are present, and an outer `multipart/mixed` group when
//! attachments are included.

use crate::body::Attachment;
use crate::boundary::generate_boundary;
use crate::content_type::ContentType;
use crate::encoding::{encode_base64_wrapped, encode_rfc2047};
use crate::error::Result;
use crate::header::{Headers, sanitize_header_value};
use chrono::{DateTime, Utc};

/// Builder for a complete outgoing MIME message.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: String,
    from_name: String,
    reply_to: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    subject: String,
    text: Option<Vec<u8>>,
    html: Option<Vec<u8>>,
    attachments: Vec<Attachment>,
    include_bcc_header: bool,
    date: Option<DateTime<Utc>>,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender address.
    #[must_use]
    pub fn from(mut self, addr: impl Into<String>) -> Self {
        self.from = addr.into();
        self
    }

    /// Sets the sender display name.
    #[must_use]
    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = name.into();
        self
    }

    /// Sets the Reply-To address.
    #[must_use]
    pub fn reply_to(mut self, addr: impl Into<String>) -> Self {
        self.reply_to = Some(addr.into());
        self
    }

    /// Adds a To recipient.
    #[must_use]
    pub fn to(mut self, addr: impl Into<String>) -> Self {
        self.to.push(addr.into());
        self
    }

    /// Adds a Cc recipient.
    #[must_use]
    pub fn cc(mut self, addr: impl Into<String>) -> Self {
        self.cc.push(addr.into());
        self
    }

    /// Adds a Bcc recipient.
    ///
    /// Bcc addresses are envelope-only: they never appear in the rendered
    /// headers unless [`Self::include_bcc_header`] is enabled.
    #[must_use]
    pub fn bcc(mut self, addr: impl Into<String>) -> Self {
        self.bcc.push(addr.into());
        self
    }

    /// Sets the subject line.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn text_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.html = Some(body.into());
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Controls whether Bcc recipients are written into the header block.
    #[must_use]
    pub fn include_bcc_header(mut self, include: bool) -> Self {
        self.include_bcc_header = include;
        self
    }

    /// Pins the Date header instead of using the current time.
    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Serializes the message into its wire form.
    ///
    /// An email with neither body nor attachments is legal and produces an
    /// empty `text/plain` message.
    ///
    /// # Errors
    ///
    /// Returns an error if a header value cannot be encoded.
    pub fn build(self) -> Result<Vec<u8>> {
        let mut headers = Headers::new();
        headers.push("From", format_sender(&self.from_name, &self.from)?);
        if let Some(reply_to) = &self.reply_to {
            headers.push("Reply-To", reply_to.clone());
        }
        if !self.to.is_empty() {
            headers.push("To", self.to.join(", "));
        }
        if !self.cc.is_empty() {
            headers.push("Cc", self.cc.join(", "));
        }
        if self.include_bcc_header && !self.bcc.is_empty() {
            headers.push("Bcc", self.bcc.join(", "));
        }
        headers.push(
            "Subject",
            encode_rfc2047(&sanitize_header_value(&self.subject), "utf-8")?,
        );
        headers.push("Date", self.date.unwrap_or_else(Utc::now).to_rfc2822());
        headers.push("MIME-Version", "1.0");

        let mut out = Vec::new();

        if self.attachments.is_empty() {
            match (&self.text, &self.html) {
                (Some(text), Some(html)) => {
                    let boundary = generate_boundary();
                    headers.push(
                        "Content-Type",
                        ContentType::multipart_alternative(&boundary).to_string(),
                    );
                    write_header_block(&mut out, &headers);
                    write_alternative(&mut out, &boundary, text, html);
                }
                (text, html) => {
                    let (content_type, body) = single_part(text.as_deref(), html.as_deref());
                    headers.push("Content-Type", content_type.to_string());
                    write_header_block(&mut out, &headers);
                    out.extend_from_slice(body);
                }
            }
        } else {
            let mixed = generate_boundary();
            headers.push("Content-Type", ContentType::multipart_mixed(&mixed).to_string());
            write_header_block(&mut out, &headers);

            match (&self.text, &self.html) {
                (Some(text), Some(html)) => {
                    let alternative = generate_boundary();
                    let mut group = Headers::new();
                    group.push(
                        "Content-Type",
                        ContentType::multipart_alternative(&alternative).to_string(),
                    );
                    open_part(&mut out, &mixed, &group);
                    write_alternative(&mut out, &alternative, text, html);
                }
                (None, None) => {}
                (text, html) => {
                    let (content_type, body) = single_part(text.as_deref(), html.as_deref());
                    write_text_part(&mut out, &mixed, &content_type, body);
                }
            }

            for attachment in &self.attachments {
                write_attachment(&mut out, &mixed, attachment);
            }
            close_group(&mut out, &mixed);
        }

        Ok(out)
    }
}

/// Formats the From header value, display-name form when a name is set.
fn format_sender(name: &str, addr: &str) -> Result<String> {
    if name.is_empty() {
        return Ok(addr.to_string());
    }
    let encoded = encode_rfc2047(&sanitize_header_value(name), "utf-8")?;
    Ok(format!("{encoded} <{addr}>"))
}

/// Picks the content type and payload for a message with at most one body.
fn single_part<'a>(text: Option<&'a [u8]>, html: Option<&'a [u8]>) -> (ContentType, &'a [u8]) {
    match (text, html) {
        (_, Some(html)) => (ContentType::text_html(), html),
        (Some(text), None) => (ContentType::text_plain(), text),
        (None, None) => (ContentType::text_plain(), &[]),
    }
}

fn write_header_block(out: &mut Vec<u8>, headers: &Headers) {
    out.extend_from_slice(headers.to_string().as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Writes a part delimiter followed by the part's own header block.
fn open_part(out: &mut Vec<u8>, boundary: &str, headers: &Headers) {
    out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    write_header_block(out, headers);
}

fn write_text_part(out: &mut Vec<u8>, boundary: &str, content_type: &ContentType, body: &[u8]) {
    let mut headers = Headers::new();
    headers.push("Content-Type", content_type.to_string());
    open_part(out, boundary, &headers);
    out.extend_from_slice(body);
    out.extend_from_slice(b"\r\n");
}

/// Writes the two-part `multipart/alternative` group, plain first so clients
/// preferring the richer rendering pick the HTML part.
fn write_alternative(out: &mut Vec<u8>, boundary: &str, text: &[u8], html: &[u8]) {
    write_text_part(out, boundary, &ContentType::text_plain(), text);
    write_text_part(out, boundary, &ContentType::text_html(), html);
    close_group(out, boundary);
}

fn write_attachment(out: &mut Vec<u8>, boundary: &str, attachment: &Attachment) {
    let filename = sanitize_header_value(&attachment.filename).replace('"', "");
    let mut headers = Headers::new();
    headers.push("Content-Type", attachment.content_type.to_string());
    headers.push(
        "Content-Disposition",
        format!("attachment; filename=\"{filename}\""),
    );
    headers.push("Content-Transfer-Encoding", "base64");
    open_part(out, boundary, &headers);
    out.extend_from_slice(encode_base64_wrapped(&attachment.data).as_bytes());
    out.extend_from_slice(b"\r\n");
}

fn close_group(out: &mut Vec<u8>, boundary: &str) {
    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
}
