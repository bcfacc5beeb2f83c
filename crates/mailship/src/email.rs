//! The email facade: compose, render, and send.

use crate::error::Result;
use mailship_mime::{Attachment, BodyPart, MessageBuilder};
use mailship_smtp::{Address, Credential, SessionConfig, send_mail, validate_line};
use std::fmt;
use std::sync::Arc;

/// An email under construction.
///
/// Collects addressing, bodies, and attachments, then either delivers the
/// message over SMTP ([`Email::send`]) or hands the rendered bytes back for
/// delivery elsewhere ([`Email::render`]).
///
/// The value is not internally synchronized; concurrent sends of distinct
/// emails are independent, but a single email must not be mutated while a
/// send using it is in flight.
pub struct Email {
    subject: String,
    from_addr: String,
    from_name: String,
    reply_to: Option<String>,
    to_addrs: Vec<String>,
    cc_addrs: Vec<String>,
    bcc_addrs: Vec<String>,
    plain: BodyPart,
    html: BodyPart,
    attachments: Vec<Attachment>,
    credential: Option<Arc<dyn Credential>>,
    config: SessionConfig,
    write_bcc_header: bool,
}

impl Email {
    /// Creates an email that will deliver through the given `host:port`
    /// endpoint, authenticating with `credential` where the server offers it.
    ///
    /// `insecure_skip_verify` disables TLS certificate validation for this
    /// email's sessions; it exists for test servers and is never the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint string is malformed.
    pub fn new(
        addr: &str,
        credential: Option<Arc<dyn Credential>>,
        insecure_skip_verify: bool,
    ) -> Result<Self> {
        let config = SessionConfig::from_addr(addr)?.insecure_skip_verify(insecure_skip_verify);
        Ok(Self {
            subject: String::new(),
            from_addr: String::new(),
            from_name: String::new(),
            reply_to: None,
            to_addrs: Vec::new(),
            cc_addrs: Vec::new(),
            bcc_addrs: Vec::new(),
            plain: BodyPart::new(),
            html: BodyPart::new(),
            attachments: Vec::new(),
            credential,
            config,
            write_bcc_header: false,
        })
    }

    /// Sets the sender address.
    pub fn from(&mut self, addr: impl Into<String>) {
        self.from_addr = addr.into();
    }

    /// Sets the sender display name.
    pub fn from_name(&mut self, name: impl Into<String>) {
        self.from_name = name.into();
    }

    /// Sets the Reply-To address.
    pub fn reply_to(&mut self, addr: impl Into<String>) {
        self.reply_to = Some(addr.into());
    }

    /// Replaces the To recipient list.
    pub fn to<I>(&mut self, addrs: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.to_addrs = addrs.into_iter().map(Into::into).collect();
    }

    /// Replaces the Cc recipient list.
    pub fn cc<I>(&mut self, addrs: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.cc_addrs = addrs.into_iter().map(Into::into).collect();
    }

    /// Replaces the Bcc recipient list.
    ///
    /// Bcc recipients receive the message but are not named in its headers
    /// unless [`Email::write_bcc_header`] is enabled.
    pub fn bcc<I>(&mut self, addrs: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.bcc_addrs = addrs.into_iter().map(Into::into).collect();
    }

    /// Sets the subject line.
    pub fn subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Returns the plain-text body for writing.
    pub fn plain(&mut self) -> &mut BodyPart {
        &mut self.plain
    }

    /// Returns the HTML body for writing.
    pub fn html(&mut self) -> &mut BodyPart {
        &mut self.html
    }

    /// Adds an attachment.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Controls whether Bcc recipients are written into the headers.
    pub fn write_bcc_header(&mut self, write: bool) {
        self.write_bcc_header = write;
    }

    /// Returns the session configuration for adjustment (EHLO name, etc.).
    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Renders the message and delivers it in one SMTP session.
    ///
    /// Addresses are validated and the message is fully rendered before the
    /// connection is opened, so a malformed email causes no network traffic.
    /// The envelope recipient set is To plus Bcc; Cc addresses appear in the
    /// headers only.
    ///
    /// # Errors
    ///
    /// Returns the validation, build, or session error that stopped the send.
    pub async fn send(&self) -> Result<()> {
        let from = Address::new(&self.from_addr)?;
        if let Some(reply_to) = &self.reply_to {
            validate_line(reply_to)?;
        }
        for addr in &self.cc_addrs {
            validate_line(addr)?;
        }
        let recipients = self.envelope_recipients()?;

        let message = self.render()?;

        tracing::debug!(
            host = %self.config.host,
            recipients = recipients.len(),
            bytes = message.len(),
            "delivering message"
        );
        send_mail(
            &self.config,
            self.credential.as_deref(),
            &from,
            &recipients,
            &message,
        )
        .await?;
        Ok(())
    }

    /// Builds the envelope recipient set: To plus Bcc, in that order.
    ///
    /// Cc addresses are header-visible only and do not participate in the
    /// envelope.
    fn envelope_recipients(&self) -> Result<Vec<Address>> {
        let mut recipients = Vec::with_capacity(self.to_addrs.len() + self.bcc_addrs.len());
        for addr in self.to_addrs.iter().chain(&self.bcc_addrs) {
            recipients.push(Address::new(addr)?);
        }
        Ok(recipients)
    }

    /// Renders the message without delivering it.
    ///
    /// For callers that hand the bytes to a non-SMTP delivery channel, such
    /// as an HTTP mail API.
    ///
    /// # Errors
    ///
    /// Returns an error if message assembly fails.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut builder = MessageBuilder::new()
            .from(&self.from_addr)
            .subject(&self.subject)
            .include_bcc_header(self.write_bcc_header);

        if !self.from_name.is_empty() {
            builder = builder.from_name(&self.from_name);
        }
        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to);
        }
        for addr in &self.to_addrs {
            builder = builder.to(addr);
        }
        for addr in &self.cc_addrs {
            builder = builder.cc(addr);
        }
        for addr in &self.bcc_addrs {
            builder = builder.bcc(addr);
        }
        if !self.plain.is_empty() {
            builder = builder.text_body(self.plain.as_bytes().to_vec());
        }
        if !self.html.is_empty() {
            builder = builder.html_body(self.html.as_bytes().to_vec());
        }
        for attachment in &self.attachments {
            builder = builder.attach(attachment.clone());
        }

        Ok(builder.build()?)
    }

    /// Returns a redacted one-line description of the email state.
    ///
    /// Credentials are reduced to presence, bodies to their sizes, and
    /// attachments to their filenames; suitable for logging.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attachment_names: Vec<&str> = self
            .attachments
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        let host = format!("{}:{}", self.config.host, self.config.port);
        write!(
            f,
            "Email {{ from: {:?}, from_name: {:?}, plain: {} bytes, html: {} bytes, \
             to: {:?}, cc: {:?}, bcc: {:?}, subject: {:?}, host: {:?}, \
             attachments ({}): {:?}, credential: {} }}",
            self.from_addr,
            self.from_name,
            self.plain.len(),
            self.html.len(),
            self.to_addrs,
            self.cc_addrs,
            self.bcc_addrs,
            self.subject,
            host,
            attachment_names.len(),
            attachment_names,
            if self.credential.is_some() {
                "present"
            } else {
                "none"
            },
        )
    }
}

// The derived form would dump the credential; route Debug through the
// redacted rendering instead.
impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailship_smtp::{Error as SmtpError, Plain};

    fn email() -> Email {
        // Port 9 (discard) so an accidental connect fails fast in tests.
        let mut email = Email::new("127.0.0.1:9", None, false).unwrap();
        email.from("sender@example.com");
        email.to(["recipient@example.com"]);
        email.subject("Greetings");
        email
    }

    #[test]
    fn new_rejects_endpoint_without_port() {
        assert!(Email::new("smtp.example.com", None, false).is_err());
    }

    #[test]
    fn render_writes_core_headers() {
        let mut email = email();
        email.plain().set("hello");
        let rendered = String::from_utf8(email.render().unwrap()).unwrap();
        assert!(rendered.contains("From: sender@example.com\r\n"));
        assert!(rendered.contains("To: recipient@example.com\r\n"));
        assert!(rendered.contains("Subject: Greetings\r\n"));
        assert!(rendered.contains("\r\n\r\nhello"));
    }

    #[test]
    fn render_keeps_bcc_out_of_headers() {
        let mut email = email();
        email.bcc(["quiet@example.com"]);
        email.plain().set("hello");
        let rendered = String::from_utf8(email.render().unwrap()).unwrap();
        assert!(!rendered.contains("quiet@example.com"));

        email.write_bcc_header(true);
        let rendered = String::from_utf8(email.render().unwrap()).unwrap();
        assert!(rendered.contains("Bcc: quiet@example.com\r\n"));
    }

    #[test]
    fn envelope_is_to_plus_bcc_without_cc() {
        let mut email = email();
        email.cc(["copy@example.com"]);
        email.bcc(["quiet@example.com"]);

        let recipients = email.envelope_recipients().unwrap();
        let addrs: Vec<&str> = recipients.iter().map(Address::as_str).collect();
        assert_eq!(addrs, vec!["recipient@example.com", "quiet@example.com"]);
    }

    #[test]
    fn envelope_rejects_injected_bcc() {
        let mut email = email();
        email.bcc(["quiet@example.com\r\nDATA"]);
        assert!(matches!(
            email.envelope_recipients(),
            Err(crate::Error::Smtp(SmtpError::HeaderInjection(_)))
        ));
    }

    #[tokio::test]
    async fn send_rejects_injected_recipient_before_any_network() {
        let mut email = email();
        email.to([
            "good@example.com",
            "bad@example.com\r\nRCPT TO:<evil@example.com>",
        ]);
        let err = email.send().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Smtp(SmtpError::HeaderInjection(_))
        ));
    }

    #[tokio::test]
    async fn send_rejects_injected_sender_before_any_network() {
        let mut email = email();
        email.from("sender@example.com\nX-Forged: yes");
        let err = email.send().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Smtp(SmtpError::HeaderInjection(_))
        ));
    }

    #[tokio::test]
    async fn send_requires_recipients() {
        let mut email = email();
        email.to(Vec::<String>::new());
        let err = email.send().await.unwrap_err();
        assert!(matches!(err, crate::Error::Smtp(SmtpError::NoRecipients)));
    }

    #[test]
    fn describe_redacts_credential_and_content() {
        let mut email = Email::new(
            "smtp.example.com:587",
            Some(Arc::new(Plain::new("user@example.com", "hunter2"))),
            false,
        )
        .unwrap();
        email.from("sender@example.com");
        email.plain().set("the body text stays private");
        email.attach(Attachment::new(
            "report.pdf",
            mailship_mime::ContentType::octet_stream(),
            vec![0_u8; 128],
        ));

        let description = email.describe();
        assert!(description.contains("credential: present"));
        assert!(!description.contains("hunter2"));
        assert!(!description.contains("user@example.com"));
        assert!(description.contains("plain: 27 bytes"));
        assert!(!description.contains("the body text stays private"));
        assert!(description.contains("report.pdf"));
        assert_eq!(description, format!("{email:?}"));
    }
}
