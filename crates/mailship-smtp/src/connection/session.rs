//! Type-state SMTP session driver.
//!
//! A session owns its transport and walks the command sequence one step at a
//! time. The type parameter tracks protocol position at compile time, so a
//! `RCPT TO` cannot be issued before `MAIL FROM` and payload bytes cannot be
//! written outside the data phase:
//!
//! ```text
//! Greeted ──(starttls?)──→ Greeted ──(authenticate?)──→ Authenticated
//!    │                                                       │
//!    └───────────────── mail_from ───────────────────────────┘
//!                            │
//!                      EnvelopeFrom ── rcpt_to ──→ RecipientAccepted ⟲ rcpt_to
//!                                                        │
//!                                                  data → DataOpen ── send ──→ Done
//! ```
//!
//! The transport is moved through every transition and dropped on every exit
//! path, so the connection is released exactly once whether the exchange
//! completed or died halfway.

use super::stream;
use crate::address::Address;
use crate::command::Command;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::extensions::{Extension, ServerInfo};
use crate::reply::{self, Reply};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Connection-level operations the session driver needs from a transport.
///
/// Implemented by [`stream::SmtpStream`] for real connections and by test
/// doubles for simulated sessions.
#[allow(async_fn_in_trait)]
#[allow(clippy::missing_errors_doc)]
pub trait Transport: Sized {
    /// Reads one reply line, with the trailing CRLF stripped.
    async fn read_line(&mut self) -> Result<String>;

    /// Writes raw bytes and flushes.
    async fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Promotes the transport to TLS, validating the certificate against
    /// `hostname` unless `insecure` was explicitly requested.
    async fn upgrade_to_tls(self, hostname: &str, insecure: bool) -> Result<Self>;
}

/// Per-session configuration.
///
/// These are explicit fields rather than process-wide toggles; every session
/// carries its own.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server hostname, also used for TLS certificate validation.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Name this client identifies itself with in EHLO.
    pub hello_name: String,
    /// Skip TLS certificate validation. Never the default; the caller must
    /// opt in per session.
    pub insecure_skip_verify: bool,
}

impl SessionConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            hello_name: "localhost".to_string(),
            insecure_skip_verify: false,
        }
    }

    /// Parses a `host:port` endpoint string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has no port or the port is not numeric.
    pub fn from_addr(addr: &str) -> Result<Self> {
        let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
            Error::Connect(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("endpoint {addr:?} is missing a port"),
            ))
        })?;
        let port = port.parse::<u16>().map_err(|_| {
            Error::Connect(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid port in endpoint {addr:?}"),
            ))
        })?;
        Ok(Self::new(host, port))
    }

    /// Sets the EHLO name.
    #[must_use]
    pub fn hello_name(mut self, name: impl Into<String>) -> Self {
        self.hello_name = name.into();
        self
    }

    /// Enables or disables certificate validation skipping.
    #[must_use]
    pub fn insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }
}

/// Type-state marker: greeting exchanged, capabilities known.
#[derive(Debug)]
pub struct Greeted;

/// Type-state marker: credential accepted.
#[derive(Debug)]
pub struct Authenticated;

/// Type-state marker: envelope sender accepted.
#[derive(Debug)]
pub struct EnvelopeFrom;

/// Type-state marker: at least one envelope recipient accepted.
#[derive(Debug)]
pub struct RecipientAccepted;

/// Type-state marker: data phase open.
#[derive(Debug)]
pub struct DataOpen;

/// Type-state marker: payload accepted by the server.
#[derive(Debug)]
pub struct Done;

/// An SMTP session in a given protocol state.
pub struct Session<T, State> {
    transport: T,
    server: ServerInfo,
    hello_name: String,
    _state: PhantomData<State>,
}

impl<T: Transport, S> Session<T, S> {
    /// Returns what the server advertised during the greeting exchange.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    /// Ends the session with QUIT and releases the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the QUIT command.
    pub async fn quit(mut self) -> Result<()> {
        let reply = self.send_command(&Command::Quit).await?;
        if !reply.is_positive() && reply.code != reply::CLOSING {
            return Err(Error::Protocol(format!(
                "QUIT rejected: {} {}",
                reply.code,
                reply.text()
            )));
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &Command) -> Result<Reply> {
        self.transport.write_all(&command.serialize()).await?;
        read_reply(&mut self.transport).await
    }

    /// Re-issues EHLO and re-captures the advertised extension set.
    async fn ehlo(&mut self) -> Result<()> {
        let command = Command::Ehlo {
            hostname: self.hello_name.clone(),
        };
        let reply = self.send_command(&command).await?;
        if !reply.is_positive() {
            return Err(Error::Greeting {
                code: reply.code,
                message: reply.text(),
            });
        }
        // The first line is the server greeting, the rest are extensions.
        self.server.extensions = reply
            .lines
            .iter()
            .skip(1)
            .map(|line| Extension::parse(line))
            .collect();
        Ok(())
    }

    fn into_state<N>(self) -> Session<T, N> {
        Session {
            transport: self.transport,
            server: self.server,
            hello_name: self.hello_name,
            _state: PhantomData,
        }
    }
}

impl<T: Transport> Session<T, Greeted> {
    /// Reads the server greeting and discovers capabilities with EHLO.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Greeting`] if the server rejects the exchange.
    pub async fn open(mut transport: T, hello_name: &str) -> Result<Self> {
        let greeting = read_reply(&mut transport).await?;
        if !greeting.is_positive() {
            return Err(Error::Greeting {
                code: greeting.code,
                message: greeting.text(),
            });
        }

        // The server names itself in the first word of the greeting text.
        let hostname = greeting
            .lines
            .first()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();

        let mut session = Self {
            transport,
            server: ServerInfo {
                hostname,
                extensions: HashSet::new(),
            },
            hello_name: hello_name.to_string(),
            _state: PhantomData,
        };
        session.ehlo().await?;
        tracing::debug!(
            server = %session.server.hostname,
            extensions = session.server.extensions.len(),
            "session greeted"
        );
        Ok(session)
    }

    /// Upgrades the connection to TLS and re-negotiates capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if the server refuses the upgrade or the
    /// handshake fails.
    pub async fn starttls(mut self, hostname: &str, insecure: bool) -> Result<Self> {
        let reply = self.send_command(&Command::StartTls).await?;
        if !reply.is_positive() {
            return Err(Error::Tls(format!(
                "server refused upgrade: {} {}",
                reply.code,
                reply.text()
            )));
        }

        let Self {
            transport,
            server,
            hello_name,
            _state,
        } = self;
        let transport = transport.upgrade_to_tls(hostname, insecure).await?;

        let mut session = Self {
            transport,
            server,
            hello_name,
            _state: PhantomData,
        };
        // The capability set may differ on the secured channel.
        session.ehlo().await?;
        tracing::debug!(server = %session.server.hostname, "channel secured");
        Ok(session)
    }

    /// Runs the authentication exchange with the given credential.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`] if the server rejects the credential.
    pub async fn authenticate(
        mut self,
        credential: &dyn Credential,
    ) -> Result<Session<T, Authenticated>> {
        let command = Command::Auth {
            mechanism: credential.mechanism().to_string(),
            initial_response: credential.initial_response(),
        };
        let mut reply = self.send_command(&command).await?;

        while reply.code == reply::AUTH_CONTINUE {
            let challenge_text = reply.lines.first().cloned().unwrap_or_default();
            let challenge = STANDARD
                .decode(challenge_text.trim())
                .map_err(|e| Error::Protocol(format!("undecodable auth challenge: {e}")))?;
            let response = credential.respond(&challenge)?;
            self.transport
                .write_all(format!("{response}\r\n").as_bytes())
                .await?;
            reply = read_reply(&mut self.transport).await?;
        }

        if !reply.is_positive() {
            return Err(Error::Auth {
                code: reply.code,
                message: reply.text(),
            });
        }
        tracing::debug!(mechanism = credential.mechanism(), "authenticated");
        Ok(self.into_state())
    }

    /// Opens the envelope with the sender address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Envelope`] if the server rejects the sender.
    pub async fn mail_from(mut self, from: &Address) -> Result<Session<T, EnvelopeFrom>> {
        let reply = self
            .send_command(&Command::MailFrom { from: from.clone() })
            .await?;
        if !reply.is_positive() {
            return Err(Error::Envelope {
                code: reply.code,
                message: reply.text(),
            });
        }
        Ok(self.into_state())
    }
}

impl<T: Transport> Session<T, Authenticated> {
    /// Opens the envelope with the sender address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Envelope`] if the server rejects the sender.
    pub async fn mail_from(mut self, from: &Address) -> Result<Session<T, EnvelopeFrom>> {
        let reply = self
            .send_command(&Command::MailFrom { from: from.clone() })
            .await?;
        if !reply.is_positive() {
            return Err(Error::Envelope {
                code: reply.code,
                message: reply.text(),
            });
        }
        Ok(self.into_state())
    }
}

impl<T: Transport> Session<T, EnvelopeFrom> {
    /// Adds the first envelope recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recipient`] naming the address the server refused.
    pub async fn rcpt_to(mut self, to: &Address) -> Result<Session<T, RecipientAccepted>> {
        let reply = self.send_command(&Command::RcptTo { to: to.clone() }).await?;
        if !reply.is_positive() {
            return Err(Error::Recipient {
                address: to.as_str().to_string(),
                code: reply.code,
                message: reply.text(),
            });
        }
        Ok(self.into_state())
    }
}

impl<T: Transport> Session<T, RecipientAccepted> {
    /// Adds another envelope recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Recipient`] naming the address the server refused.
    pub async fn rcpt_to(mut self, to: &Address) -> Result<Self> {
        let reply = self.send_command(&Command::RcptTo { to: to.clone() }).await?;
        if !reply.is_positive() {
            return Err(Error::Recipient {
                address: to.as_str().to_string(),
                code: reply.code,
                message: reply.text(),
            });
        }
        Ok(self)
    }

    /// Opens the data phase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transfer`] if the server does not accept mail input.
    pub async fn data(mut self) -> Result<Session<T, DataOpen>> {
        let reply = self
            .send_command(&Command::Data)
            .await
            .map_err(into_transfer)?;
        if reply.code != reply::START_DATA {
            return Err(Error::Transfer(format!(
                "DATA refused: {} {}",
                reply.code,
                reply.text()
            )));
        }
        Ok(self.into_state())
    }
}

impl<T: Transport> Session<T, DataOpen> {
    /// Writes the rendered message and closes the data phase.
    ///
    /// Line endings are normalized to CRLF and leading dots are stuffed; the
    /// terminating `.` line is appended automatically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transfer`] if writing fails or the server rejects
    /// the message.
    pub async fn send(mut self, message: &[u8]) -> Result<Session<T, Done>> {
        for line in message.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            if line.first() == Some(&b'.') {
                self.transport.write_all(b".").await.map_err(into_transfer)?;
            }
            self.transport.write_all(line).await.map_err(into_transfer)?;
            self.transport
                .write_all(b"\r\n")
                .await
                .map_err(into_transfer)?;
        }
        self.transport
            .write_all(b".\r\n")
            .await
            .map_err(into_transfer)?;

        let reply = read_reply(&mut self.transport).await.map_err(into_transfer)?;
        if !reply.is_positive() {
            return Err(Error::Transfer(format!(
                "{} {}",
                reply.code,
                reply.text()
            )));
        }
        tracing::debug!(bytes = message.len(), "message accepted");
        Ok(self.into_state())
    }
}

/// Every data-phase failure reports as a transfer error, including the
/// connection dying mid-write.
fn into_transfer(err: Error) -> Error {
    match err {
        Error::Io(e) => Error::Transfer(e.to_string()),
        other => other,
    }
}

async fn read_reply<T: Transport>(transport: &mut T) -> Result<Reply> {
    let mut lines = Vec::new();
    loop {
        let line = transport.read_line().await?;
        if line.is_empty() {
            continue;
        }

        let is_last = Reply::is_final_line(&line);
        lines.push(line);

        if is_last {
            break;
        }
    }
    Reply::parse(&lines)
}

/// Drives a full delivery over an already-connected transport.
///
/// Steps run strictly in sequence: greet, opportunistic TLS upgrade (only if
/// advertised), authentication (only if a credential was supplied and the
/// server advertises AUTH), envelope, payload, QUIT. The first failure aborts
/// the exchange; the transport is dropped on every path.
///
/// # Errors
///
/// Returns the error of whichever step failed.
pub async fn deliver<T: Transport>(
    transport: T,
    config: &SessionConfig,
    credential: Option<&dyn Credential>,
    from: &Address,
    recipients: &[Address],
    message: &[u8],
) -> Result<()> {
    let (first, rest) = recipients.split_first().ok_or(Error::NoRecipients)?;

    let session = Session::open(transport, &config.hello_name).await?;

    let session = if session.server_info().supports_starttls() {
        session
            .starttls(&config.host, config.insecure_skip_verify)
            .await?
    } else {
        session
    };

    let session = match credential {
        Some(credential) if session.server_info().supports_auth() => {
            session.authenticate(credential).await?.mail_from(from).await?
        }
        _ => session.mail_from(from).await?,
    };

    let mut session = session.rcpt_to(first).await?;
    for recipient in rest {
        session = session.rcpt_to(recipient).await?;
    }

    let session = session.data().await?;
    let session = session.send(message).await?;
    session.quit().await
}

/// Connects to the configured endpoint and drives a full delivery.
///
/// # Errors
///
/// Returns [`Error::Connect`] if the connection cannot be opened, otherwise
/// the error of whichever protocol step failed.
pub async fn send_mail(
    config: &SessionConfig,
    credential: Option<&dyn Credential>,
    from: &Address,
    recipients: &[Address],
    message: &[u8],
) -> Result<()> {
    if recipients.is_empty() {
        return Err(Error::NoRecipients);
    }
    let stream = stream::connect(&config.host, config.port).await?;
    deliver(stream, config, credential, from, recipients, message).await
}
