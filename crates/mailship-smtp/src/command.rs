//! SMTP command serialization.

use crate::address::Address;

/// An SMTP command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - extended greeting with capability discovery
    Ehlo {
        /// Name the client identifies itself with
        hostname: String,
    },
    /// STARTTLS - upgrade the connection to TLS
    StartTls,
    /// AUTH - begin an authentication exchange
    Auth {
        /// SASL mechanism name
        mechanism: String,
        /// Initial response (SASL-IR), already base64-encoded
        initial_response: Option<String>,
    },
    /// MAIL FROM - open the envelope with the sender
    MailFrom {
        /// Sender address
        from: Address,
    },
    /// RCPT TO - add an envelope recipient
    RcptTo {
        /// Recipient address
        to: Address,
    },
    /// DATA - begin message payload transfer
    Data,
    /// QUIT - end the session
    Quit,
}

impl Command {
    /// Serializes the command to a CRLF-terminated line.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let line = match self {
            Self::Ehlo { hostname } => format!("EHLO {hostname}"),
            Self::StartTls => "STARTTLS".to_string(),
            Self::Auth {
                mechanism,
                initial_response,
            } => initial_response.as_ref().map_or_else(
                || format!("AUTH {mechanism}"),
                |resp| format!("AUTH {mechanism} {resp}"),
            ),
            Self::MailFrom { from } => format!("MAIL FROM:<{from}>"),
            Self::RcptTo { to } => format!("RCPT TO:<{to}>"),
            Self::Data => "DATA".to_string(),
            Self::Quit => "QUIT".to_string(),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }
}
