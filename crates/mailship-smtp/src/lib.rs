//! # mailship-smtp
//!
//! SMTP client session driver implementing RFC 5321.
//!
//! ## Features
//!
//! - **Type-state sessions**: compile-time enforcement of the SMTP command
//!   order (greet, upgrade, authenticate, envelope, data)
//! - **Opportunistic TLS**: STARTTLS attempted only when the server
//!   advertises it, with per-session opt-in for skipping verification
//! - **Mechanism-agnostic authentication**: PLAIN, LOGIN, XOAUTH2, or any
//!   custom [`Credential`]
//! - **Injection defense**: envelope addresses are rejected if they carry
//!   CR/LF bytes, before any network activity
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailship_smtp::{Address, SessionConfig, send_mail};
//!
//! #[tokio::main]
//! async fn main() -> mailship_smtp::Result<()> {
//!     let config = SessionConfig::from_addr("smtp.example.com:587")?;
//!     let from = Address::new("sender@example.com")?;
//!     let to = [Address::new("recipient@example.com")?];
//!
//!     let message = b"Subject: Test\r\n\r\nHello, World!\r\n";
//!     send_mail(&config, None, &from, &to, message).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod command;
pub mod connection;
pub mod credential;
mod error;
pub mod extensions;
pub mod reply;

pub use address::{Address, validate_line};
pub use connection::{
    Session, SessionConfig, SmtpStream, Transport, connect, deliver, send_mail,
};
pub use credential::{Credential, Login, Plain, XOAuth2};
pub use error::{Error, Result};
pub use extensions::{Extension, ServerInfo};
pub use reply::Reply;
