//! # mailship
//!
//! Compose MIME email and deliver it over SMTP.
//!
//! An [`Email`] collects addressing, plain/HTML bodies, and attachments,
//! renders them into an RFC 5322 MIME document, and drives a single
//! SMTP session to hand the message to the configured server — with
//! opportunistic STARTTLS and optional authentication along the way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailship::{Email, Plain};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = Arc::new(Plain::new("user@example.com", "password"));
//!     let mut email = Email::new("smtp.example.com:587", Some(credential), false)?;
//!
//!     email.from("user@example.com");
//!     email.from_name("Example User");
//!     email.to(["recipient@example.com"]);
//!     email.subject("Hello");
//!     email.plain().set("Hello from mailship.");
//!     email.html().set("<p>Hello from <b>mailship</b>.</p>");
//!
//!     email.send().await?;
//!     Ok(())
//! }
//! ```
//!
//! To hand the rendered bytes to a non-SMTP delivery API instead, use
//! [`Email::render`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod email;
mod error;

pub use email::Email;
pub use error::{Error, Result};

pub use mailship_mime::{Attachment, BodyPart, ContentType, MessageBuilder};
pub use mailship_smtp::{Address, Credential, Login, Plain, SessionConfig, XOAuth2};
