//! # mailship-mime
//!
//! MIME message generation for email delivery.
//!
//! ## Features
//!
//! - **Content model**: plain and HTML body buffers plus attachments
//! - **Message generation**: single-part, `multipart/alternative`, and
//!   `multipart/mixed` messages with fresh random boundaries
//! - **Encoding**: base64 bodies and RFC 2047 encoded-word headers
//! - **Header hygiene**: line-break normalization for free-text values
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailship_mime::MessageBuilder;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Test Message")
//!     .text_body("Hello, World!")
//!     .build()?;
//! ```
//!
//! ### Working with Attachments
//!
//! ```ignore
//! use mailship_mime::{Attachment, MessageBuilder};
//!
//! let attachment = Attachment::from_file("document.pdf")?;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Document")
//!     .text_body("Please find the attached document.")
//!     .attach(attachment)
//!     .build()?; // Creates multipart/mixed
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod body;
mod boundary;
mod builder;
mod content_type;
mod error;
mod header;

pub mod encoding;

pub use body::{Attachment, BodyPart};
pub use boundary::generate_boundary;
pub use builder::MessageBuilder;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::{Headers, sanitize_header_value};
