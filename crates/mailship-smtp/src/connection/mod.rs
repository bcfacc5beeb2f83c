//! SMTP connection management: transport streams and the session driver.

mod session;
mod stream;

pub use session::{
    Authenticated, DataOpen, Done, EnvelopeFrom, Greeted, RecipientAccepted, Session,
    SessionConfig, Transport, deliver, send_mail,
};
pub use stream::{SmtpStream, connect};
