//! Sends a demo message through a local SMTP relay.
//!
//! Run a test server first (e.g. `python3 -m smtpd -n -c DebuggingServer
//! localhost:2525`), then: `cargo run --example send_email`

use mailship::{Attachment, ContentType, Email};
use std::fmt::Write as _;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut email = Email::new("localhost:2525", None, false)?;
    email.config_mut().hello_name = "demo.localdomain".to_string();
    email.from("sender@example.com");
    email.from_name("Example Sender");
    email.to(["recipient@example.com"]);
    email.cc(["watcher@example.com"]);
    email.subject("Hello from mailship");

    write!(email.plain(), "Plain-text greetings.")?;
    email.html().set("<p>HTML greetings.</p>");
    email.attach(Attachment::new(
        "numbers.txt",
        ContentType::text_plain(),
        "1 2 3\n",
    ));

    println!("{email}");
    email.send().await?;
    println!("accepted by the server");
    Ok(())
}
