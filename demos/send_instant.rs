use std::io;

use briq::{BriqClient, MessageContent, PhoneNumber, SendInstantMessage};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let phone_raw = std::env::var("BRIQ_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "BRIQ_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("BRIQ_MESSAGE")
        .unwrap_or_else(|_| "Hello from the briq demo.".to_owned());

    // BRIQ_API_KEY is required; BRIQ_SENDER_ID becomes the default sender.
    let client = BriqClient::from_env()?;
    let phone = PhoneNumber::parse(Some(phonenumber::country::Id::TZ), phone_raw)?;
    let content = MessageContent::new(message)?;
    println!("sending {} segment(s) to {}", content.segments(), phone.as_str());

    let request = SendInstantMessage::to_one(phone, content);
    let response = client.messages().send_instant(&request).await?;
    for message in response.data.unwrap_or_default() {
        println!("message {} status {:?}", message.message_id, message.status);
    }

    Ok(())
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,briq=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
