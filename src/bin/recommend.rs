use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bookchat::models::ChatReply;
use bookchat::{build_chat_service, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "recommend")]
#[command(about = "Run one chat turn and print the book recommendations")]
struct Cli {
    /// Message to send; read from stdin when omitted.
    message: Option<String>,
    /// Print the raw JSON response instead of a listing.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Fix the shuffle so repeated runs pick the same books.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let message = match cli.message {
        Some(message) => message,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read message from stdin")?;
            buf.trim().to_string()
        }
    };

    let chat = build_chat_service(&config).with_seed(cli.seed.or(config.shuffle_seed));
    let reply = chat.handle(&message).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print_reply(&message, &reply);
    }
    Ok(())
}

fn print_reply(message: &str, reply: &ChatReply) {
    println!("You entered: {message}");
    println!();
    println!("AI Response: {}", reply.reply_text);
    println!();

    let keywords: Vec<&str> = reply.keywords.iter().map(|k| k.as_str()).collect();
    println!("Extracted keywords: {}", keywords.join(", "));
    println!();

    if reply.recommendations.is_empty() {
        println!("No book recommendations found.");
        return;
    }

    println!("Book Recommendations:");
    for book in &reply.recommendations {
        println!("- {} by {}", book.title, book.author);
        if !book.image_url.is_empty() {
            println!("  Image: {}", book.image_url);
        }
        println!("  Price: {}", book.price);
    }
}
