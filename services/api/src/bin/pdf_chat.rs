//! services/api/src/bin/pdf_chat.rs
//!
//! A terminal client for the PDF chat API. Uploads a local PDF (or points the
//! server at a URL) and then answers questions read from the command line or
//! from stdin, listing the cited pages under each answer.

use api_lib::adapters::{http_chat::CLIENT_TIMEOUT, HttpChatBackend};
use clap::Parser;
use pdf_chat_core::{
    chat::{Conversation, SendRejected},
    domain::{ChatMessage, DocumentRef},
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pdf-chat", about = "Ask questions about a PDF")]
#[command(group(clap::ArgGroup::new("source").required(true).args(["file", "url"])))]
struct Cli {
    /// Base URL of the PDF chat server.
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Local PDF to upload.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Public URL of a PDF the server should fetch.
    #[arg(long)]
    url: Option<String>,

    /// Ask a single question and exit instead of reading questions from stdin.
    #[arg(long, short)]
    question: Option<String>,
}

fn render(message: &ChatMessage) {
    println!("\n{}\n", message.text);
    if !message.citations.is_empty() {
        println!("Citations:");
        for citation in &message.citations {
            println!("  Page {}: {}", citation.page, citation.text);
        }
        println!();
    }
}

async fn ask(conversation: &mut Conversation<HttpChatBackend>, question: &str) {
    match conversation.send(question).await {
        Ok(reply) => render(reply),
        Err(SendRejected::EmptyQuestion) => {}
        Err(e) => warn!("{}", e),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();

    let backend = match HttpChatBackend::new(&cli.server, CLIENT_TIMEOUT) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let document = match (&cli.file, &cli.url) {
        (Some(path), _) => match backend.upload(path).await {
            Ok(upload) => {
                println!(
                    "Uploaded {} ({} pseudo-pages).",
                    upload.file_name, upload.total_pages
                );
                DocumentRef::Uploaded(upload.document_id)
            }
            Err(e) => {
                error!("Upload failed: {}", e);
                std::process::exit(1);
            }
        },
        (None, Some(url)) => DocumentRef::Url(url.clone()),
        (None, None) => unreachable!("clap requires --file or --url"),
    };

    let mut conversation = Conversation::new(backend, document);

    if let Some(question) = cli.question.as_deref() {
        ask(&mut conversation, question).await;
    } else {
        println!("Ask a question (empty line is ignored, Ctrl-D or /quit to exit).");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim() == "/quit" => break,
                Ok(Some(line)) => ask(&mut conversation, &line).await,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    }

    conversation.close().await;
}
