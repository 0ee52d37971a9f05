//! Command-line front end for the Orpheus speech streaming client.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use speech_core::{SpeechStreamClient, DEFAULT_VOICE};
use tracing::{error, info};

use crate::config::ClientConfig;

const DEFAULT_TEXT: &str = "Okay, so... this is just a quick test of the Orpheus \
                            text to speech streaming endpoint, you know?";

/// Stream synthesized speech from an Orpheus server into a WAV file.
#[derive(Parser, Debug)]
#[command(name = "orpheus-stream", version)]
struct Args {
    /// Text to synthesize
    #[arg(long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Voice to synthesize with
    #[arg(long, default_value = DEFAULT_VOICE)]
    voice: String,

    /// Where to write the streamed WAV file
    #[arg(long, default_value = "stream.wav")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _ = dotenv::dotenv();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error during streaming request: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ClientConfig::from_env();

    info!(
        "Initiating streaming for text: '{}' with voice: '{}'",
        args.text, args.voice
    );

    let client = SpeechStreamClient::new(&config.base_url, config.connect_timeout())?;
    client
        .synthesize(&args.text, &args.voice, &args.output)
        .await?;

    info!("Streaming complete.");
    Ok(())
}
