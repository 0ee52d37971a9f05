//! Client for the Orpheus streaming speech-synthesis HTTP API.
//!
//! The server synthesizes speech for a piece of text and streams the
//! resulting WAV bytes back over HTTP. This crate issues the request and
//! copies the response body to a local file chunk by chunk, in arrival
//! order, without buffering the whole stream in memory. Nothing inspects
//! the audio itself; bytes pass through verbatim.

mod client;
mod error;
mod stream;

pub use client::SpeechStreamClient;
pub use error::StreamError;

/// Maximum number of bytes handed to the file writer per chunk. Larger
/// transport buffers are split before being written.
pub const CHUNK_SIZE: usize = 8192;

/// Path of the streaming synthesis endpoint, relative to the base URL.
pub const STREAM_PATH: &str = "/v1/audio/speech/stream";

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE: &str = "Orpheus";
