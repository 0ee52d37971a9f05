use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::StreamError;
use crate::stream::drain_chunks;
use crate::STREAM_PATH;

/// JSON body of a synthesis request. Built fresh per invocation.
#[derive(Serialize)]
struct SpeechRequest<'a> {
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Client for the streaming speech endpoint of an Orpheus server.
pub struct SpeechStreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpeechStreamClient {
    /// Create a client for the service at `base_url`.
    ///
    /// Only a connect timeout is configured. The request itself has no
    /// deadline, so long-running streams are never cut off mid-synthesis.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, StreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| StreamError::Unexpected(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Synthesize `text` with `voice` and save the streamed WAV bytes to
    /// `output_path`.
    ///
    /// The response body is consumed incrementally and appended to the file
    /// in arrival order. The file handle is released on every exit path; a
    /// failed call may leave an empty or truncated file behind. The parent
    /// directory of `output_path` must already exist.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output_path: &Path,
    ) -> Result<(), StreamError> {
        let url = format!("{}{}", self.base_url, STREAM_PATH);
        let body = SpeechRequest {
            input: text,
            voice,
            response_format: "wav",
        };

        // Opened before the request goes out, truncating any existing file.
        // Dropped, and thereby closed, on every exit path below.
        let mut file = File::create(output_path).await?;

        let response = self
            .http
            .post(&url)
            .header(ACCEPT, "audio/wav")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::HttpStatus(status));
        }

        let started = Instant::now();
        let (bytes, chunks) = drain_chunks(response.bytes_stream(), &mut file).await?;
        file.flush().await?;

        info!(
            "Audio saved to {} ({} bytes in {} chunks, {:.1?})",
            output_path.display(),
            bytes,
            chunks,
            started.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_request_serializes_to_the_wire_format() {
        let req = SpeechRequest {
            input: "hello there",
            voice: "Orpheus",
            response_format: "wav",
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "input": "hello there",
                "voice": "Orpheus",
                "response_format": "wav",
            })
        );
    }
}
