//! Chunked transfer of a streamed response body into a writer.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

use crate::error::StreamError;
use crate::CHUNK_SIZE;

/// Write every chunk of `stream` to `out` in arrival order.
///
/// Transport buffers larger than [`CHUNK_SIZE`] are split so that no single
/// write exceeds it. An empty chunk is logged but does not end the loop;
/// the loop ends when the underlying stream is exhausted. Returns the total
/// number of bytes and chunks written.
pub(crate) async fn drain_chunks<S, W>(
    mut stream: S,
    out: &mut W,
) -> Result<(u64, u64), StreamError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut total_bytes = 0u64;
    let mut total_chunks = 0u64;
    let mut first_chunk = true;

    while let Some(buf) = stream.next().await {
        let buf = buf?;
        if buf.is_empty() {
            info!("Received empty chunk (end of stream?)");
            continue;
        }

        for chunk in buf.chunks(CHUNK_SIZE) {
            if first_chunk {
                info!(
                    "Received initial chunk (likely WAV header) of length: {}",
                    chunk.len()
                );
                first_chunk = false;
            } else {
                info!("Received audio chunk of length: {}", chunk.len());
            }

            out.write_all(chunk).await?;
            total_bytes += chunk.len() as u64;
            total_chunks += 1;
        }
    }

    Ok((total_bytes, total_chunks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    fn chunk_stream(parts: &[&[u8]]) -> impl Stream<Item = reqwest::Result<Bytes>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok::<Bytes, reqwest::Error>(Bytes::copy_from_slice(p)))
                .collect::<Vec<_>>(),
        )
    }

    /// Writer that records the size of each individual write.
    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<usize>,
        data: Vec<u8>,
    }

    impl AsyncWrite for RecordingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.writes.push(buf.len());
            this.data.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn concatenates_chunks_in_arrival_order() {
        let mut out = RecordingWriter::default();
        let (bytes, chunks) =
            drain_chunks(chunk_stream(&[b"RIFF....".as_slice(), b"DATA1", b"DATA2"]), &mut out)
                .await
                .unwrap();

        assert_eq!(out.data, b"RIFF....DATA1DATA2");
        assert_eq!(bytes, 18);
        assert_eq!(chunks, 3);
    }

    #[tokio::test]
    async fn empty_chunk_is_skipped_but_does_not_end_the_stream() {
        let mut out = RecordingWriter::default();
        let (bytes, chunks) =
            drain_chunks(
                chunk_stream(&[b"RIFF....".as_slice(), b"DATA1", b"", b"DATA2"]),
                &mut out,
            )
                .await
                .unwrap();

        assert_eq!(out.data, b"RIFF....DATA1DATA2");
        assert_eq!(bytes, 18);
        assert_eq!(chunks, 3);
    }

    #[tokio::test]
    async fn oversized_buffers_are_split_at_the_chunk_size() {
        let big = vec![0xABu8; CHUNK_SIZE * 2 + 1000];
        let mut out = RecordingWriter::default();
        let (bytes, chunks) = drain_chunks(chunk_stream(&[&big]), &mut out).await.unwrap();

        assert_eq!(out.data, big);
        assert_eq!(bytes, big.len() as u64);
        assert_eq!(chunks, 3);
        assert!(out.writes.iter().all(|&w| w <= CHUNK_SIZE));
        assert_eq!(out.writes, vec![CHUNK_SIZE, CHUNK_SIZE, 1000]);
    }

    #[tokio::test]
    async fn empty_stream_writes_nothing() {
        let mut out = RecordingWriter::default();
        let (bytes, chunks) = drain_chunks(chunk_stream(&[]), &mut out).await.unwrap();

        assert!(out.data.is_empty());
        assert_eq!((bytes, chunks), (0, 0));
    }
}
