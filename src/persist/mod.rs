//! Saving byte streams to disk
//!
//! [`persist`] drains a [`ByteSource`] into a file one chunk at a time, so
//! memory use is bounded by the chunk size no matter how long the audio is.
//!
//! # Example
//!
//! ```no_run
//! use camb_sdk::persist::{ByteSource, persist};
//!
//! # async fn example() -> Result<(), camb_sdk::PersistError> {
//! let source = ByteSource::from_bytes(&b"RIFF...."[..]);
//! let written = persist(source, "output.wav").await?;
//! println!("wrote {written} bytes");
//! # Ok(())
//! # }
//! ```

use crate::error::PersistError;
use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, trace};

/// Boxed sequence of chunks, as produced by streaming HTTP bodies
pub type ChunkStream = BoxStream<'static, io::Result<Bytes>>;

/// Reader handed out by a [`PullSource`]
///
/// `read` yields `Some(chunk)` until the source is exhausted, then `None`.
/// [`persist`] calls `release` exactly once when it is done with the reader,
/// whether it finished, failed, or unwound.
#[async_trait::async_trait]
pub trait ChunkReader: Send {
    /// Pull the next chunk, or `None` once the stream is complete
    async fn read(&mut self) -> io::Result<Option<Bytes>>;

    /// Free whatever the reader holds (locks, connections, buffers)
    fn release(&mut self);
}

/// Object that hands out a single [`ChunkReader`]
pub trait PullSource: Send {
    /// Acquire the reader; `None` means there is no stream to read
    fn reader(&mut self) -> Option<Box<dyn ChunkReader>>;
}

/// Source of bytes to persist
pub enum ByteSource {
    /// Pull-based source exposing a reader
    Pull(Box<dyn PullSource>),
    /// Lazily produced, finite, non-restartable sequence of chunks
    Stream(ChunkStream),
}

impl ByteSource {
    /// Wrap a pull-based source
    pub fn pull(source: impl PullSource + 'static) -> Self {
        ByteSource::Pull(Box::new(source))
    }

    /// Wrap any fallible chunk stream, converting its errors to `io::Error`
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ByteSource::Stream(stream.map(|item| item.map_err(io::Error::other)).boxed())
    }

    /// Stream the contents of an async reader
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        ByteSource::Stream(tokio_util::io::ReaderStream::new(reader).boxed())
    }

    /// Single in-memory chunk
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let chunk: io::Result<Bytes> = Ok(bytes.into());
        ByteSource::Stream(futures::stream::once(async move { chunk }).boxed())
    }

    /// Stream an HTTP response body as it arrives
    pub fn from_response(response: reqwest::Response) -> Self {
        Self::from_stream(response.bytes_stream())
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSource::Pull(_) => f.write_str("ByteSource::Pull(..)"),
            ByteSource::Stream(_) => f.write_str("ByteSource::Stream(..)"),
        }
    }
}

/// Releases the wrapped reader when dropped
struct ReaderGuard(Box<dyn ChunkReader>);

impl Drop for ReaderGuard {
    fn drop(&mut self) {
        self.0.release();
    }
}

enum Chunks {
    Reader(ReaderGuard),
    Stream(ChunkStream),
}

impl Chunks {
    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        match self {
            Chunks::Reader(guard) => guard.0.read().await,
            Chunks::Stream(stream) => stream.next().await.transpose(),
        }
    }
}

/// Write every chunk of `source` to `target`, in arrival order
///
/// The target is created, or truncated if it exists. Parent directories are
/// not created. On success all data has been flushed and synced, and the
/// number of bytes written is returned. An empty source produces an empty
/// file.
///
/// # Errors
///
/// - [`PersistError::EmptyStream`] if a pull source hands out no reader. No
///   file is created in that case.
/// - [`PersistError::Create`] if the target cannot be opened.
/// - [`PersistError::Read`] / [`PersistError::Write`] if a chunk cannot be
///   read or written. Data written before the failure is flushed and left in
///   place.
/// - [`PersistError::Flush`] if the final flush or sync fails.
pub async fn persist(source: ByteSource, target: impl AsRef<Path>) -> Result<u64, PersistError> {
    let path = target.as_ref();

    let mut chunks = match source {
        ByteSource::Pull(mut source) => {
            Chunks::Reader(ReaderGuard(source.reader().ok_or(PersistError::EmptyStream)?))
        }
        ByteSource::Stream(stream) => Chunks::Stream(stream),
    };

    let mut file = File::create(path)
        .await
        .map_err(|source| PersistError::Create {
            path: path.to_path_buf(),
            source,
        })?;

    let copied = copy_chunks(&mut chunks, &mut file, path).await;
    drop(chunks);

    match copied {
        Ok(written) => {
            finish(&mut file).await.map_err(|source| PersistError::Flush {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), bytes = written, "Stream persisted");
            Ok(written)
        }
        Err(e) => {
            // Partial data stays on disk; a flush failure here would only mask `e`
            let _ = file.flush().await;
            Err(e)
        }
    }
}

async fn copy_chunks(chunks: &mut Chunks, file: &mut File, path: &Path) -> Result<u64, PersistError> {
    let mut written: u64 = 0;

    loop {
        let chunk = match chunks.next_chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => return Ok(written),
            Err(source) => {
                return Err(PersistError::Read {
                    path: path.to_path_buf(),
                    bytes_written: written,
                    source,
                });
            }
        };

        file.write_all(&chunk)
            .await
            .map_err(|source| PersistError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        written += chunk.len() as u64;
        trace!(chunk_len = chunk.len(), total = written, "Chunk written");
    }
}

async fn finish(file: &mut File) -> io::Result<()> {
    file.flush().await?;
    file.sync_all().await
}
