//! # Cooperative Decode Jobs
//!
//! Large captures are decoded in batches of `batch_size` opcodes with a
//! yield to the async runtime between batches, so a server or UI task is
//! never blocked for the whole capture.
//!
//! Cancellation is checked between batches only; a batch always runs to
//! its end.
//!
//! ```
//! use ptdecode::decode::{DecodeJob, DecodeOptions};
//! use ptdecode::protocol::commands;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let capture = commands::stream([commands::init(), commands::raster_line(&[0xFF])]);
//! let job = DecodeJob::new(capture, DecodeOptions::default());
//! let decoded = job.run().await.unwrap();
//! assert_eq!(decoded.width, 1);
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::decoder::{Decoder, Step};
use super::options::DecodeOptions;
use super::trace::TraceSink;
use super::{DecodeFailure, Decoded};

/// Shared flag a host flips to stop a running job.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A decode job that owns its capture.
#[derive(Debug)]
pub struct DecodeJob {
    buffer: Vec<u8>,
    options: DecodeOptions,
    cancel: CancelHandle,
}

impl DecodeJob {
    pub fn new(buffer: Vec<u8>, options: DecodeOptions) -> Self {
        Self {
            buffer,
            options,
            cancel: CancelHandle::new(),
        }
    }

    /// Handle that stops this job before its next batch.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Decode the capture, yielding between batches.
    pub async fn run(self) -> Result<Decoded, DecodeFailure> {
        if self.options.trace {
            let decoder = Decoder::with_sink(&self.buffer, &self.options, Vec::new());
            drive(decoder, self.options.batch_size, &self.cancel).await
        } else {
            let decoder = Decoder::new(&self.buffer, &self.options);
            drive(decoder, self.options.batch_size, &self.cancel).await
        }
    }
}

async fn drive<S: TraceSink>(
    mut decoder: Decoder<'_, S>,
    batch_size: usize,
    cancel: &CancelHandle,
) -> Result<Decoded, DecodeFailure> {
    loop {
        if cancel.is_cancelled() {
            log::info!("Decode cancelled after {} opcodes", decoder.opcodes());
            return Ok(decoder.finish());
        }

        match decoder.step(batch_size) {
            Ok(Step::Continue) => tokio::task::yield_now().await,
            Ok(Step::Halted(_)) => return Ok(decoder.finish()),
            Err(error) => {
                log::warn!("Decode aborted: {}", error);
                return Err(DecodeFailure {
                    error,
                    partial: Box::new(decoder.finish()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeErrorKind, Halt};
    use crate::protocol::commands;

    fn long_capture(lines: usize) -> Vec<u8> {
        let mut parts = vec![commands::init()];
        parts.extend((0..lines).map(|_| commands::raster_line(&[0xF0, 0x0F])));
        commands::stream(parts)
    }

    #[tokio::test]
    async fn test_job_runs_to_end() {
        let job = DecodeJob::new(long_capture(100), DecodeOptions::traced());
        let decoded = job.run().await.unwrap();
        assert_eq!(decoded.halt, Halt::EndOfStream);
        assert_eq!(decoded.width, 100);
        assert_eq!(decoded.opcodes, 101);
        assert!(decoded.trace.is_some());
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let job = DecodeJob::new(long_capture(100), DecodeOptions::default());
        job.cancel_handle().cancel();
        let decoded = job.run().await.unwrap();
        assert_eq!(decoded.halt, Halt::Cancelled);
        assert_eq!(decoded.opcodes, 0);
    }

    #[tokio::test]
    async fn test_cancel_between_batches() {
        let options = DecodeOptions {
            batch_size: 1,
            ..DecodeOptions::default()
        };
        let job = DecodeJob::new(long_capture(1000), options);
        let cancel = job.cancel_handle();
        let task = tokio::spawn(job.run());

        // Let the job run its first batch and yield back
        tokio::task::yield_now().await;
        cancel.cancel();

        let decoded = task.await.unwrap().unwrap();
        assert_eq!(decoded.halt, Halt::Cancelled);
        assert!(decoded.opcodes > 0);
        assert!(decoded.opcodes < 1001);
        assert_eq!(decoded.width as usize, decoded.opcodes - 1);
    }

    #[tokio::test]
    async fn test_error_keeps_partial_image() {
        let mut capture = long_capture(3);
        capture.push(0xC8);
        let job = DecodeJob::new(capture, DecodeOptions::default());
        let failure = job.run().await.unwrap_err();
        assert_eq!(failure.error.kind, DecodeErrorKind::UnrecognizedOpcode);
        assert_eq!(failure.partial.width, 3);
        assert_eq!(failure.partial.halt, Halt::Aborted { position: 17 });
    }
}
