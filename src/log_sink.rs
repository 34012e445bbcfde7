//! Human-readable progress reporting.

use std::fmt::Debug;

/// One-way receiver for progress and error lines.
///
/// Lines arrive in processing order. The pipeline never reads anything back
/// from the sink.
pub trait LogSink {
    fn log(&mut self, message: &str);
}

impl<F> LogSink for F
where
    F: FnMut(&str),
{
    fn log(&mut self, message: &str) {
        self(message)
    }
}

impl LogSink for Vec<String> {
    fn log(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Sink around a callback that can fail, such as a JavaScript function or a
/// closed stderr. Failures are logged and counted; the pipeline keeps going.
pub struct FallibleSink<F> {
    callback: F,
    failures: usize,
}

impl<F, E> FallibleSink<F>
where
    F: FnMut(&str) -> Result<(), E>,
{
    pub fn new(callback: F) -> Self {
        Self { callback, failures: 0 }
    }

    /// Number of lines the callback failed to take.
    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl<F, E> LogSink for FallibleSink<F>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Debug,
{
    fn log(&mut self, message: &str) {
        if let Err(err) = (self.callback)(message) {
            self.failures += 1;
            log::debug!("progress callback failed on {message:?}: {err:?}");
        }
    }
}
