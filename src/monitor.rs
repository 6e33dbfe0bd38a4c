//! Live tail of a growing log file.
//!
//! The monitor opens the file, seeks to its current end and then polls for
//! appended lines. Each complete line is classified and filtered exactly as in
//! a one-shot scan. Matches are handed to a [`MatchSink`] as soon as they are
//! seen and also accumulated into the returned [`MatchSet`].
//!
//! When no complete line is available the loop sleeps for the poll interval.
//! The sleep races the cancellation future, so cancelling never waits for a
//! full interval. Bytes after the last newline are held back until the line is
//! completed, so a line being written while we read is neither split nor
//! reported twice.

use crate::error::{Result, TriageError};
use crate::scanner::{LineMatcher, LogRecord, MatchSet};
use std::future::Future;
use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Receives every match the moment it is found
pub trait MatchSink {
    fn on_match(&mut self, record: &LogRecord);
}

impl MatchSink for Vec<LogRecord> {
    fn on_match(&mut self, record: &LogRecord) {
        self.push(record.clone());
    }
}

/// Discards matches; useful when only the final set is wanted
#[derive(Debug, Default)]
pub struct NullSink;

impl MatchSink for NullSink {
    fn on_match(&mut self, _record: &LogRecord) {}
}

#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub poll_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl MonitorOptions {
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Follow `path` until `cancel` resolves, returning every match seen.
///
/// Lines present before the call are skipped. A missing file fails with
/// [`TriageError::SourceNotFound`]; cancellation returns `Ok` with whatever
/// was accumulated.
pub async fn monitor_file<S, C>(
    path: impl AsRef<Path>,
    matcher: LineMatcher<'_>,
    options: MonitorOptions,
    sink: &mut S,
    cancel: C,
) -> Result<MatchSet>
where
    S: MatchSink + ?Sized,
    C: Future<Output = ()>,
{
    let path = path.as_ref();
    let mut file = File::open(path)
        .await
        .map_err(|e| TriageError::io(path, e))?;
    let offset = file
        .seek(SeekFrom::End(0))
        .await
        .map_err(|e| TriageError::io(path, e))?;

    tracing::info!(
        file = %path.display(),
        offset,
        poll_interval_ms = options.poll_interval.as_millis() as u64,
        "Monitoring started at end of file"
    );

    let mut reader = BufReader::new(file);
    let mut pending: Vec<u8> = Vec::new();
    let mut matches = MatchSet::new();
    tokio::pin!(cancel);

    loop {
        let read = reader
            .read_until(b'\n', &mut pending)
            .await
            .map_err(|e| TriageError::io(path, e))?;

        if read > 0 && pending.ends_with(b"\n") {
            let line = String::from_utf8_lossy(&pending).into_owned();
            pending.clear();
            if let Some(record) = matcher.evaluate(&line) {
                sink.on_match(&record);
                matches.push(record);
            }

            // Keep cancellation responsive while lines keep arriving
            tokio::select! {
                biased;
                _ = &mut cancel => break,
                _ = tokio::task::yield_now() => {}
            }
            continue;
        }

        tokio::select! {
            biased;
            _ = &mut cancel => break,
            _ = tokio::time::sleep(options.poll_interval) => {}
        }
    }

    if !pending.is_empty() {
        let line = String::from_utf8_lossy(&pending).into_owned();
        tracing::debug!(bytes = pending.len(), "Evaluating unterminated final line");
        if let Some(record) = matcher.evaluate(&line) {
            sink.on_match(&record);
            matches.push(record);
        }
    }

    tracing::info!(
        file = %path.display(),
        matches = matches.len(),
        "Monitoring cancelled"
    );

    Ok(matches)
}
