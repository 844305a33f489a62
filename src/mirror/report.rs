use std::fmt::{Display, Formatter, Result};

use jiff::Timestamp;

use super::DownloadError;

#[derive(Debug, Clone, PartialEq)]
pub struct FailedDownload {
    pub url: String,
    pub error: DownloadError,
}

/// Outcome of a mirror run. Failures that survive the retry pass stay in
/// `failed` so the caller can surface them instead of silently dropping them.
#[derive(Debug)]
pub struct MirrorReport {
    pub started: Timestamp,
    pub finished: Option<Timestamp>,
    pub downloaded: usize,
    pub recovered: usize,
    pub skipped: usize,
    pub failed: Vec<FailedDownload>,
}

impl MirrorReport {
    pub fn new() -> Self {
        MirrorReport {
            started: Timestamp::now(),
            finished: None,
            downloaded: 0,
            recovered: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, url: String, error: DownloadError) {
        self.failed.push(FailedDownload { url, error });
    }

    pub fn take_failures(&mut self) -> Vec<FailedDownload> {
        std::mem::take(&mut self.failed)
    }

    pub fn finish(&mut self) {
        self.finished = Some(Timestamp::now());
    }
}

impl Display for MirrorReport {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "Mirrored {} files ({} recovered on retry, {} excluded)",
            self.downloaded + self.recovered,
            self.recovered,
            self.skipped
        )?;
        if let Some(finished) = self.finished {
            if let Ok(span) = self.started.until(finished) {
                write!(f, " in {:#}", span)?;
            }
        }
        if !self.failed.is_empty() {
            write!(f, "\n{} files could not be downloaded:", self.failed.len())?;
            for fail in &self.failed {
                write!(f, "\n  {} ({})", fail.url, fail.error)?;
            }
        }
        Ok(())
    }
}
