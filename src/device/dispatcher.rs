//! Transport dispatcher: paced report writes with length checks.

use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use super::HidTransport;
use crate::error::{Result, SkError};

/// Pause after every report write. The firmware drops reports that arrive
/// back to back.
pub const INTER_COMMAND_DELAY: Duration = Duration::from_millis(10);

/// Output report committing pending lighting changes.
pub const REFRESH_REPORT: [u8; 64] = {
    let mut report = [0u8; 64];
    report[0] = 0x09;
    report
};

/// Sends reports to a transport one at a time.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: T,
    delay: Duration,
}

impl<T: HidTransport> Dispatcher<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            delay: INTER_COMMAND_DELAY,
        }
    }

    /// Override the inter-report delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Send feature reports in order. The first failure aborts the rest.
    pub fn send_feature_reports<I, P>(&self, reports: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut sent = 0;
        for report in reports {
            self.send_feature_report(report.as_ref())?;
            sent += 1;
        }
        debug!(sent, "Feature reports sent");
        Ok(sent)
    }

    /// Send one feature report. The delay is observed even when it fails.
    pub fn send_feature_report(&self, data: &[u8]) -> Result<()> {
        let written = self.transport.send_feature_report(data);
        self.settle();
        check_written("feature", written?, data.len())
    }

    pub fn send_output_report(&self, data: &[u8]) -> Result<()> {
        let written = self.transport.write_output_report(data);
        self.settle();
        check_written("output", written?, data.len())
    }

    /// Commit pending changes.
    pub fn refresh(&self) -> Result<()> {
        trace!("Sending refresh");
        self.send_output_report(&REFRESH_REPORT)
    }

    fn settle(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

fn check_written(kind: &str, written: usize, expected: usize) -> Result<()> {
    trace!(kind, written, expected, "Report written");
    if written == expected {
        Ok(())
    } else {
        Err(SkError::Transport(format!(
            "{kind} report: wrote {written} of {expected} bytes"
        )))
    }
}
