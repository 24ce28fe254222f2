//! Mock transport for testing without hardware.
//!
//! Records every report written and supports assertions and failure
//! simulation.
//!
//! # Example
//!
//! ```rust
//! use steelkeys::device::mock::{MockTransport, Report};
//! use steelkeys::device::HidTransport;
//!
//! let mock = MockTransport::new();
//! mock.send_feature_report(&[0x0e, 0x00, 0x2a, 0x00]).unwrap();
//!
//! mock.assert_reports(&[Report::Feature(vec![0x0e, 0x00, 0x2a, 0x00])]);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use super::HidTransport;
use super::dispatcher::REFRESH_REPORT;
use crate::error::{Result, SkError};

/// A recorded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Feature(Vec<u8>),
    Output(Vec<u8>),
}

impl Report {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Feature(data) | Self::Output(data) => data,
        }
    }

    /// True for the lighting refresh output report.
    pub fn is_refresh(&self) -> bool {
        matches!(self, Self::Output(data) if data.as_slice() == REFRESH_REPORT)
    }
}

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Fail every write after N successful ones.
    pub fail_after_ops: Option<usize>,
    /// Report this many bytes fewer than were written.
    pub short_write: usize,
    /// Initial connection state.
    pub connected: bool,
}

impl MockConfig {
    /// Create a connected mock configuration.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }
}

/// Transport that records reports instead of writing them.
#[derive(Debug)]
pub struct MockTransport {
    reports: Mutex<Vec<Report>>,
    error_injection: Mutex<Option<SkError>>,
    config: MockConfig,
    connected: AtomicBool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::connected())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        debug!(?config, "Creating mock transport");
        Self {
            reports: Mutex::new(Vec::new()),
            error_injection: Mutex::new(None),
            connected: AtomicBool::new(config.connected),
            config,
        }
    }

    #[must_use]
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder::default()
    }

    // === Failure simulation ===

    /// Inject an error for the next write.
    pub fn inject_error(&self, error: SkError) {
        *lock(&self.error_injection) = Some(error);
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    // === Assertions ===

    /// All recorded reports.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        lock(&self.reports).clone()
    }

    /// Recorded feature reports only.
    #[must_use]
    pub fn feature_reports(&self) -> Vec<Vec<u8>> {
        lock(&self.reports)
            .iter()
            .filter_map(|report| match report {
                Report::Feature(data) => Some(data.clone()),
                Report::Output(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn report_count(&self) -> usize {
        lock(&self.reports).len()
    }

    #[must_use]
    pub fn refresh_count(&self) -> usize {
        lock(&self.reports).iter().filter(|r| r.is_refresh()).count()
    }

    /// Assert the exact report sequence.
    ///
    /// # Panics
    ///
    /// Panics if the reports don't match.
    pub fn assert_reports(&self, expected: &[Report]) {
        let actual = self.reports();
        assert_eq!(
            actual, expected,
            "Report mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert nothing was written.
    ///
    /// # Panics
    ///
    /// Panics if any report was recorded.
    pub fn assert_no_reports(&self) {
        let reports = self.reports();
        assert!(
            reports.is_empty(),
            "Expected no reports, but found: {reports:#?}",
        );
    }

    /// Assert the log ends with exactly one refresh and contains no other.
    ///
    /// # Panics
    ///
    /// Panics if the last report is not the only refresh.
    pub fn assert_single_trailing_refresh(&self) {
        let reports = self.reports();
        assert!(
            reports.last().is_some_and(Report::is_refresh),
            "Expected a trailing refresh in: {reports:#?}",
        );
        assert_eq!(self.refresh_count(), 1, "Expected exactly one refresh");
    }

    pub fn clear_reports(&self) {
        lock(&self.reports).clear();
    }

    // === Internal helpers ===

    fn check_error(&self) -> Result<()> {
        if let Some(error) = lock(&self.error_injection).take() {
            return Err(error);
        }

        if !self.is_connected() {
            return Err(SkError::Transport("mock transport disconnected".to_string()));
        }

        if let Some(limit) = self.config.fail_after_ops {
            if lock(&self.reports).len() >= limit {
                return Err(SkError::Transport(
                    "mock failure after write limit".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn record(&self, report: Report) -> usize {
        let len = report.bytes().len();
        trace!(?report, "Recording report");
        lock(&self.reports).push(report);
        len.saturating_sub(self.config.short_write)
    }
}

impl HidTransport for MockTransport {
    fn send_feature_report(&self, data: &[u8]) -> Result<usize> {
        self.check_error()?;
        Ok(self.record(Report::Feature(data.to_vec())))
    }

    fn write_output_report(&self, data: &[u8]) -> Result<usize> {
        self.check_error()?;
        Ok(self.record(Report::Output(data.to_vec())))
    }
}

/// Builder for `MockTransport` failure scenarios.
#[derive(Debug)]
pub struct MockTransportBuilder {
    config: MockConfig,
}

impl Default for MockTransportBuilder {
    fn default() -> Self {
        Self {
            config: MockConfig::connected(),
        }
    }
}

impl MockTransportBuilder {
    /// Fail every write after N successful ones.
    #[must_use]
    pub fn fail_after(mut self, ops: usize) -> Self {
        self.config.fail_after_ops = Some(ops);
        self
    }

    /// Under-report every write by `missing` bytes.
    #[must_use]
    pub fn short_write(mut self, missing: usize) -> Self {
        self.config.short_write = missing;
        self
    }

    #[must_use]
    pub fn disconnected(mut self) -> Self {
        self.config.connected = false;
        self
    }

    #[must_use]
    pub fn build(self) -> MockTransport {
        MockTransport::with_config(self.config)
    }
}
