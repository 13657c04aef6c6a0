//! Host-facing shim: discovery and execution entry points, and the sink and
//! logger contracts a test host provides.

pub mod cancel;
pub mod console;
pub mod discoverer;
pub mod executor;

pub use cancel::CancellationToken;
pub use console::{CollectingSink, RecordingFrameworkHandle, TracingLogger};
pub use discoverer::{DiscoverySummary, TestDiscoverer};
pub use executor::{DiscoveryOnlyRunner, ExampleRunner, TestExecutor, TestOutcome, TestResult};

use crate::output::TestCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Informational,
    Warning,
    Error,
}

/// Diagnostics channel of the host; never used for control flow.
pub trait MessageLogger: Send + Sync {
    fn send_message(&self, level: MessageLevel, message: &str);
}

pub trait DiscoverySink: Send + Sync {
    fn send_test_case(&self, test_case: TestCase);
}

/// Result channel of the host during execution.
pub trait FrameworkHandle: MessageLogger {
    fn record_start(&self, test_case: &TestCase);

    fn record_result(&self, result: TestResult);
}
