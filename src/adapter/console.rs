use std::sync::Mutex;
use tracing::{error, info, warn};

use crate::adapter::{DiscoverySink, FrameworkHandle, MessageLevel, MessageLogger, TestResult};
use crate::output::TestCase;

/// Forwards host messages to `tracing`.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl MessageLogger for TracingLogger {
    fn send_message(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Informational => info!("{message}"),
            MessageLevel::Warning => warn!("{message}"),
            MessageLevel::Error => error!("{message}"),
        }
    }
}

/// Discovery sink that keeps every test case it receives.
#[derive(Debug, Default)]
pub struct CollectingSink {
    test_cases: Mutex<Vec<TestCase>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_test_cases(self) -> Vec<TestCase> {
        self.test_cases
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.test_cases
            .lock()
            .map(|cases| cases.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiscoverySink for CollectingSink {
    fn send_test_case(&self, test_case: TestCase) {
        if let Ok(mut cases) = self.test_cases.lock() {
            cases.push(test_case);
        }
    }
}

/// Framework handle that logs through `tracing` and keeps every result.
#[derive(Debug, Default)]
pub struct RecordingFrameworkHandle {
    logger: TracingLogger,
    started: Mutex<Vec<String>>,
    results: Mutex<Vec<TestResult>>,
}

impl RecordingFrameworkHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<String> {
        self.started
            .lock()
            .map(|started| started.clone())
            .unwrap_or_default()
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.results
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MessageLogger for RecordingFrameworkHandle {
    fn send_message(&self, level: MessageLevel, message: &str) {
        self.logger.send_message(level, message);
    }
}

impl FrameworkHandle for RecordingFrameworkHandle {
    fn record_start(&self, test_case: &TestCase) {
        if let Ok(mut started) = self.started.lock() {
            started.push(test_case.fully_qualified_name.clone());
        }
    }

    fn record_result(&self, result: TestResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push(result);
        }
    }
}
