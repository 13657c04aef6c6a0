use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::adapter::{
    CollectingSink, FrameworkHandle, MessageLevel, MessageLogger, TestDiscoverer,
};
use crate::discovery::ContextFinder;
use crate::domain::{Example, HookChain};
use crate::output::TestCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed,
    Skipped,
    NotFound,
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one requested test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub test_case: TestCase,
    pub outcome: TestOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestResult {
    pub fn new(test_case: TestCase, outcome: TestOutcome, message: Option<String>) -> Self {
        Self {
            test_case,
            outcome,
            message,
        }
    }
}

/// Runs a single example together with its hook chain.
pub trait ExampleRunner: Send + Sync {
    fn run(&self, example: &Example, hooks: &HookChain) -> (TestOutcome, Option<String>);
}

/// Resolves examples without invoking their bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryOnlyRunner;

impl ExampleRunner for DiscoveryOnlyRunner {
    fn run(&self, example: &Example, hooks: &HookChain) -> (TestOutcome, Option<String>) {
        debug!(
            "Not executing {} ({}, hooks: {})",
            example.full_name(),
            example.body(),
            if hooks.is_empty() { "none" } else { "present" }
        );
        (
            TestOutcome::Skipped,
            Some("example bodies are not executed".to_string()),
        )
    }
}

struct HandleLogger<'a>(&'a dyn FrameworkHandle);

impl MessageLogger for HandleLogger<'_> {
    fn send_message(&self, level: MessageLevel, message: &str) {
        self.0.send_message(level, message);
    }
}

/// Runs requested test cases, grouped by the binary they came from.
///
/// Every requested test case that is started gets exactly one result. Once
/// cancelled, test cases not yet started are abandoned without a result.
pub struct TestExecutor<R: ExampleRunner = DiscoveryOnlyRunner> {
    discoverer: TestDiscoverer,
    runner: R,
}

impl TestExecutor<DiscoveryOnlyRunner> {
    pub fn new(discoverer: TestDiscoverer) -> Self {
        Self::with_runner(discoverer, DiscoveryOnlyRunner)
    }
}

impl<R: ExampleRunner> TestExecutor<R> {
    pub fn with_runner(discoverer: TestDiscoverer, runner: R) -> Self {
        Self { discoverer, runner }
    }

    pub fn cancel(&self) {
        info!("Test run cancelled");
        self.discoverer.cancellation_token().cancel();
    }

    pub fn discoverer(&self) -> &TestDiscoverer {
        &self.discoverer
    }

    /// Discovers every test case in `sources`, then runs them all.
    pub fn run_sources(&self, sources: &[PathBuf], handle: &dyn FrameworkHandle) {
        let sink = CollectingSink::new();
        self.discoverer
            .discover_tests(sources, &HandleLogger(handle), &sink);
        self.run_tests(&sink.into_test_cases(), handle);
    }

    pub fn run_tests(&self, tests: &[TestCase], handle: &dyn FrameworkHandle) {
        handle.send_message(
            MessageLevel::Informational,
            &format!("RunTests for {} test cases", tests.len()),
        );

        for (source, group) in group_by_source(tests) {
            if self.is_cancelled() {
                return;
            }

            let collection = match self.discoverer.context_finder().build_context_collection(&source) {
                Ok(collection) => collection,
                Err(e) => {
                    handle.send_message(
                        MessageLevel::Error,
                        &format!("Failed to load {}: {e}", source.display()),
                    );
                    for test_case in group {
                        if self.is_cancelled() {
                            return;
                        }
                        handle.record_start(test_case);
                        handle.record_result(TestResult::new(
                            test_case.clone(),
                            TestOutcome::Failed,
                            Some(format!("could not load source: {e}")),
                        ));
                    }
                    continue;
                }
            };

            let by_name: HashMap<&str, &Example> =
                collection.examples().map(|e| (e.full_name(), e)).collect();

            for test_case in group {
                if self.is_cancelled() {
                    return;
                }

                handle.record_start(test_case);
                let (outcome, message) = match by_name.get(test_case.fully_qualified_name.as_str()) {
                    None => (
                        TestOutcome::NotFound,
                        Some("no matching example in source".to_string()),
                    ),
                    Some(example) if example.is_pending() => {
                        (TestOutcome::Skipped, Some("pending".to_string()))
                    }
                    Some(example) if example.is_skipped() => {
                        (TestOutcome::Skipped, Some("skipped".to_string()))
                    }
                    Some(example) => match collection.hooks_for(example) {
                        Some(hooks) => self.runner.run(example, hooks),
                        None => (
                            TestOutcome::Failed,
                            Some("example has no context in its source".to_string()),
                        ),
                    },
                };

                debug!("{} -> {outcome}", test_case.fully_qualified_name);
                handle.record_result(TestResult::new(test_case.clone(), outcome, message));
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.discoverer.cancellation_token().is_cancelled()
    }
}

/// Groups test cases by source, keeping first-seen order of sources and
/// request order within each source.
fn group_by_source(tests: &[TestCase]) -> Vec<(PathBuf, Vec<&TestCase>)> {
    let mut groups: Vec<(PathBuf, Vec<&TestCase>)> = Vec::new();
    for test_case in tests {
        match groups.iter_mut().find(|(source, _)| *source == test_case.source) {
            Some((_, group)) => group.push(test_case),
            None => groups.push((test_case.source.clone(), vec![test_case])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RecordingFrameworkHandle;
    use crate::settings::RunSettings;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const MODULE: &str = r#"
module: m
types:
  - full_name: m::describe_x
    base: nspec
    methods:
      - name: before_each
      - name: it_runs
      - name: xit_waits
      - name: it_is_skipped
        attributes:
          - { name: skip }
"#;

    fn write_module(dir: &Path) -> PathBuf {
        let path = dir.join("m.specs.yaml");
        fs::write(&path, MODULE).unwrap();
        path
    }

    fn executor() -> TestExecutor {
        TestExecutor::new(TestDiscoverer::new(&RunSettings::default()).unwrap())
    }

    struct AlwaysPasses;

    impl ExampleRunner for AlwaysPasses {
        fn run(&self, _example: &Example, hooks: &HookChain) -> (TestOutcome, Option<String>) {
            assert!(!hooks.is_empty());
            (TestOutcome::Passed, None)
        }
    }

    #[test]
    fn test_outcome_per_requested_test() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_module(temp_dir.path());

        let tests = vec![
            TestCase::new("nspec. describe x. it runs", &source),
            TestCase::new("nspec. describe x. it waits", &source),
            TestCase::new("nspec. describe x. it is skipped", &source),
            TestCase::new("nspec. describe x. it vanished", &source),
        ];

        let executor = TestExecutor::with_runner(
            TestDiscoverer::new(&RunSettings::default()).unwrap(),
            AlwaysPasses,
        );
        let handle = RecordingFrameworkHandle::new();
        executor.run_tests(&tests, &handle);

        assert_eq!(handle.started().len(), 4);
        let outcomes: Vec<TestOutcome> = handle.into_results().iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                TestOutcome::Passed,
                TestOutcome::Skipped,
                TestOutcome::Skipped,
                TestOutcome::NotFound,
            ]
        );
    }

    #[test]
    fn test_default_runner_skips() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_module(temp_dir.path());

        let handle = RecordingFrameworkHandle::new();
        executor().run_tests(&[TestCase::new("nspec. describe x. it runs", &source)], &handle);

        let results = handle.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, TestOutcome::Skipped);
    }

    #[test]
    fn test_unloadable_source_fails_its_tests() {
        let tests = vec![
            TestCase::new("nspec. a. it one", "/nonexistent/a.specs.json"),
            TestCase::new("nspec. a. it two", "/nonexistent/a.specs.json"),
        ];

        let handle = RecordingFrameworkHandle::new();
        executor().run_tests(&tests, &handle);

        let results = handle.into_results();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.outcome == TestOutcome::Failed));
    }

    #[test]
    fn test_run_sources_discovers_then_runs() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_module(temp_dir.path());

        let handle = RecordingFrameworkHandle::new();
        executor().run_sources(&[source], &handle);

        assert_eq!(handle.into_results().len(), 3);
    }

    #[test]
    fn test_cancelled_run_reports_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_module(temp_dir.path());

        let executor = executor();
        executor.cancel();

        let handle = RecordingFrameworkHandle::new();
        executor.run_tests(&[TestCase::new("nspec. describe x. it runs", &source)], &handle);

        assert!(handle.started().is_empty());
        assert!(handle.into_results().is_empty());
    }

    /// Records like the host would, cancelling after the first result.
    struct CancelAfterFirstResult {
        token: crate::adapter::CancellationToken,
        inner: RecordingFrameworkHandle,
    }

    impl MessageLogger for CancelAfterFirstResult {
        fn send_message(&self, level: MessageLevel, message: &str) {
            self.inner.send_message(level, message);
        }
    }

    impl FrameworkHandle for CancelAfterFirstResult {
        fn record_start(&self, test_case: &TestCase) {
            self.inner.record_start(test_case);
        }

        fn record_result(&self, result: TestResult) {
            self.inner.record_result(result);
            self.token.cancel();
        }
    }

    #[test]
    fn test_cancel_mid_run_abandons_remaining_cases() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_module(temp_dir.path());
        let second_dir = TempDir::new().unwrap();
        let second = write_module(second_dir.path());

        let tests = vec![
            TestCase::new("nspec. describe x. it runs", &first),
            TestCase::new("nspec. describe x. it waits", &first),
            TestCase::new("nspec. describe x. it runs", &second),
        ];

        let executor = executor();
        let handle = CancelAfterFirstResult {
            token: executor.discoverer().cancellation_token(),
            inner: RecordingFrameworkHandle::new(),
        };
        executor.run_tests(&tests, &handle);

        assert_eq!(handle.inner.started(), vec!["nspec. describe x. it runs"]);
        let results = handle.inner.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].test_case.source, first);
    }

    #[test]
    fn test_group_by_source_keeps_order() {
        let tests = vec![
            TestCase::new("a1", "a"),
            TestCase::new("b1", "b"),
            TestCase::new("a2", "a"),
        ];
        let groups = group_by_source(&tests);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, PathBuf::from("a"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1[0].fully_qualified_name, "b1");
    }
}
