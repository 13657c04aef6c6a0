use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::adapter::{CancellationToken, DiscoverySink, MessageLevel, MessageLogger};
use crate::discovery::{DefaultContextFinder, ExampleFinder, ManifestLoader, ModuleLoader};
use crate::error::{Result, SettingsError};
use crate::navigation::SymbolSession;
use crate::output::TestCase;
use crate::settings::{RunSettings, TagFilter};

/// Counts for one multi-binary discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoverySummary {
    pub sources: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub test_cases: usize,
}

enum JobOutcome {
    Discovered(usize),
    Failed,
    Cancelled,
}

/// Discovers test cases across binaries, one independent job per binary.
///
/// A binary that fails to load or build is reported to the logger and
/// contributes no test cases; the other binaries are unaffected.
pub struct TestDiscoverer {
    loader: Arc<dyn ModuleLoader>,
    example_finder: ExampleFinder,
    tag_filter: TagFilter,
    parallel: bool,
    source_fallback: bool,
    cancel: CancellationToken,
}

impl TestDiscoverer {
    pub fn new(settings: &RunSettings) -> std::result::Result<Self, SettingsError> {
        Self::with_loader(Arc::new(ManifestLoader::default()), settings)
    }

    pub fn with_loader(
        loader: Arc<dyn ModuleLoader>,
        settings: &RunSettings,
    ) -> std::result::Result<Self, SettingsError> {
        let context_finder =
            DefaultContextFinder::new(loader.clone()).with_class_filter(settings.compile_class_filter()?);

        Ok(Self {
            loader,
            example_finder: ExampleFinder::new(context_finder),
            tag_filter: settings.tag_filter(),
            parallel: settings.parallel,
            source_fallback: settings.source_fallback,
            cancel: CancellationToken::new(),
        })
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn context_finder(&self) -> &DefaultContextFinder {
        self.example_finder.context_finder()
    }

    pub fn loader(&self) -> &dyn ModuleLoader {
        self.loader.as_ref()
    }

    pub fn discover_tests(
        &self,
        sources: &[PathBuf],
        logger: &dyn MessageLogger,
        sink: &dyn DiscoverySink,
    ) -> DiscoverySummary {
        let listed: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
        logger.send_message(
            MessageLevel::Informational,
            &format!("DiscoverTests for sources: {}", listed.join(";")),
        );

        let outcomes: Vec<JobOutcome> = if self.parallel {
            sources
                .par_iter()
                .map(|source| self.run_job(source, logger, sink))
                .collect()
        } else {
            sources
                .iter()
                .map(|source| self.run_job(source, logger, sink))
                .collect()
        };

        let mut summary = DiscoverySummary {
            sources: sources.len(),
            ..DiscoverySummary::default()
        };
        for outcome in outcomes {
            match outcome {
                JobOutcome::Discovered(count) => {
                    summary.succeeded += 1;
                    summary.test_cases += count;
                }
                JobOutcome::Failed => summary.failed += 1,
                JobOutcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }

    fn run_job(
        &self,
        source: &Path,
        logger: &dyn MessageLogger,
        sink: &dyn DiscoverySink,
    ) -> JobOutcome {
        if self.cancel.is_cancelled() {
            debug!("Discovery cancelled before {}", source.display());
            return JobOutcome::Cancelled;
        }

        logger.send_message(
            MessageLevel::Informational,
            &format!("Discovering tests in {}", source.display()),
        );

        match self.discover_source(source, sink) {
            Ok(count) => {
                logger.send_message(
                    MessageLevel::Informational,
                    &format!("Found {count} test cases in {}", source.display()),
                );
                JobOutcome::Discovered(count)
            }
            Err(e) => {
                logger.send_message(
                    MessageLevel::Error,
                    &format!("Failed to discover tests in {}: {e}", source.display()),
                );
                JobOutcome::Failed
            }
        }
    }

    /// Discovery job for one binary. The module and its symbol session stay
    /// open until every test case has been sent, and are released on return.
    pub fn discover_source(&self, binary_path: &Path, sink: &dyn DiscoverySink) -> Result<usize> {
        let module = self.loader.load(binary_path)?;
        let examples = self.example_finder.find_in_module(&module)?;
        let session = SymbolSession::open(&module, self.source_fallback);

        let mut count = 0;
        for example in examples.filter(|e| self.tag_filter.matches(e)) {
            let test_case = TestCase::from_example(&example, binary_path, &session);
            debug!(
                fqn = %test_case.fully_qualified_name,
                display_name = %test_case.display_name,
                line = ?test_case.line_number,
                "Found test case"
            );
            sink.send_test_case(test_case);
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::CollectingSink;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryLogger {
        messages: Mutex<Vec<(MessageLevel, String)>>,
    }

    impl MessageLogger for MemoryLogger {
        fn send_message(&self, level: MessageLevel, message: &str) {
            self.messages.lock().unwrap().push((level, message.to_string()));
        }
    }

    impl MemoryLogger {
        fn errors(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == MessageLevel::Error)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    fn write_module(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    const VALID: &str = r#"{ "module": "m", "types": [
        { "full_name": "m::describe_x", "base": "nspec",
          "methods": [ { "name": "it_a" }, { "name": "it_b", "attributes": [ { "name": "tag", "value": "slow" } ] } ] } ],
        "symbols": [ { "type": "m::describe_x", "method": "it_a", "file": "src/x.rs", "line": 5 } ] }"#;

    #[test]
    fn test_discovers_with_navigation() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_module(temp_dir.path(), "m.specs.json", VALID);

        let discoverer = TestDiscoverer::new(&RunSettings::default()).unwrap();
        let logger = MemoryLogger::default();
        let sink = CollectingSink::new();
        let summary = discoverer.discover_tests(std::slice::from_ref(&path), &logger, &sink);

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.test_cases, 2);

        let cases = sink.into_test_cases();
        assert_eq!(cases[0].fully_qualified_name, "nspec. describe x. it a");
        assert_eq!(cases[0].line_number, Some(5));
        assert_eq!(cases[0].code_file_path, Some(temp_dir.path().join("src/x.rs")));
        assert_eq!(cases[1].line_number, None);
        assert_eq!(cases[1].source, path);
    }

    #[test]
    fn test_failed_binary_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        let broken = write_module(temp_dir.path(), "broken.specs.json", "{ not json");
        let valid = write_module(temp_dir.path(), "m.specs.json", VALID);

        let discoverer = TestDiscoverer::new(&RunSettings::default()).unwrap();
        let logger = MemoryLogger::default();
        let sink = CollectingSink::new();
        let summary = discoverer.discover_tests(&[broken, valid], &logger, &sink);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(sink.len(), 2);
        assert_eq!(logger.errors().len(), 1);
        assert!(logger.errors()[0].contains("broken.specs.json"));
    }

    #[test]
    fn test_cancelled_run_skips_remaining_binaries() {
        let temp_dir = TempDir::new().unwrap();
        let valid = write_module(temp_dir.path(), "m.specs.json", VALID);

        let discoverer = TestDiscoverer::new(&RunSettings::default()).unwrap();
        discoverer.cancellation_token().cancel();

        let logger = MemoryLogger::default();
        let sink = CollectingSink::new();
        let summary = discoverer.discover_tests(&[valid], &logger, &sink);

        assert_eq!(summary.cancelled, 1);
        assert!(sink.is_empty());
        assert!(logger.errors().is_empty());
    }

    /// Cancels the run as soon as the first test case arrives.
    struct CancelOnFirstCase {
        token: CancellationToken,
        inner: CollectingSink,
    }

    impl DiscoverySink for CancelOnFirstCase {
        fn send_test_case(&self, test_case: TestCase) {
            self.token.cancel();
            self.inner.send_test_case(test_case);
        }
    }

    #[test]
    fn test_cancel_mid_run_keeps_reported_cases() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_module(temp_dir.path(), "first.specs.json", VALID);
        let second = write_module(temp_dir.path(), "second.specs.json", VALID);

        let discoverer = TestDiscoverer::new(&RunSettings::default()).unwrap();
        let sink = CancelOnFirstCase {
            token: discoverer.cancellation_token(),
            inner: CollectingSink::new(),
        };
        let summary =
            discoverer.discover_tests(&[first.clone(), second], &MemoryLogger::default(), &sink);

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.test_cases, 2);

        let cases = sink.inner.into_test_cases();
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.source == first));
    }

    #[test]
    fn test_tag_filter_applies() {
        let temp_dir = TempDir::new().unwrap();
        let valid = write_module(temp_dir.path(), "m.specs.json", VALID);

        let settings = RunSettings {
            exclude_tags: vec!["slow".to_string()],
            ..RunSettings::default()
        };
        let discoverer = TestDiscoverer::new(&settings).unwrap();
        let sink = CollectingSink::new();
        discoverer.discover_tests(&[valid], &MemoryLogger::default(), &sink);

        let cases = sink.into_test_cases();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].fully_qualified_name, "nspec. describe x. it a");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_module(temp_dir.path(), "a.specs.json", VALID);
        let b = write_module(temp_dir.path(), "b.specs.json", VALID);

        let settings = RunSettings {
            parallel: true,
            ..RunSettings::default()
        };
        let discoverer = TestDiscoverer::new(&settings).unwrap();
        let sink = CollectingSink::new();
        let summary = discoverer.discover_tests(&[a, b], &MemoryLogger::default(), &sink);

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.test_cases, 4);
        assert_eq!(sink.len(), 4);
    }
}
