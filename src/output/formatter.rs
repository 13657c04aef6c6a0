use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

use crate::adapter::{DiscoverySummary, TestOutcome, TestResult};
use crate::cli::OutputFormat;
use crate::output::TestCase;

#[derive(Debug, Serialize)]
pub struct DiscoveryOutput<'a> {
    pub sources_scanned: usize,
    pub sources_failed: usize,
    pub total_test_cases: usize,
    pub test_cases: &'a [TestCase],
}

#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub results: &'a [TestResult],
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_discovery(
        summary: &DiscoverySummary,
        test_cases: &[TestCase],
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => {
                let output = DiscoveryOutput {
                    sources_scanned: summary.sources,
                    sources_failed: summary.failed,
                    total_test_cases: test_cases.len(),
                    test_cases,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Text => {
                let mut out = String::new();
                for test_case in test_cases {
                    match (&test_case.code_file_path, test_case.line_number) {
                        (Some(file), Some(line)) => writeln!(
                            out,
                            "{}  ({}:{})",
                            test_case.display_name,
                            file.display(),
                            line
                        )?,
                        _ => writeln!(out, "{}", test_case.display_name)?,
                    }
                }
                writeln!(
                    out,
                    "{} test cases in {} sources ({} failed)",
                    test_cases.len(),
                    summary.sources,
                    summary.failed
                )?;
                Ok(out)
            }
        }
    }

    pub fn format_run(results: &[TestResult], format: OutputFormat) -> Result<String> {
        let count = |outcome: TestOutcome| results.iter().filter(|r| r.outcome == outcome).count();

        match format {
            OutputFormat::Json => {
                let output = RunOutput {
                    total: results.len(),
                    passed: count(TestOutcome::Passed),
                    failed: count(TestOutcome::Failed),
                    skipped: count(TestOutcome::Skipped),
                    not_found: count(TestOutcome::NotFound),
                    results,
                };
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Text => {
                let mut out = String::new();
                for result in results {
                    write!(out, "{:<9} {}", result.outcome.as_str(), result.test_case.display_name)?;
                    match &result.message {
                        Some(message) => writeln!(out, "  ({message})")?,
                        None => writeln!(out)?,
                    }
                }
                writeln!(
                    out,
                    "{} passed, {} failed, {} skipped, {} not found",
                    count(TestOutcome::Passed),
                    count(TestOutcome::Failed),
                    count(TestOutcome::Skipped),
                    count(TestOutcome::NotFound)
                )?;
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn summary() -> DiscoverySummary {
        DiscoverySummary {
            sources: 2,
            succeeded: 1,
            failed: 1,
            cancelled: 0,
            test_cases: 1,
        }
    }

    fn test_case() -> TestCase {
        let mut test_case = TestCase::new("nspec. account. it works", "bank.specs.json");
        test_case.code_file_path = Some(PathBuf::from("src/account.rs"));
        test_case.line_number = Some(4);
        test_case
    }

    #[test]
    fn test_discovery_json() {
        let out = OutputFormatter::format_discovery(&summary(), &[test_case()], OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sources_scanned"], 2);
        assert_eq!(value["sources_failed"], 1);
        assert_eq!(value["total_test_cases"], 1);
        assert_eq!(
            value["test_cases"][0]["fully_qualified_name"],
            "nspec. account. it works"
        );
        assert_eq!(value["test_cases"][0]["line_number"], 4);
    }

    #[test]
    fn test_discovery_text() {
        let out = OutputFormatter::format_discovery(&summary(), &[test_case()], OutputFormat::Text)
            .unwrap();
        assert!(out.contains("account › it works  (src/account.rs:4)"));
        assert!(out.contains("1 test cases in 2 sources (1 failed)"));
    }

    #[test]
    fn test_run_text() {
        let results = vec![TestResult {
            test_case: test_case(),
            outcome: TestOutcome::Skipped,
            message: Some("pending".to_string()),
        }];
        let out = OutputFormatter::format_run(&results, OutputFormat::Text).unwrap();
        assert!(out.contains("skipped   account › it works  (pending)"));
        assert!(out.contains("0 passed, 0 failed, 1 skipped, 0 not found"));
    }
}
