use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use spec_adapter::adapter::{
    CollectingSink, RecordingFrameworkHandle, TestDiscoverer, TestExecutor, TestOutcome,
    TracingLogger,
};
use spec_adapter::cli::{self, Command};
use spec_adapter::discovery::{utils::expand_sources, ManifestLoader};
use spec_adapter::logging::{self, Verbosity};
use spec_adapter::output::OutputFormatter;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet))?;
    args.validate().context("Invalid arguments")?;

    let settings = args.run_settings()?;
    debug!("Run settings: {:?}", settings);

    let loader = Arc::new(ManifestLoader::default());
    let scan = expand_sources(&args.command.sources().paths, loader.as_ref());
    let sources = scan.files;
    info!(
        "Found {} module manifests ({} unreadable entries skipped)",
        sources.len(),
        scan.failures.len()
    );
    let scan_ok = scan.failures.is_empty();

    let discoverer = TestDiscoverer::with_loader(loader, &settings)
        .context("Invalid run settings")?;

    let (output, success) = match &args.command {
        Command::Discover(_) => {
            let sink = CollectingSink::new();
            let summary = discoverer.discover_tests(&sources, &TracingLogger, &sink);
            let test_cases = sink.into_test_cases();
            let output = OutputFormatter::format_discovery(&summary, &test_cases, args.format)?;
            (output, scan_ok && summary.failed == 0)
        }
        Command::Run(_) => {
            let executor = TestExecutor::new(discoverer);
            let handle = RecordingFrameworkHandle::new();
            executor.run_sources(&sources, &handle);
            let results = handle.into_results();
            let output = OutputFormatter::format_run(&results, args.format)?;
            let success = scan_ok
                && !results
                    .iter()
                    .any(|r| matches!(r.outcome, TestOutcome::Failed | TestOutcome::NotFound));
            (output, success)
        }
    };

    if let Some(ref output_file) = args.output_file {
        std::fs::write(output_file, &output)
            .with_context(|| format!("Failed to write output to {}", output_file.display()))?;
        info!("Output written to {}", output_file.display());
    } else {
        print!("{output}");
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
