use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

use crate::discovery::loader::ModuleLoader;
use crate::error::LoadError;

pub const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", "incremental", "deps"];

/// Module files found under the given sources, plus the directory entries
/// that could not be scanned.
#[derive(Debug, Default)]
pub struct SourceScan {
    pub files: Vec<PathBuf>,
    pub failures: Vec<LoadError>,
}

impl SourceScan {
    fn extend(&mut self, other: SourceScan) {
        self.files.extend(other.files);
        self.failures.extend(other.failures);
    }
}

/// Expands the given source paths into module files.
///
/// Files are kept as given, whatever their extension, so an unsupported file
/// is still reported as a load failure for that source. Directories are
/// walked for files the loader supports; an entry that cannot be read is
/// logged and skipped without affecting the other sources.
pub fn expand_sources(sources: &[PathBuf], loader: &dyn ModuleLoader) -> SourceScan {
    let mut scan = SourceScan::default();

    for source in sources {
        if source.is_dir() {
            scan.extend(walk_module_files(source, loader, EXCLUDED_DIRS));
        } else {
            scan.files.push(source.clone());
        }
    }

    scan
}

pub fn walk_module_files(
    root: &Path,
    loader: &dyn ModuleLoader,
    excluded_dirs: &[&str],
) -> SourceScan {
    let mut scan = SourceScan::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() && e.depth() > 0 {
                let name = e.file_name().to_string_lossy();
                !excluded_dirs.contains(&name.as_ref())
            } else {
                true
            }
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let failure = LoadError::DirectoryScan {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    source: e,
                };
                error!("{failure}");
                scan.failures.push(failure);
                continue;
            }
        };

        if entry.file_type().is_file() && loader.is_supported(entry.path()) {
            scan.files.push(entry.path().to_path_buf());
        }
    }

    scan
}
