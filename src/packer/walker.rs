use crate::utils::error::PackError;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Options controlling which folders and files the scan picks up.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Query file extension without the leading dot (e.g. `kql`)
    pub extension: String,
    /// Folders whose label contains any of these substrings are skipped
    pub exclude: Vec<String>,
    /// Label used for query files directly under the scan root
    pub root_label: String,
}

impl ScanOptions {
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            exclude: Vec::new(),
            root_label: "root".to_string(),
        }
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_root_label(mut self, root_label: impl Into<String>) -> Self {
        self.root_label = root_label.into();
        self
    }

    /// Whether a folder label matches one of the excluded substrings.
    pub fn is_excluded(&self, label: &str) -> bool {
        self.exclude
            .iter()
            .any(|skip| !skip.is_empty() && label.contains(skip.as_str()))
    }

    fn is_query_file(&self, path: &Path) -> bool {
        let suffix = format!(".{}", self.extension);
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&suffix))
    }
}

/// A folder holding at least one query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFolder {
    /// Path relative to the scan root with `/` separators, or the root label
    pub label: String,
    /// Absolute (or root-joined) directory path
    pub dir: PathBuf,
    /// Query files in this folder, sorted by file name
    pub files: Vec<PathBuf>,
}

/// Normalize path to a forward-slash separated string.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn folder_label(root: &Path, dir: &Path, root_label: &str) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => root_label.to_string(),
        Ok(rel) => normalize_path(rel),
        Err(_) => normalize_path(dir),
    }
}

/// Walk `root` and group query files by the folder that contains them.
///
/// Folders come back ordered by label and files by name, so repeated runs over
/// the same tree produce the same sequence. Excluded folders are dropped here
/// and never reach the parser.
pub fn scan_folders(root: &Path, options: &ScanOptions) -> Result<Vec<QueryFolder>, PackError> {
    if !root.is_dir() {
        return Err(PackError::input_not_found(root));
    }

    // The corpus is taken as-is: no ignore files, hidden folders included.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut folders: BTreeMap<String, QueryFolder> = BTreeMap::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error walking directory: {}", e);
                continue;
            }
        };

        // Symlinked query files are read through; links to directories are not followed.
        if !entry.path().is_file() {
            continue;
        }

        let path = entry.path();
        if !options.is_query_file(path) {
            continue;
        }

        let Some(dir) = path.parent() else {
            continue;
        };

        let label = folder_label(root, dir, &options.root_label);
        folders
            .entry(label.clone())
            .or_insert_with(|| QueryFolder {
                label,
                dir: dir.to_path_buf(),
                files: Vec::new(),
            })
            .files
            .push(path.to_path_buf());
    }

    let mut result = Vec::with_capacity(folders.len());
    for (label, mut folder) in folders {
        if options.is_excluded(&label) {
            tracing::debug!("Skipping excluded folder: {}", label);
            continue;
        }
        folder.files.sort();
        result.push(folder);
    }

    tracing::debug!("Found {} folders with query files", result.len());
    Ok(result)
}
