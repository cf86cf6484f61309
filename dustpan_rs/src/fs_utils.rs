use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analyzer::classify::{ExclusionFilter, is_image};
use crate::config::CensusConfig;
use crate::error::{DustpanError, Result};
use crate::types::SourceFile;

/// Forward-slash path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the file snapshot for `root`.
///
/// Excluded directories are not descended into. Images are recorded with empty
/// content; other files that are not UTF-8 text, or cannot be read, are skipped.
/// Files come back ordered by path.
pub fn load_project(root: &Path, census: &CensusConfig) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        return Err(DustpanError::NotADirectory(root.to_path_buf()));
    }
    let filter = ExclusionFilter::new(census);
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let dir = format!("{}/", relative_path(root, entry.path()));
            !filter.is_excluded(&dir)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = relative_path(root, entry.path());
        let mut file = SourceFile::new(path, String::new());
        if is_image(&file) {
            files.push(file);
            continue;
        }
        match fs::read_to_string(entry.path()) {
            Ok(content) => {
                file.content = content;
                files.push(file);
            }
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                debug!(path = %file.path, "skipping non-UTF-8 file");
            }
            Err(err) => {
                warn!(path = %file.path, "skipping unreadable file: {err}");
            }
        }
    }

    debug!(root = %root.display(), files = files.len(), "project loaded");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_text_and_images_with_relative_paths() {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path();
        fs::create_dir_all(root.join("src/components")).expect("mkdir");
        fs::create_dir_all(root.join("node_modules/react")).expect("mkdir");
        fs::write(root.join("src/components/Button.tsx"), "export const Button = 1;").expect("write");
        fs::write(root.join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff]).expect("write");
        fs::write(root.join("font.woff2"), [0xff, 0xfe, 0x00]).expect("write");
        fs::write(root.join("node_modules/react/index.js"), "module.exports = {};").expect("write");

        let files = load_project(root, &CensusConfig::default()).expect("load");
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["logo.png", "src/components/Button.tsx"]);
        assert!(files[0].content.is_empty());
        assert_eq!(files[1].content, "export const Button = 1;");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let err = load_project(&temp.path().join("nope"), &CensusConfig::default()).unwrap_err();
        assert!(matches!(err, DustpanError::NotADirectory(_)));
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/project");
        assert_eq!(relative_path(root, &root.join("src").join("a.js")), "src/a.js");
    }
}
