use std::collections::BTreeMap;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CensusConfig;
use crate::types::SourceFile;

pub const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts", "vue", "svelte"];
pub const TYPE_SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "vue", "svelte"];
pub const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less"];
pub const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "vue", "svelte", "astro"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "avif"];

pub fn is_script(file: &SourceFile) -> bool {
    SCRIPT_EXTENSIONS.contains(&file.extension().as_str())
}

pub fn is_type_source(file: &SourceFile) -> bool {
    TYPE_SOURCE_EXTENSIONS.contains(&file.extension().as_str())
}

pub fn is_style(file: &SourceFile) -> bool {
    STYLE_EXTENSIONS.contains(&file.extension().as_str())
}

pub fn is_markup(file: &SourceFile) -> bool {
    MARKUP_EXTENSIONS.contains(&file.extension().as_str())
}

pub fn is_image(file: &SourceFile) -> bool {
    IMAGE_EXTENSIONS.contains(&file.extension().as_str())
}

pub fn is_manifest(file: &SourceFile) -> bool {
    file.file_name() == "package.json"
}

/// Files whose text can reference symbols or assets: scripts, styles, markup
/// and manifests.
pub fn is_referencing(file: &SourceFile) -> bool {
    is_script(file) || is_style(file) || is_markup(file) || is_manifest(file)
}

/// Path exclusions applied before any analyzer sees the collection.
pub struct ExclusionFilter {
    substrings: Vec<String>,
    globs: Option<GlobSet>,
}

impl ExclusionFilter {
    /// Invalid glob patterns are logged and skipped; the engine never fails on config.
    pub fn new(config: &CensusConfig) -> Self {
        let globs = if config.exclude_globs.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &config.exclude_globs {
                match Glob::new(pattern) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(e) => warn!("ignoring exclude glob {pattern:?}: {e}"),
                }
            }
            builder.build().ok()
        };
        Self {
            substrings: config.exclude.clone(),
            globs,
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        let anchored = format!("/{path}");
        let substring_hit = self.substrings.iter().any(|pattern| {
            if pattern.starts_with('/') {
                anchored.contains(pattern.as_str())
            } else {
                anchored.contains(&format!("/{pattern}"))
            }
        });
        substring_hit || self.globs.as_ref().is_some_and(|g| g.is_match(path))
    }
}

/// File-type counts of the analyzed snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCensus {
    pub total_files: usize,
    pub excluded_files: usize,
    pub script_files: usize,
    pub style_files: usize,
    pub markup_files: usize,
    pub asset_files: usize,
    pub by_extension: BTreeMap<String, usize>,
}

/// Drop excluded files and count what is left.
pub fn census(files: &[SourceFile], filter: &ExclusionFilter) -> (Vec<SourceFile>, FileCensus) {
    let mut kept = Vec::with_capacity(files.len());
    let mut census = FileCensus::default();

    for file in files {
        if filter.is_excluded(&file.path) {
            census.excluded_files += 1;
            continue;
        }
        census.total_files += 1;
        if is_script(file) {
            census.script_files += 1;
        }
        if is_style(file) {
            census.style_files += 1;
        }
        if is_markup(file) {
            census.markup_files += 1;
        }
        if is_image(file) {
            census.asset_files += 1;
        }
        let ext = file.extension();
        let key = if ext.is_empty() { "(none)".to_string() } else { ext };
        *census.by_extension.entry(key).or_insert(0) += 1;
        kept.push(file.clone());
    }

    (kept, census)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SourceFile {
        SourceFile::new(path, "")
    }

    #[test]
    fn selection_by_extension() {
        assert!(is_script(&file("src/App.tsx")));
        assert!(is_script(&file("src/App.vue")));
        assert!(is_markup(&file("src/App.vue")));
        assert!(is_style(&file("styles/main.scss")));
        assert!(is_markup(&file("index.html")));
        assert!(is_image(&file("assets/logo.PNG")));
        assert!(is_manifest(&file("web/package.json")));
        assert!(!is_referencing(&file("README.md")));
        assert!(is_type_source(&file("types/api.d.ts")));
        assert!(!is_type_source(&file("src/util.js")));
    }

    #[test]
    fn default_exclusions_are_segment_anchored() {
        let filter = ExclusionFilter::new(&CensusConfig::default());
        assert!(filter.is_excluded("node_modules/react/index.js"));
        assert!(filter.is_excluded("web/dist/bundle.js"));
        assert!(filter.is_excluded(".git/HEAD"));
        assert!(!filter.is_excluded("src/rebuild/index.js"));
        assert!(!filter.is_excluded("src/distance.js"));
    }

    #[test]
    fn glob_exclusions() {
        let config = CensusConfig {
            exclude: Vec::new(),
            exclude_globs: vec!["**/*.stories.tsx".to_string(), "bad[".to_string()],
        };
        let filter = ExclusionFilter::new(&config);
        assert!(filter.is_excluded("src/Button.stories.tsx"));
        assert!(!filter.is_excluded("src/Button.tsx"));
    }

    #[test]
    fn census_counts_and_filters() {
        let files = vec![
            file("src/a.ts"),
            file("src/b.css"),
            file("index.html"),
            file("public/logo.png"),
            file("node_modules/x/index.js"),
            file("LICENSE"),
        ];
        let filter = ExclusionFilter::new(&CensusConfig::default());
        let (kept, census) = census(&files, &filter);
        assert_eq!(kept.len(), 5);
        assert_eq!(census.total_files, 5);
        assert_eq!(census.excluded_files, 1);
        assert_eq!(census.script_files, 1);
        assert_eq!(census.style_files, 1);
        assert_eq!(census.markup_files, 1);
        assert_eq!(census.asset_files, 1);
        assert_eq!(census.by_extension.get("(none)"), Some(&1));
        assert_eq!(census.by_extension.get("ts"), Some(&1));
    }

    #[test]
    fn empty_census() {
        let filter = ExclusionFilter::new(&CensusConfig::default());
        let (kept, census) = census(&[], &filter);
        assert!(kept.is_empty());
        assert_eq!(census, FileCensus::default());
    }
}
