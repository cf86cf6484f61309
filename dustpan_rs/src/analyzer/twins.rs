//! Duplicate function names across files, flagged as similar when the bodies
//! that follow each declaration look like copies of one another.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DuplicatesConfig;
use crate::similarity::similarity;
use crate::types::{Declaration, SourceFile};

use super::functions::function_occurrences;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub name: String,
    pub locations: BTreeSet<String>,
    pub similar: bool,
    /// Distinct declaring files.
    pub count: usize,
}

pub fn detect_duplicates(files: &[SourceFile], config: &DuplicatesConfig) -> Vec<DuplicateGroup> {
    let contents: BTreeMap<&str, &str> = files
        .iter()
        .map(|f| (f.path.as_str(), f.content.as_str()))
        .collect();

    // First occurrence per file, files kept in input order.
    let mut by_name: BTreeMap<String, Vec<Declaration>> = BTreeMap::new();
    for decl in function_occurrences(files) {
        let group = by_name.entry(decl.name.clone()).or_default();
        if !group.iter().any(|d| d.file == decl.file) {
            group.push(decl);
        }
    }

    by_name
        .into_iter()
        .filter(|(_, occurrences)| occurrences.len() >= 2)
        .map(|(name, occurrences)| {
            let prints: Vec<String> = occurrences
                .iter()
                .map(|d| {
                    let content = contents.get(d.file.as_str()).copied().unwrap_or_default();
                    fingerprint(content, d.line, config.fingerprint_lines, config.fingerprint_chars)
                })
                .collect();
            let similar = prints[1..].iter().all(|other| {
                let score = similarity(&prints[0], other);
                debug!(name = %name, score, "duplicate comparison");
                score >= config.threshold
            });
            DuplicateGroup {
                count: occurrences.len(),
                locations: occurrences.into_iter().map(|d| d.file).collect(),
                similar,
                name,
            }
        })
        .collect()
}

/// The `lines` lines after `line`, line comments removed, whitespace collapsed,
/// cut to `max_chars` characters.
pub fn fingerprint(content: &str, line: usize, lines: usize, max_chars: usize) -> String {
    let joined = content
        .lines()
        .skip(line)
        .take(lines)
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join(" ");
    joined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

/// Cut at `//` unless it belongs to a `scheme://` URL.
fn strip_line_comment(line: &str) -> &str {
    let mut search_from = 0;
    while let Some(found) = line[search_from..].find("//") {
        let idx = search_from + found;
        if idx > 0 && line.as_bytes()[idx - 1] == b':' {
            search_from = idx + 2;
            continue;
        }
        return &line[..idx];
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DuplicatesConfig {
        DuplicatesConfig::default()
    }

    #[test]
    fn fingerprint_skips_declaration_and_comments() {
        let content = "function f() {\n  // setup\n  const url = 'https://x.io';   // remote\n  return   url;\n}\n";
        assert_eq!(
            fingerprint(content, 1, 5, 200),
            "const url = 'https://x.io'; return url; }"
        );
        assert_eq!(fingerprint(content, 1, 5, 5), "const");
        assert_eq!(fingerprint(content, 10, 5, 200), "");
    }

    #[test]
    fn identical_bodies_are_similar() {
        let body = "function save(x) {\n  const a = x + 1;\n  return a;\n}\n";
        let files = vec![
            SourceFile::new("src/a.js", body),
            SourceFile::new("src/b.js", body),
            SourceFile::new("src/c.js", "function other() {}\n"),
        ];
        let groups = detect_duplicates(&files, &config());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "save");
        assert_eq!(groups[0].count, 2);
        assert!(groups[0].similar);
        assert_eq!(
            groups[0].locations.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["src/a.js", "src/b.js"]
        );
    }

    #[test]
    fn one_divergent_copy_breaks_similarity() {
        let same = "function foo() {\n  let total = 0;\n  for (const n of items) total += n;\n  log(total);\n  return total;\n}\n";
        let different = "function foo() {\n  throw new Error('not implemented in this environment');\n}\n";
        let files = vec![
            SourceFile::new("a.ts", same),
            SourceFile::new("b.ts", same),
            SourceFile::new("c.ts", different),
        ];
        let groups = detect_duplicates(&files, &config());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 3);
        assert!(!groups[0].similar);
    }

    #[test]
    fn repeats_within_one_file_are_not_duplicates() {
        let files = vec![SourceFile::new(
            "a.js",
            "function twice() {}\nconst twice = () => {};\n",
        )];
        assert!(detect_duplicates(&files, &config()).is_empty());
    }

    #[test]
    fn groups_are_ordered_by_name() {
        let files = vec![
            SourceFile::new("a.js", "function zeta() {}\nfunction alpha() {}\n"),
            SourceFile::new("b.js", "function zeta() {}\nfunction alpha() {}\n"),
        ];
        let names: Vec<String> = detect_duplicates(&files, &config())
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
