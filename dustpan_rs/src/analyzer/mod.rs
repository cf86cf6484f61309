pub mod api_routes;
pub mod auth;
pub mod classify;
pub mod css;
pub mod exports;
pub mod functions;
pub mod hooks;
pub mod images;
pub mod output;
pub mod regexes;
pub mod report;
pub mod runner;
pub mod storage;
pub mod twins;
pub mod types_graph;
pub mod variables;

use std::collections::HashSet;

use crate::types::{DeclarationTable, Identity, SourceFile, SymbolReport, UnusedItem};

/// Capability shared by every liveness analyzer: find declarations, then decide
/// which of them are referenced somewhere in the project.
pub trait SymbolAnalyzer {
    /// Section name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable;

    /// Identities with at least one reference. Must be a subset of `declared`.
    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity>;

    fn analyze(&self, files: &[SourceFile]) -> SymbolReport {
        let declared = self.extract(files);
        let used = self.resolve(files, &declared);
        unused_report(&declared, &used)
    }
}

/// `declared − used`, ordered by file, line, then name.
pub(crate) fn unused_report(declared: &DeclarationTable, used: &HashSet<Identity>) -> SymbolReport {
    let mut unused: Vec<UnusedItem> = declared
        .iter()
        .filter(|decl| !used.contains(&decl.identity()))
        .map(UnusedItem::from)
        .collect();
    unused.sort_by(|a, b| {
        (a.file.as_str(), a.line, a.name.as_str(), a.kind)
            .cmp(&(b.file.as_str(), b.line, b.name.as_str(), b.kind))
    });
    SymbolReport {
        total: declared.len(),
        unused,
    }
}

/// Names from a brace list like `a, b as c, type D`, using the local spelling
/// (`c`) for aliases.
pub(super) fn brace_list_to_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|item| {
            let trimmed = item.trim();
            let trimmed = trimmed.strip_prefix("type ").unwrap_or(trimmed).trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Some((_, alias)) = trimmed.split_once(" as ") {
                Some(alias.trim().to_string())
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Names from an import brace list as the exporting module spells them
/// (`a` for `a as b`).
pub(super) fn brace_list_to_source_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|item| {
            let trimmed = item.trim();
            let trimmed = trimmed.strip_prefix("type ").unwrap_or(trimmed).trim();
            let source = trimmed.split_once(" as ").map_or(trimmed, |(s, _)| s.trim());
            (!source.is_empty()).then(|| source.to_string())
        })
        .collect()
}

pub(super) fn offset_to_line(content: &str, offset: usize) -> usize {
    content[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Line comments and block-comment continuation lines carry no declarations.
pub(super) fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_list_uses_alias_and_drops_type_keyword() {
        assert_eq!(
            brace_list_to_names(" a, b as c , type D,"),
            vec!["a".to_string(), "c".to_string(), "D".to_string()]
        );
    }

    #[test]
    fn source_names_keep_original_spelling() {
        assert_eq!(
            brace_list_to_source_names("a as b, type C, d"),
            vec!["a".to_string(), "C".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn offsets_map_to_one_based_lines() {
        let content = "a\nb\nc";
        assert_eq!(offset_to_line(content, 0), 1);
        assert_eq!(offset_to_line(content, 2), 2);
        assert_eq!(offset_to_line(content, 4), 3);
    }

    #[test]
    fn comment_lines() {
        assert!(is_comment_line("  // const x = 1"));
        assert!(is_comment_line(" * @param x"));
        assert!(!is_comment_line("const x = 1; // note"));
    }
}
