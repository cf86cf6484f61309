//! Named exports and re-exports.
//!
//! An export counts as used when some file imports it by name. With
//! `token_fallback` on (the default) any token-boundary occurrence outside the
//! symbol's own export statements also counts, which over-approximates usage
//! for short, common names.

use std::collections::HashSet;

use crate::text::contains_token;
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::classify::is_script;
use super::regexes::{
    regex_export_brace, regex_export_default_named, regex_export_named_decl, regex_import_brace,
    regex_import_default, regex_reexport_star_as, regex_require_destructure,
};
use super::{SymbolAnalyzer, brace_list_to_source_names, offset_to_line};

#[derive(Debug, Clone)]
pub struct ExportAnalyzer {
    pub policy: IdentityPolicy,
    pub token_fallback: bool,
}

impl Default for ExportAnalyzer {
    fn default() -> Self {
        Self {
            policy: IdentityPolicy::default(),
            token_fallback: true,
        }
    }
}

impl ExportAnalyzer {
    pub fn new(policy: IdentityPolicy, token_fallback: bool) -> Self {
        Self {
            policy,
            token_fallback,
        }
    }
}

/// Every export declaration, in input order, with the line each name sits on.
pub fn export_occurrences(files: &[SourceFile]) -> Vec<Declaration> {
    let mut occurrences = Vec::new();
    for file in files.iter().filter(|f| is_script(f)) {
        let content = &file.content;
        let mut found: Vec<(usize, String)> = Vec::new();

        for re in [
            regex_export_named_decl(),
            regex_export_default_named(),
            regex_reexport_star_as(),
        ] {
            for caps in re.captures_iter(content) {
                if let Some(name) = caps.get(1) {
                    found.push((name.start(), name.as_str().to_string()));
                }
            }
        }

        for caps in regex_export_brace().captures_iter(content) {
            let Some(list) = caps.get(1) else {
                continue;
            };
            let mut item_start = list.start();
            for item in list.as_str().split(',') {
                let offset = item_start + (item.len() - item.trim_start().len());
                item_start += item.len() + 1;
                let trimmed = item.trim();
                let trimmed = trimmed.strip_prefix("type ").unwrap_or(trimmed).trim();
                if trimmed.is_empty() {
                    continue;
                }
                // Exported spelling: the alias when present.
                let exported = trimmed
                    .split_once(" as ")
                    .map_or(trimmed, |(_, alias)| alias.trim());
                if exported != "default" {
                    found.push((offset, exported.to_string()));
                }
            }
        }

        found.sort();
        found.dedup();
        occurrences.extend(found.into_iter().map(|(offset, name)| {
            Declaration::new(name, DeclKind::Export, &file.path, offset_to_line(content, offset))
        }));
    }
    occurrences
}

/// Names imported anywhere, spelled as the exporting module spells them.
pub(crate) fn imported_names(files: &[SourceFile]) -> HashSet<String> {
    let mut names = HashSet::new();
    for file in files {
        for caps in regex_import_brace().captures_iter(&file.content) {
            names.extend(brace_list_to_source_names(&caps[1]));
        }
        for caps in regex_require_destructure().captures_iter(&file.content) {
            names.extend(brace_list_to_source_names(&caps[1].replace(':', " as ")));
        }
        for caps in regex_import_default().captures_iter(&file.content) {
            names.insert(caps[1].to_string());
        }
    }
    names
}

impl SymbolAnalyzer for ExportAnalyzer {
    fn name(&self) -> &'static str {
        "exports"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for decl in export_occurrences(files) {
            table.insert(decl);
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let imported = imported_names(files);
        let export_lines: HashSet<(String, usize, String)> = if self.token_fallback {
            export_occurrences(files)
                .into_iter()
                .map(|d| (d.file, d.line, d.name))
                .collect()
        } else {
            HashSet::new()
        };

        let mut used = HashSet::new();
        for decl in declared.iter() {
            if imported.contains(&decl.name) {
                used.insert(decl.identity());
                continue;
            }
            if !self.token_fallback {
                continue;
            }
            let mentioned = files.iter().any(|file| {
                file.content.lines().enumerate().any(|(idx, line)| {
                    !export_lines.contains(&(file.path.clone(), idx + 1, decl.name.clone()))
                        && contains_token(line, &decl.name)
                })
            });
            if mentioned {
                used.insert(decl.identity());
            }
        }
        used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrences(content: &str) -> Vec<(String, usize)> {
        export_occurrences(&[SourceFile::new("src/mod.ts", content)])
            .into_iter()
            .map(|d| (d.name, d.line))
            .collect()
    }

    fn unused(analyzer: ExportAnalyzer, files: &[SourceFile]) -> Vec<String> {
        analyzer
            .analyze(files)
            .unused
            .into_iter()
            .map(|i| i.name)
            .collect()
    }

    #[test]
    fn extracts_declarations_lists_and_reexports() {
        let content = "export async function load() {}\nexport const LIMIT = 3;\nexport interface Props {}\nexport default class Store {}\nexport {\n  a,\n  b as c,\n  type T,\n};\nexport { x } from './x';\nexport * as utils from './utils';\nexport { helper as default };\n";
        assert_eq!(
            occurrences(content),
            vec![
                ("load".to_string(), 1),
                ("LIMIT".to_string(), 2),
                ("Props".to_string(), 3),
                ("Store".to_string(), 4),
                ("a".to_string(), 6),
                ("c".to_string(), 7),
                ("T".to_string(), 8),
                ("x".to_string(), 10),
                ("utils".to_string(), 11),
            ]
        );
    }

    #[test]
    fn import_list_marks_used() {
        let files = vec![
            SourceFile::new("src/a.ts", "export function alpha() {}\nexport function beta() {}\n"),
            SourceFile::new("src/b.ts", "import { alpha as first } from './a';\n"),
        ];
        let analyzer = ExportAnalyzer::new(IdentityPolicy::LastWriteWins, false);
        assert_eq!(unused(analyzer, &files), vec!["beta"]);
    }

    #[test]
    fn default_import_and_require_mark_used() {
        let files = vec![
            SourceFile::new("src/Store.ts", "export default class Store {}\n"),
            SourceFile::new("src/cfg.js", "export const config = {};\n"),
            SourceFile::new(
                "src/main.js",
                "import Store from './Store';\nconst { config: cfg } = require('./cfg');\n",
            ),
        ];
        let analyzer = ExportAnalyzer::new(IdentityPolicy::LastWriteWins, false);
        assert!(unused(analyzer, &files).is_empty());
    }

    #[test]
    fn token_fallback_counts_any_mention() {
        let files = vec![
            SourceFile::new("src/a.ts", "export const TIMEOUT = 30;\n"),
            SourceFile::new("src/b.ts", "// TIMEOUT is tuned elsewhere\n"),
        ];
        assert!(unused(ExportAnalyzer::default(), &files).is_empty());
        let strict = ExportAnalyzer::new(IdentityPolicy::LastWriteWins, false);
        assert_eq!(unused(strict, &files), vec!["TIMEOUT"]);
    }

    #[test]
    fn own_export_statement_is_not_a_mention() {
        let files = vec![SourceFile::new("src/a.ts", "export function orphan() {}\n")];
        assert_eq!(unused(ExportAnalyzer::default(), &files), vec!["orphan"]);
    }
}
