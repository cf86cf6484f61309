//! Named function declarations and arrow-bound functions.
//!
//! Usage shapes are tried in a fixed order per name and the first hit wins:
//! call, markup tag, value position, callback slot, list membership, and
//! finally import/export lists over the whole file.

use std::collections::HashSet;

use regex::Regex;

use crate::text::token_positions;
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::classify::is_script;
use super::regexes::{
    regex_arrow_decl, regex_export_brace, regex_function_decl, regex_hook_name,
    regex_import_brace, regex_require_destructure,
};
use super::{SymbolAnalyzer, brace_list_to_source_names, offset_to_line};

#[derive(Debug, Clone, Default)]
pub struct FunctionAnalyzer {
    pub policy: IdentityPolicy,
}

impl FunctionAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }
}

pub fn is_hook_name(name: &str) -> bool {
    regex_hook_name().is_match(name)
}

/// Every function declaration in every script file, in input order.
///
/// Unlike the deduplicated table this keeps repeated names, which the
/// duplicate detector needs.
pub fn function_occurrences(files: &[SourceFile]) -> Vec<Declaration> {
    let mut occurrences = Vec::new();
    for file in files.iter().filter(|f| is_script(f)) {
        let mut found: Vec<(usize, String)> = Vec::new();
        for re in [regex_function_decl(), regex_arrow_decl()] {
            for caps in re.captures_iter(&file.content) {
                if let Some(name) = caps.get(1) {
                    found.push((name.start(), name.as_str().to_string()));
                }
            }
        }
        found.sort();
        found.dedup();
        occurrences.extend(found.into_iter().map(|(offset, name)| {
            let line = offset_to_line(&file.content, offset);
            Declaration::new(name, DeclKind::Function, &file.path, line)
        }));
    }
    occurrences
}

/// `(file, line)` pairs on which `name` is declared as a function.
pub(crate) fn declaring_lines(occurrences: &[Declaration], name: &str) -> HashSet<(String, usize)> {
    occurrences
        .iter()
        .filter(|d| d.name == name)
        .map(|d| (d.file.clone(), d.line))
        .collect()
}

impl SymbolAnalyzer for FunctionAnalyzer {
    fn name(&self) -> &'static str {
        "functions"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for decl in function_occurrences(files) {
            // Hooks are judged by the hook analyzer.
            if !is_hook_name(&decl.name) {
                table.insert(decl);
            }
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let occurrences = function_occurrences(files);
        let mut used = HashSet::new();
        for decl in declared.iter() {
            let shapes = ReferenceShapes::new(&decl.name);
            let skip = declaring_lines(&occurrences, &decl.name);
            if files.iter().any(|file| shapes.referenced_in(file, &skip)) {
                used.insert(decl.identity());
            }
        }
        used
    }
}

/// Reference tests for one function name.
struct ReferenceShapes<'a> {
    name: &'a str,
    value: Option<Regex>,
    callback: Option<Regex>,
    collection: Option<Regex>,
    module_export: Option<Regex>,
}

impl<'a> ReferenceShapes<'a> {
    fn new(name: &'a str) -> Self {
        let n = regex::escape(name);
        let value = format!(
            r#"(?:[=(,:?]|&&|\|\||=>|\breturn\b)\s*\{{?\s*{n}\s*(?:[;,)}}\]]|$)"#
        );
        let callback = format!(
            r#"\.(?:map|forEach|filter|reduce|some|every|find|findIndex|flatMap|sort|then|catch|finally)\s*\(\s*{n}\s*[,)]"#
        );
        let collection = format!(r#"\[(?:[^\]]*?[\s,])?\s*{n}\s*(?:,[^\]]*)?\]"#);
        let module_export = format!(
            r#"(?m)(?:^[ \t]*export\s+default\s+{n}\s*;?\s*$|module\.exports\s*=\s*(?:{n}\b|\{{[^}}]*(?:^|[^\w$]){n}(?:[^\w$][^}}]*)?\}})|exports\.[\w$]+\s*=\s*{n}\b)"#
        );
        Self {
            name,
            value: Regex::new(&value).ok(),
            callback: Regex::new(&callback).ok(),
            collection: Regex::new(&collection).ok(),
            module_export: Regex::new(&module_export).ok(),
        }
    }

    fn referenced_in(&self, file: &SourceFile, skip: &HashSet<(String, usize)>) -> bool {
        let line_hit = file.content.lines().enumerate().any(|(idx, line)| {
            if skip.contains(&(file.path.clone(), idx + 1)) || !line.contains(self.name) {
                return false;
            }
            self.is_call(line)
                || self.is_tag(line)
                || matches(&self.value, line)
                || matches(&self.callback, line)
                || matches(&self.collection, line)
        });
        line_hit || self.in_module_list(&file.content)
    }

    fn is_call(&self, line: &str) -> bool {
        token_positions(line, self.name).any(|start| {
            let rest = line[start + self.name.len()..].trim_start();
            rest.starts_with('(') || rest.starts_with("?.(")
        })
    }

    fn is_tag(&self, line: &str) -> bool {
        let open = format!("<{}", self.name);
        line.match_indices(&open).any(|(start, _)| {
            line[start + open.len()..]
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c == '/' || c == '>')
        })
    }

    fn in_module_list(&self, content: &str) -> bool {
        let in_export_list = regex_export_brace()
            .captures_iter(content)
            .any(|caps| brace_list_to_source_names(&caps[1]).iter().any(|n| n == self.name));
        let in_import_list = regex_import_brace()
            .captures_iter(content)
            .chain(regex_require_destructure().captures_iter(content))
            .any(|caps| {
                brace_list_to_source_names(&caps[1].replace(':', " as "))
                    .iter()
                    .any(|n| n == self.name)
            });
        in_export_list || in_import_list || matches(&self.module_export, content)
    }
}

fn matches(re: &Option<Regex>, text: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(text))
}
