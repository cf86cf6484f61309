//! Custom hooks, recognized by the `use` + uppercase naming convention on
//! functions and on bindings such as `const useStore = create(...)`.

use std::collections::HashSet;

use crate::text::token_positions;
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::classify::is_script;
use super::functions::{declaring_lines, function_occurrences, is_hook_name};
use super::regexes::{
    regex_hook_binding, regex_import_brace, regex_import_default, regex_reexport_brace,
};
use super::{SymbolAnalyzer, brace_list_to_source_names, is_comment_line};

#[derive(Debug, Clone, Default)]
pub struct HookAnalyzer {
    pub policy: IdentityPolicy,
}

impl HookAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }
}

impl SymbolAnalyzer for HookAnalyzer {
    fn name(&self) -> &'static str {
        "hooks"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for decl in hook_occurrences(files) {
            table.insert(decl);
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let occurrences = hook_occurrences(files);
        let imported = imported_names(files);
        let mut used = HashSet::new();
        for decl in declared.iter() {
            if imported.contains(&decl.name) {
                used.insert(decl.identity());
                continue;
            }
            let skip = declaring_lines(&occurrences, &decl.name);
            let called = files.iter().any(|file| {
                file.content.lines().enumerate().any(|(idx, line)| {
                    !skip.contains(&(file.path.clone(), idx + 1)) && is_called(line, &decl.name)
                })
            });
            if called {
                used.insert(decl.identity());
            }
        }
        used
    }
}

/// Hook-named functions plus hook-named bindings, in input order.
fn hook_occurrences(files: &[SourceFile]) -> Vec<Declaration> {
    let mut found: Vec<Declaration> = function_occurrences(files)
        .into_iter()
        .filter(|d| is_hook_name(&d.name))
        .map(|decl| Declaration {
            kind: DeclKind::Hook,
            ..decl
        })
        .collect();

    for file in files.iter().filter(|f| is_script(f)) {
        for (idx, line) in file.content.lines().enumerate() {
            if is_comment_line(line) {
                continue;
            }
            for caps in regex_hook_binding().captures_iter(line) {
                let line_no = idx + 1;
                let name = &caps[1];
                let known = found
                    .iter()
                    .any(|d| d.name == name && d.file == file.path && d.line == line_no);
                if !known {
                    found.push(Declaration::new(name, DeclKind::Hook, &file.path, line_no));
                }
            }
        }
    }
    found
}

fn is_called(line: &str, name: &str) -> bool {
    token_positions(line, name).any(|start| line[start + name.len()..].trim_start().starts_with('('))
}

/// Every name appearing in an import list anywhere in the project.
fn imported_names(files: &[SourceFile]) -> HashSet<String> {
    let mut names = HashSet::new();
    for file in files {
        for caps in regex_import_brace()
            .captures_iter(&file.content)
            .chain(regex_reexport_brace().captures_iter(&file.content))
        {
            names.extend(brace_list_to_source_names(&caps[1]));
        }
        for caps in regex_import_default().captures_iter(&file.content) {
            names.insert(caps[1].to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused(files: &[SourceFile]) -> Vec<String> {
        HookAnalyzer::default()
            .analyze(files)
            .unused
            .into_iter()
            .map(|i| i.name)
            .collect()
    }

    #[test]
    fn extracts_only_hook_named_functions() {
        let files = vec![SourceFile::new(
            "src/hooks.ts",
            "export function useAuth() {}\nexport const useTheme = () => ctx;\nfunction user() {}\nconst use2FA = () => {};\n",
        )];
        let table = HookAnalyzer::default().extract(&files);
        let names: Vec<&str> = table.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["use2FA", "useAuth", "useTheme"]);
        assert!(table.iter().all(|d| d.kind == DeclKind::Hook));
    }

    #[test]
    fn store_factory_binding_is_a_hook() {
        let files = vec![SourceFile::new(
            "src/store.ts",
            "import { create } from 'zustand';\n\nexport const useStore = create((set) => ({ n: 0 }));\n",
        )];
        let table = HookAnalyzer::default().extract(&files);
        let found: Vec<(&str, DeclKind, usize)> =
            table.iter().map(|d| (d.name.as_str(), d.kind, d.line)).collect();
        assert_eq!(found, vec![("useStore", DeclKind::Hook, 3)]);
        assert_eq!(unused(&files), vec!["useStore"]);

        let mut with_caller = files.clone();
        with_caller.push(SourceFile::new("src/Counter.tsx", "const n = useStore((s) => s.n);\n"));
        assert!(unused(&with_caller).is_empty());
    }

    #[test]
    fn unused_hook_is_reported() {
        let files = vec![SourceFile::new(
            "src/useCounter.ts",
            "export function useCounter() {\n  return 1;\n}\n",
        )];
        assert_eq!(unused(&files), vec!["useCounter"]);
    }

    #[test]
    fn call_elsewhere_marks_used() {
        let files = vec![
            SourceFile::new("src/useCounter.ts", "export function useCounter() {}\n"),
            SourceFile::new("src/App.tsx", "const n = useCounter ();\n"),
        ];
        assert!(unused(&files).is_empty());
    }

    #[test]
    fn import_list_marks_used() {
        let files = vec![
            SourceFile::new("src/hooks/useA.ts", "export const useA = () => 1;\n"),
            SourceFile::new("src/hooks/useB.ts", "export default function useB() {}\n"),
            SourceFile::new(
                "src/index.ts",
                "import { useA as useAlias } from './hooks/useA';\nimport useB from './hooks/useB';\n",
            ),
        ];
        assert!(unused(&files).is_empty());
    }

    #[test]
    fn mention_without_call_is_not_usage() {
        let files = vec![
            SourceFile::new("a.ts", "export function useThing() {}\n"),
            SourceFile::new("b.ts", "// useThing is deprecated\n"),
        ];
        assert_eq!(unused(&files), vec!["useThing"]);
    }
}
