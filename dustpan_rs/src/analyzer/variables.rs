//! Plain bindings, `useState`-style pairs and exported module constants.

use std::collections::HashSet;

use crate::text::contains_token;
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::classify::is_script;
use super::functions::is_hook_name;
use super::regexes::{
    regex_constructed_binding, regex_exported_binding, regex_function_value_binding,
    regex_plain_binding, regex_state_destructure, regex_state_initializer,
};
use super::{SymbolAnalyzer, is_comment_line};

/// How many lines past a `[value, setter] =` statement the initializer call may
/// start, provided the statement has not ended yet.
const STATE_SCAN_WINDOW: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct VariableAnalyzer {
    pub policy: IdentityPolicy,
}

impl VariableAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }
}

impl SymbolAnalyzer for VariableAnalyzer {
    fn name(&self) -> &'static str {
        "variables"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for file in files.iter().filter(|f| is_script(f)) {
            let lines: Vec<&str> = file.content.lines().collect();
            for (idx, line) in lines.iter().enumerate() {
                if is_comment_line(line) {
                    continue;
                }
                for decl in declarations_on_line(&file.path, &lines, idx) {
                    table.insert(decl);
                }
            }
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let mut used = HashSet::new();
        for decl in declared.iter() {
            let referenced = files.iter().any(|file| {
                file.content.lines().enumerate().any(|(idx, line)| {
                    let is_own_line = file.path == decl.file && idx + 1 == decl.line;
                    !is_own_line
                        && !destructures_state(line, &decl.name)
                        && contains_token(line, &decl.name)
                })
            });
            if referenced {
                used.insert(decl.identity());
            }
        }
        used
    }
}

/// Apply the ordered variable patterns to line `idx`.
fn declarations_on_line(path: &str, lines: &[&str], idx: usize) -> Vec<Declaration> {
    let line = lines[idx];

    if let Some(caps) = regex_state_destructure().captures(line) {
        let rhs_start = caps.get(0).map_or(0, |m| m.end());
        // Array destructuring of something else: no single interesting name.
        let Some(init_idx) = state_initializer_line(lines, idx, rhs_start) else {
            return Vec::new();
        };
        return vec![
            Declaration::new(&caps[1], DeclKind::State, path, init_idx + 1),
            Declaration::new(&caps[2], DeclKind::SetState, path, init_idx + 1),
        ];
    }

    let exported = regex_exported_binding()
        .captures(line)
        .map(|caps| caps[1].to_string());

    let declarators: Vec<(usize, String)> = regex_plain_binding()
        .captures_iter(line)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str().to_string())))
        .collect();

    let mut found = Vec::new();
    let mut seen_exported = false;
    for (i, (start, name)) in declarators.iter().enumerate() {
        let end = declarators.get(i + 1).map_or(line.len(), |(next, _)| *next);
        let declarator = &line[*start..end];
        let is_exported = exported.as_deref() == Some(name.as_str());
        seen_exported |= is_exported;

        // Function values belong to the function analyzer, hooks to the hook analyzer.
        if regex_function_value_binding().is_match(declarator) || is_hook_name(name) {
            continue;
        }
        if !is_exported && regex_constructed_binding().is_match(declarator) {
            continue;
        }
        found.push(Declaration::new(name, DeclKind::Variable, path, idx + 1));
    }

    // `export let flag;` has no initializer for the plain pattern to see.
    if let Some(name) = exported
        && !seen_exported
        && !is_hook_name(&name)
        && !regex_function_value_binding().is_match(line)
    {
        found.push(Declaration::new(&name, DeclKind::Variable, path, idx + 1));
    }
    found
}

/// Line holding the `useState`/`useReducer` call that initializes the
/// destructure on line `idx`, searched only until that statement ends.
fn state_initializer_line(lines: &[&str], idx: usize, rhs_start: usize) -> Option<usize> {
    let window_end = (idx + STATE_SCAN_WINDOW + 1).min(lines.len());
    let mut depth = 0i32;
    for (j, &full) in lines.iter().enumerate().take(window_end).skip(idx) {
        if j > idx && starts_declaration(full) {
            return None;
        }
        let text = if j == idx { &full[rhs_start..] } else { full };
        let statement_end = text.char_indices().find_map(|(pos, c)| {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                ';' if depth <= 0 => return Some(pos),
                _ => {}
            }
            None
        });
        let segment = statement_end.map_or(text, |pos| &text[..pos]);
        if regex_state_initializer().is_match(segment) {
            return Some(j);
        }
        if statement_end.is_some() {
            return None;
        }
    }
    None
}

fn starts_declaration(line: &str) -> bool {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("export ").map_or(trimmed, str::trim_start);
    ["const ", "let ", "var ", "const[", "let[", "var["]
        .iter()
        .any(|kw| trimmed.starts_with(kw))
}

/// The `[value, setter] =` statement itself is not a usage of either name.
fn destructures_state(line: &str, name: &str) -> bool {
    regex_state_destructure()
        .captures(line)
        .is_some_and(|caps| &caps[1] == name || &caps[2] == name)
}
