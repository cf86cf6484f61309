//! Type aliases and interfaces with the other declared types they mention.
//!
//! No liveness judgment is made here; the section is an inventory plus a
//! dependency listing.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{DeclKind, Declaration, DeclarationTable, IdentityPolicy, SourceFile};

use super::classify::is_type_source;
use super::offset_to_line;
use super::regexes::{regex_identifier, regex_interface_decl, regex_type_alias_decl};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: DeclKind,
    pub file: String,
    pub line: usize,
    pub dependencies: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeReport {
    pub total_types: usize,
    pub total_interfaces: usize,
    pub definitions: Vec<TypeDefinition>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeGraphAnalyzer {
    pub policy: IdentityPolicy,
}

/// A declaration with the text its dependencies are read from.
struct RawType {
    decl: Declaration,
    body: String,
}

impl TypeGraphAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }

    pub fn report(&self, files: &[SourceFile]) -> TypeReport {
        let raw = scan(files);
        let mut table = DeclarationTable::new(self.policy);
        let mut bodies: HashMap<(String, usize, String), &str> = HashMap::new();
        for entry in &raw {
            table.insert(entry.decl.clone());
            bodies.insert(
                (entry.decl.file.clone(), entry.decl.line, entry.decl.name.clone()),
                &entry.body,
            );
        }

        let known: HashSet<&str> = table.iter().map(|d| d.name.as_str()).collect();
        let definitions: Vec<TypeDefinition> = table
            .iter()
            .map(|decl| {
                let body = bodies
                    .get(&(decl.file.clone(), decl.line, decl.name.clone()))
                    .copied()
                    .unwrap_or_default();
                let dependencies = regex_identifier()
                    .find_iter(body)
                    .map(|m| m.as_str())
                    .filter(|ident| *ident != decl.name && known.contains(ident))
                    .map(str::to_string)
                    .collect();
                TypeDefinition {
                    name: decl.name.clone(),
                    kind: decl.kind,
                    file: decl.file.clone(),
                    line: decl.line,
                    dependencies,
                }
            })
            .collect();

        TypeReport {
            total_types: definitions.iter().filter(|d| d.kind == DeclKind::Type).count(),
            total_interfaces: definitions
                .iter()
                .filter(|d| d.kind == DeclKind::Interface)
                .count(),
            definitions,
        }
    }
}

fn scan(files: &[SourceFile]) -> Vec<RawType> {
    let mut found = Vec::new();
    for file in files.iter().filter(|f| is_type_source(f)) {
        let content = &file.content;
        let mut in_file: Vec<(usize, RawType)> = Vec::new();

        for caps in regex_interface_decl().captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let body = interface_body(content, whole.end());
            in_file.push((
                name.start(),
                RawType {
                    decl: Declaration::new(
                        name.as_str(),
                        DeclKind::Interface,
                        &file.path,
                        offset_to_line(content, name.start()),
                    ),
                    body: body.to_string(),
                },
            ));
        }

        for caps in regex_type_alias_decl().captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            // Generic parameter defaults sit between the name and `=`.
            let head = &content[name.end()..whole.end()];
            let body = format!("{head} {}", alias_body(content, whole.end()));
            in_file.push((
                name.start(),
                RawType {
                    decl: Declaration::new(
                        name.as_str(),
                        DeclKind::Type,
                        &file.path,
                        offset_to_line(content, name.start()),
                    ),
                    body,
                },
            ));
        }

        in_file.sort_by_key(|(offset, _)| *offset);
        found.extend(in_file.into_iter().map(|(_, raw)| raw));
    }
    found
}

/// Heritage clause and braced body of an interface starting at `from`.
fn interface_body(content: &str, from: usize) -> &str {
    let rest = &content[from..];
    let Some(open) = rest.find('{') else {
        return rest.lines().next().unwrap_or_default();
    };
    let mut depth = 0usize;
    for (idx, ch) in rest[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &rest[..open + idx + 1];
                }
            }
            _ => {}
        }
    }
    rest
}

/// Right-hand side of a type alias: up to `;` at bracket depth zero, or a
/// line break at depth zero that does not continue a union or intersection.
fn alias_body(content: &str, from: usize) -> &str {
    let rest = &content[from..];
    let mut depth = 0usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return &rest[..idx],
            '\n' if depth == 0 => {
                let so_far = rest[..idx].trim();
                let next = rest[idx + 1..].trim_start();
                let continues = so_far.is_empty()
                    || so_far.ends_with(['|', '&', '=', ',', '<', '?', ':'])
                    || next.starts_with(['|', '&', '?', ':', '.']);
                if !continues {
                    return &rest[..idx];
                }
            }
            _ => {}
        }
    }
    rest
}
