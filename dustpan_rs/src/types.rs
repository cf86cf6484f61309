use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One text-bearing file of the project snapshot.
///
/// Paths are forward-slash separated and relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Lowercased extension without the dot (`"tsx"`), empty when absent.
    pub fn extension(&self) -> String {
        let file_name = self.file_name();
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => String::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    Variable,
    State,
    SetState,
    Function,
    Export,
    Hook,
    Type,
    Interface,
    Image,
    CssClass,
    ApiRoute,
}

impl DeclKind {
    /// Label shown next to an unused item.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::State => "state",
            Self::SetState => "state setter",
            Self::Function => "function",
            Self::Export => "export",
            Self::Hook => "hook",
            Self::Type => "type",
            Self::Interface => "interface",
            Self::Image => "image",
            Self::CssClass => "CSS class",
            Self::ApiRoute => "API route",
        }
    }
}

/// A named symbol's point of introduction in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub file: String,
    pub line: usize,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind, file: &str, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.to_string(),
            line: line.max(1),
        }
    }

    pub fn identity(&self) -> Identity {
        (self.name.clone(), self.kind)
    }
}

pub type Identity = (String, DeclKind);

/// How a recurring identity is recorded by an extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Later occurrences overwrite earlier ones.
    #[default]
    LastWriteWins,
    FirstWriteWins,
}

/// Declarations keyed by identity. Ordered so reports are deterministic.
#[derive(Debug, Clone, Default)]
pub struct DeclarationTable {
    policy: IdentityPolicy,
    entries: BTreeMap<Identity, Declaration>,
}

impl DeclarationTable {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self {
            policy,
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, decl: Declaration) {
        let key = decl.identity();
        match self.policy {
            IdentityPolicy::LastWriteWins => {
                self.entries.insert(key, decl);
            }
            IdentityPolicy::FirstWriteWins => {
                self.entries.entry(key).or_insert(decl);
            }
        }
    }

    pub fn get(&self, identity: &Identity) -> Option<&Declaration> {
        self.entries.get(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A declaration no usage heuristic could find a reference for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnusedItem {
    pub name: String,
    pub kind: DeclKind,
    pub label: String,
    pub file: String,
    pub line: usize,
}

impl From<&Declaration> for UnusedItem {
    fn from(decl: &Declaration) -> Self {
        Self {
            name: decl.name.clone(),
            kind: decl.kind,
            label: decl.kind.label().to_string(),
            file: decl.file.clone(),
            line: decl.line,
        }
    }
}

/// Per-class liveness section of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReport {
    /// Cardinality of the declared set.
    pub total: usize,
    pub unused: Vec<UnusedItem>,
}
