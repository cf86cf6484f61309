//! Static image assets and whether any script, style, markup or manifest
//! mentions them under one of their path spellings.

use std::collections::HashSet;

use crate::text::{contains_path_token, path_variants};
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::SymbolAnalyzer;
use super::classify::{is_image, is_referencing};

const WRAPPERS: &[(&str, &str)] = &[
    ("\"", "\""),
    ("'", "'"),
    ("`", "`"),
    ("(", ")"),
    ("{", "}"),
    ("[", "]"),
];

#[derive(Debug, Clone, Default)]
pub struct ImageAnalyzer {
    pub policy: IdentityPolicy,
}

impl ImageAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }
}

impl SymbolAnalyzer for ImageAnalyzer {
    fn name(&self) -> &'static str {
        "images"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for file in files.iter().filter(|f| is_image(f)) {
            table.insert(Declaration::new(&file.path, DeclKind::Image, &file.path, 1));
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let haystack = files
            .iter()
            .filter(|f| is_referencing(f))
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        declared
            .iter()
            .filter(|decl| is_referenced(&haystack, &decl.file))
            .map(|decl| decl.identity())
            .collect()
    }
}

/// Spellings containing `.` or `/` are distinctive enough to match bare; the
/// rest (the stem) only counts inside quotes or brackets.
fn is_referenced(haystack: &str, path: &str) -> bool {
    path_variants(path).iter().any(|variant| {
        let distinctive = variant.contains('.') || variant.contains('/');
        (distinctive && contains_path_token(haystack, variant))
            || WRAPPERS
                .iter()
                .any(|(open, close)| haystack.contains(&format!("{open}{variant}{close}")))
    })
}
