use serde::{Deserialize, Serialize};

use crate::types::SymbolReport;

use super::api_routes::ApiReport;
use super::auth::AuthReport;
use super::classify::FileCensus;
use super::storage::StorageReport;
use super::twins::DuplicateGroup;
use super::types_graph::TypeReport;

/// Everything one run found. Field names are the stable output keys; every
/// field is always present, empty when its analyzer found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub census: FileCensus,
    pub variables: SymbolReport,
    pub functions: SymbolReport,
    pub exports: SymbolReport,
    pub hooks: SymbolReport,
    pub types: TypeReport,
    pub images: SymbolReport,
    pub css_classes: SymbolReport,
    pub api_endpoints: ApiReport,
    pub duplicate_functions: Vec<DuplicateGroup>,
    pub auth: AuthReport,
    pub storage: StorageReport,
}

impl AnalysisResult {
    /// Sections that carry an unused list, with their output key.
    pub fn symbol_sections(&self) -> [(&'static str, &SymbolReport); 6] {
        [
            ("variables", &self.variables),
            ("functions", &self.functions),
            ("exports", &self.exports),
            ("hooks", &self.hooks),
            ("images", &self.images),
            ("css_classes", &self.css_classes),
        ]
    }

    pub fn unused_count(&self) -> usize {
        self.symbol_sections()
            .iter()
            .map(|(_, section)| section.unused.len())
            .sum::<usize>()
            + self.api_endpoints.unused.len()
    }

    pub fn similar_duplicates(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.duplicate_functions.iter().filter(|group| group.similar)
    }

    /// No unused symbols anywhere and no copy-paste duplicate groups.
    pub fn is_clean(&self) -> bool {
        self.unused_count() == 0 && self.similar_duplicates().next().is_none()
    }
}
