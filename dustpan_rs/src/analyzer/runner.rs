//! Runs every analyzer over one snapshot and assembles the report.
//!
//! Each section is isolated: a panicking analyzer leaves its section empty and
//! the rest of the report is unaffected.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::DustpanConfig;
use crate::types::{SourceFile, SymbolReport};

use super::SymbolAnalyzer;
use super::api_routes::{ApiReport, ApiRouteAnalyzer};
use super::auth::{AuthReport, detect_auth};
use super::classify::{ExclusionFilter, census};
use super::css::CssClassAnalyzer;
use super::exports::ExportAnalyzer;
use super::functions::FunctionAnalyzer;
use super::hooks::HookAnalyzer;
use super::images::ImageAnalyzer;
use super::report::AnalysisResult;
use super::storage::{StorageReport, detect_storage};
use super::twins::{DuplicateGroup, detect_duplicates};
use super::types_graph::{TypeGraphAnalyzer, TypeReport};
use super::variables::VariableAnalyzer;

/// Analyze a project snapshot. Never fails: empty input gives an empty report.
pub fn run_analysis(files: &[SourceFile], config: &DustpanConfig) -> AnalysisResult {
    let started = Instant::now();
    let filter = ExclusionFilter::new(&config.census);
    let (files, census) = census(files, &filter);
    info!(
        files = census.total_files,
        excluded = census.excluded_files,
        parallel = config.analysis.parallel,
        "starting analysis"
    );

    let pipeline = Pipeline {
        files: &files,
        config,
    };
    let mut result = if config.analysis.parallel {
        pipeline.run_parallel()
    } else {
        pipeline.run_sequential()
    };
    result.census = census;

    info!(
        unused = result.unused_count(),
        duplicate_groups = result.duplicate_functions.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analysis finished"
    );
    result
}

struct Pipeline<'a> {
    files: &'a [SourceFile],
    config: &'a DustpanConfig,
}

impl Pipeline<'_> {
    fn symbols(&self, analyzer: &dyn SymbolAnalyzer) -> SymbolReport {
        let report = analyzer.analyze(self.files);
        debug!(
            section = analyzer.name(),
            total = report.total,
            unused = report.unused.len(),
            "section done"
        );
        report
    }

    fn variables(&self) -> SymbolReport {
        self.symbols(&VariableAnalyzer::new(self.config.analysis.identity_policy))
    }

    fn functions(&self) -> SymbolReport {
        self.symbols(&FunctionAnalyzer::new(self.config.analysis.identity_policy))
    }

    fn exports(&self) -> SymbolReport {
        self.symbols(&ExportAnalyzer::new(
            self.config.analysis.identity_policy,
            self.config.exports.token_fallback,
        ))
    }

    fn hooks(&self) -> SymbolReport {
        self.symbols(&HookAnalyzer::new(self.config.analysis.identity_policy))
    }

    fn images(&self) -> SymbolReport {
        self.symbols(&ImageAnalyzer::new(self.config.analysis.identity_policy))
    }

    fn css_classes(&self) -> SymbolReport {
        self.symbols(&CssClassAnalyzer::new(self.config.analysis.identity_policy))
    }

    fn types(&self) -> TypeReport {
        TypeGraphAnalyzer::new(self.config.analysis.identity_policy).report(self.files)
    }

    fn api_endpoints(&self) -> ApiReport {
        ApiRouteAnalyzer::new(self.config.analysis.identity_policy).report(self.files)
    }

    fn duplicates(&self) -> Vec<DuplicateGroup> {
        detect_duplicates(self.files, &self.config.duplicates)
    }

    fn auth(&self) -> AuthReport {
        detect_auth(self.files)
    }

    fn storage(&self) -> StorageReport {
        detect_storage(self.files)
    }

    fn run_sequential(&self) -> AnalysisResult {
        AnalysisResult {
            census: Default::default(),
            variables: isolated("variables", || self.variables()),
            functions: isolated("functions", || self.functions()),
            exports: isolated("exports", || self.exports()),
            hooks: isolated("hooks", || self.hooks()),
            types: isolated("types", || self.types()),
            images: isolated("images", || self.images()),
            css_classes: isolated("css_classes", || self.css_classes()),
            api_endpoints: isolated("api_endpoints", || self.api_endpoints()),
            duplicate_functions: isolated("duplicate_functions", || self.duplicates()),
            auth: isolated("auth", || self.auth()),
            storage: isolated("storage", || self.storage()),
        }
    }

    fn run_parallel(&self) -> AnalysisResult {
        thread::scope(|s| {
            let variables = s.spawn(|| self.variables());
            let functions = s.spawn(|| self.functions());
            let exports = s.spawn(|| self.exports());
            let hooks = s.spawn(|| self.hooks());
            let types = s.spawn(|| self.types());
            let images = s.spawn(|| self.images());
            let css_classes = s.spawn(|| self.css_classes());
            let api_endpoints = s.spawn(|| self.api_endpoints());
            let duplicates = s.spawn(|| self.duplicates());
            let auth = s.spawn(|| self.auth());
            let storage = s.spawn(|| self.storage());

            AnalysisResult {
                census: Default::default(),
                variables: joined("variables", variables),
                functions: joined("functions", functions),
                exports: joined("exports", exports),
                hooks: joined("hooks", hooks),
                types: joined("types", types),
                images: joined("images", images),
                css_classes: joined("css_classes", css_classes),
                api_endpoints: joined("api_endpoints", api_endpoints),
                duplicate_functions: joined("duplicate_functions", duplicates),
                auth: joined("auth", auth),
                storage: joined("storage", storage),
            }
        })
    }
}

fn isolated<T: Default>(section: &str, job: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|panic| {
        warn!(section, reason = %panic_message(panic.as_ref()), "analyzer panicked, section left empty");
        T::default()
    })
}

fn joined<T: Default>(section: &str, handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|panic| {
        warn!(section, reason = %panic_message(panic.as_ref()), "analyzer panicked, section left empty");
        T::default()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Vec<SourceFile> {
        vec![
            SourceFile::new(
                "src/App.jsx",
                "import { useCounter } from './hooks';\nimport './App.css';\n\nconst unusedFlag = true;\n\nexport default function App() {\n  const [count, setCount] = useState(0);\n  return <div className=\"app\" onClick={() => setCount(count + 1)}>{useCounter()}</div>;\n}\n",
            ),
            SourceFile::new(
                "src/hooks.js",
                "export function useCounter() {\n  return 1;\n}\n",
            ),
            SourceFile::new("src/App.css", ".app { margin: 0; }\n.dead { color: red; }\n"),
            SourceFile::new("node_modules/lib/index.js", "function ignored() {}\n"),
        ]
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let files = project();
        let mut config = DustpanConfig::default();
        let parallel = run_analysis(&files, &config);
        config.analysis.parallel = false;
        let sequential = run_analysis(&files, &config);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn excluded_files_take_no_part() {
        let result = run_analysis(&project(), &DustpanConfig::default());
        assert_eq!(result.census.total_files, 3);
        assert_eq!(result.census.excluded_files, 1);
        assert!(result.functions.unused.iter().all(|i| i.name != "ignored"));
    }

    #[test]
    fn findings_land_in_their_sections() {
        let result = run_analysis(&project(), &DustpanConfig::default());
        let names = |section: &SymbolReport| -> Vec<String> {
            section.unused.iter().map(|i| i.name.clone()).collect()
        };
        assert_eq!(names(&result.variables), vec!["unusedFlag"]);
        assert_eq!(names(&result.css_classes), vec!["dead"]);
        assert!(result.hooks.unused.is_empty());
        assert!(!result.is_clean());
    }

    #[test]
    fn panicking_section_is_contained() {
        assert_eq!(isolated("boom", || -> SymbolReport { panic!("boom") }), SymbolReport::default());
        let value = thread::scope(|s| joined("boom", s.spawn(|| -> Vec<DuplicateGroup> { panic!("boom") })));
        assert!(value.is_empty());
        assert_eq!(panic_message(&"text"), "text");
    }
}
