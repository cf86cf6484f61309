//! Human-readable and JSON renderings of an [`AnalysisResult`].

use std::collections::BTreeSet;

use colored::Colorize;

use crate::types::SymbolReport;

use super::report::AnalysisResult;

pub fn render_json(result: &AnalysisResult, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let census = &result.census;
    out.push_str(&format!("{}\n", "dustpan report".bold()));
    out.push_str(&format!(
        "  {} files analyzed, {} excluded (scripts {}, styles {}, markup {}, assets {})\n",
        census.total_files,
        census.excluded_files,
        census.script_files,
        census.style_files,
        census.markup_files,
        census.asset_files
    ));

    for (key, section) in result.symbol_sections() {
        push_symbol_section(&mut out, key, section);
    }

    let api = &result.api_endpoints;
    out.push_str(&format!(
        "\n{} {}\n",
        "api_endpoints".cyan().bold(),
        format!("({} routes, {} unused)", api.total, api.unused.len()).dimmed()
    ));
    for item in &api.unused {
        out.push_str(&format!("  {}:{}  {}\n", item.file, item.line, item.name.yellow()));
    }

    push_types(&mut out, result);
    push_duplicates(&mut out, result);
    push_characterization(&mut out, result);

    let findings = result.unused_count() + result.similar_duplicates().count();
    if result.is_clean() {
        out.push_str(&format!("\n{}\n", "clean: nothing to sweep".green().bold()));
    } else {
        out.push_str(&format!("\n{}\n", format!("{findings} findings").red().bold()));
    }
    out
}

fn push_symbol_section(out: &mut String, key: &str, section: &SymbolReport) {
    out.push_str(&format!(
        "\n{} {}\n",
        key.cyan().bold(),
        format!("({} declared, {} unused)", section.total, section.unused.len()).dimmed()
    ));
    for item in &section.unused {
        out.push_str(&format!(
            "  {}:{}  {}  {}\n",
            item.file,
            item.line,
            item.name.yellow(),
            format!("({})", item.label).dimmed()
        ));
    }
}

fn push_types(out: &mut String, result: &AnalysisResult) {
    let types = &result.types;
    out.push_str(&format!(
        "\n{} {}\n",
        "types".cyan().bold(),
        format!("({} types, {} interfaces)", types.total_types, types.total_interfaces).dimmed()
    ));
    for def in types.definitions.iter().filter(|d| !d.dependencies.is_empty()) {
        out.push_str(&format!("  {} -> {}\n", def.name, join(&def.dependencies)));
    }
}

fn push_duplicates(out: &mut String, result: &AnalysisResult) {
    if result.duplicate_functions.is_empty() {
        return;
    }
    out.push_str(&format!("\n{}\n", "duplicate_functions".cyan().bold()));
    for group in &result.duplicate_functions {
        let verdict = if group.similar {
            "similar".red()
        } else {
            "distinct".dimmed()
        };
        out.push_str(&format!(
            "  {}  {}  {} files: {}\n",
            group.name.yellow(),
            verdict,
            group.count,
            join(&group.locations)
        ));
    }
}

fn push_characterization(out: &mut String, result: &AnalysisResult) {
    let auth = &result.auth;
    let storage = &result.storage;
    out.push_str(&format!("\n{}\n", "auth".cyan().bold()));
    out.push_str(&format!("  providers: {}\n", join(&auth.providers)));
    out.push_str(&format!("  mechanisms: {}\n", join(&auth.auth_types)));
    out.push_str(&format!("\n{}\n", "storage".cyan().bold()));
    out.push_str(&format!("  localStorage: {}\n", join(&storage.local_storage_keys)));
    out.push_str(&format!("  sessionStorage: {}\n", join(&storage.session_storage_keys)));
    out.push_str(&format!("  cookies: {}\n", join(&storage.cookie_keys)));
    out.push_str(&format!(
        "  indexedDB: {}\n",
        if storage.uses_indexed_db { "yes" } else { "no" }
    ));
}

fn join(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}
