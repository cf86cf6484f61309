//! CSS class selectors and their usage from scripts and markup.

use std::collections::HashSet;

use crate::text::contains_path_token;
use crate::types::{DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile};

use super::classify::{is_markup, is_script, is_style};
use super::regexes::{regex_css_class_selector, regex_style_block};
use super::{SymbolAnalyzer, offset_to_line};

#[derive(Debug, Clone, Default)]
pub struct CssClassAnalyzer {
    pub policy: IdentityPolicy,
}

impl CssClassAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }
}

/// A stylesheet region inside a file: the text and its byte offset.
struct StyleRegion<'a> {
    text: &'a str,
    offset: usize,
}

fn style_regions(file: &SourceFile) -> Vec<StyleRegion<'_>> {
    if is_style(file) {
        return vec![StyleRegion {
            text: &file.content,
            offset: 0,
        }];
    }
    if is_markup(file) {
        return regex_style_block()
            .captures_iter(&file.content)
            .filter_map(|caps| caps.get(1))
            .map(|m| StyleRegion {
                text: m.as_str(),
                offset: m.start(),
            })
            .collect();
    }
    Vec::new()
}

/// Replace `/* ... */` comments with spaces, keeping newlines and byte offsets.
fn blank_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let end = rest[start + 2..]
            .find("*/")
            .map_or(rest.len(), |e| start + 2 + e + 2);
        for c in rest[start..end].chars() {
            if c == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// `(offset, class)` for every class selector in rule preludes.
///
/// Declaration bodies and at-rule preludes are never scanned, so values such
/// as `0.5em` or `url(a.png)` cannot produce classes.
fn class_selectors(css: &str) -> Vec<(usize, String)> {
    let cleaned = blank_comments(css);
    let mut found = Vec::new();
    let mut prelude_start = 0;
    for (idx, ch) in cleaned.char_indices() {
        match ch {
            '{' => {
                let prelude = &cleaned[prelude_start..idx];
                if !prelude.trim_start().starts_with('@') {
                    for caps in regex_css_class_selector().captures_iter(prelude) {
                        if let Some(m) = caps.get(1) {
                            found.push((prelude_start + m.start(), m.as_str().to_string()));
                        }
                    }
                }
                prelude_start = idx + 1;
            }
            '}' | ';' => prelude_start = idx + 1,
            _ => {}
        }
    }
    found
}

impl SymbolAnalyzer for CssClassAnalyzer {
    fn name(&self) -> &'static str {
        "css_classes"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for file in files {
            for region in style_regions(file) {
                for (offset, class) in class_selectors(region.text) {
                    let line = offset_to_line(&file.content, region.offset + offset);
                    table.insert(Declaration::new(class, DeclKind::CssClass, &file.path, line));
                }
            }
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        // Style blocks inside markup define classes; they do not use them.
        let haystack = files
            .iter()
            .filter(|f| is_script(f) || is_markup(f))
            .map(|f| regex_style_block().replace_all(&f.content, "").into_owned())
            .collect::<Vec<_>>()
            .join("\n");

        declared
            .iter()
            .filter(|decl| is_class_referenced(&haystack, &decl.name))
            .map(|decl| decl.identity())
            .collect()
    }
}

fn is_class_referenced(haystack: &str, class: &str) -> bool {
    if contains_path_token(haystack, class) {
        return true;
    }
    // `btn-${variant}` builds `btn-primary` at runtime.
    class
        .rfind('-')
        .filter(|&i| i > 0)
        .is_some_and(|i| haystack.contains(&format!("{}${{", &class[..=i])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(css: &str) -> Vec<String> {
        class_selectors(css).into_iter().map(|(_, c)| c).collect()
    }

    #[test]
    fn selectors_only_from_preludes() {
        let css = "/* .commented { } */\n.btn:hover, .btn.primary > a { margin: 0.5em; background: url(img/a.png); }\n@media (max-width: 10.5em) {\n  .card { color: red; }\n}\n";
        assert_eq!(classes(css), vec!["btn", "btn", "primary", "card"]);
    }

    #[test]
    fn nested_scss_rules() {
        let scss = ".nav {\n  color: red;\n  &.open { display: block; }\n  .item { padding: 0; }\n}\n";
        assert_eq!(classes(scss), vec!["nav", "open", "item"]);
    }

    #[test]
    fn keyframe_percentages_are_ignored() {
        let css = "@keyframes spin { 0% { opacity: 0; } 50.5% { opacity: .5; } }\n";
        assert!(classes(css).is_empty());
    }

    #[test]
    fn blank_comments_preserves_offsets() {
        let css = "a/* x\ny */b";
        let blanked = blank_comments(css);
        assert_eq!(blanked.len(), css.len());
        assert_eq!(blanked.matches('\n').count(), 1);
        assert!(blanked.starts_with('a') && blanked.ends_with('b'));
    }

    #[test]
    fn extraction_reports_lines_in_style_blocks() {
        let files = vec![SourceFile::new(
            "src/App.vue",
            "<template>\n  <div class=\"wrap\"></div>\n</template>\n<style scoped>\n.wrap { margin: 0; }\n.ghost { color: red; }\n</style>\n",
        )];
        let analyzer = CssClassAnalyzer::default();
        let table = analyzer.extract(&files);
        let found: Vec<(&str, usize)> = table.iter().map(|d| (d.name.as_str(), d.line)).collect();
        assert_eq!(found, vec![("ghost", 6), ("wrap", 5)]);

        let report = analyzer.analyze(&files);
        assert_eq!(report.unused.len(), 1);
        assert_eq!(report.unused[0].name, "ghost");
    }

    #[test]
    fn usage_from_scripts_and_templates() {
        let files = vec![
            SourceFile::new(
                "src/styles.css",
                ".card {}\n.card-title {}\n.btn-primary {}\n.orphan {}\n",
            ),
            SourceFile::new(
                "src/Card.jsx",
                "<div className=\"card\"><h2 className={styles['card-title']} /><a className={`btn-${kind}`} /></div>",
            ),
        ];
        let report = CssClassAnalyzer::default().analyze(&files);
        let names: Vec<String> = report.unused.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["orphan"]);
    }

    #[test]
    fn dashed_neighbour_is_not_usage() {
        let files = vec![
            SourceFile::new("a.css", ".title {}\n"),
            SourceFile::new("a.html", "<h1 class=\"title-large\"></h1>"),
        ];
        let report = CssClassAnalyzer::default().analyze(&files);
        assert_eq!(report.unused.len(), 1);
    }
}
