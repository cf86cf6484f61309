//! API route strings: literals handed to network clients, and routes implied
//! by `pages/api/` and `app/api/` file conventions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{
    DeclKind, Declaration, DeclarationTable, Identity, IdentityPolicy, SourceFile, UnusedItem,
};

use super::classify::{is_markup, is_script};
use super::regexes::{
    regex_axios_bare_call, regex_client_verb_call, regex_fetch_call, regex_swr_call,
};
use super::{SymbolAnalyzer, offset_to_line, unused_report};

const ROUTE_DIRS: &[&str] = &["pages/api/", "app/api/"];
const API_ROOT: &str = "/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Passed to `fetch`, `axios`, `useSWR` and friends.
    Call,
    /// Inferred from the handler file's location.
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub file: String,
    pub line: usize,
    pub source: RouteSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiReport {
    pub total: usize,
    pub endpoints: Vec<ApiEndpoint>,
    pub unused: Vec<UnusedItem>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiRouteAnalyzer {
    pub policy: IdentityPolicy,
}

impl ApiRouteAnalyzer {
    pub fn new(policy: IdentityPolicy) -> Self {
        Self { policy }
    }

    pub fn report(&self, files: &[SourceFile]) -> ApiReport {
        let declared = self.extract(files);
        let used = self.resolve(files, &declared);
        let section = unused_report(&declared, &used);
        ApiReport {
            total: section.total,
            endpoints: endpoints(files),
            unused: section.unused,
        }
    }
}

/// Every route occurrence, ordered by file then line.
pub fn endpoints(files: &[SourceFile]) -> Vec<ApiEndpoint> {
    let mut found = Vec::new();
    for file in files {
        if is_script(file) || is_markup(file) {
            found.extend(call_endpoints(file));
        }
        if is_script(file)
            && let Some(route) = route_from_path(&file.path)
        {
            found.push(ApiEndpoint {
                route,
                method: None,
                file: file.path.clone(),
                line: 1,
                source: RouteSource::File,
            });
        }
    }
    found.sort_by(|a, b| {
        (a.file.as_str(), a.line, a.route.as_str(), a.source)
            .cmp(&(b.file.as_str(), b.line, b.route.as_str(), b.source))
    });
    found.dedup();
    found
}

fn call_endpoints(file: &SourceFile) -> Vec<ApiEndpoint> {
    let content = &file.content;
    let mut found = Vec::new();
    let mut push = |offset: usize, literal: &str, method: Option<String>| {
        let route = literal.split(['?', '#']).next().unwrap_or(literal);
        if route.starts_with('/') || route.starts_with("http") {
            found.push(ApiEndpoint {
                route: route.to_string(),
                method,
                file: file.path.clone(),
                line: offset_to_line(content, offset),
                source: RouteSource::Call,
            });
        }
    };

    for caps in regex_client_verb_call().captures_iter(content) {
        let (Some(verb), Some(url)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let method = match verb.as_str() {
            "getJSON" => "GET".to_string(),
            other => other.to_ascii_uppercase(),
        };
        push(url.start(), url.as_str(), Some(method));
    }
    for caps in regex_swr_call().captures_iter(content) {
        if let Some(url) = caps.get(1) {
            push(url.start(), url.as_str(), Some("GET".to_string()));
        }
    }
    for re in [regex_fetch_call(), regex_axios_bare_call()] {
        for caps in re.captures_iter(content) {
            if let Some(url) = caps.get(1) {
                push(url.start(), url.as_str(), None);
            }
        }
    }
    found
}

/// `src/pages/api/users/[id].ts` → `/api/users/[id]`,
/// `app/api/health/route.ts` → `/api/health`.
pub fn route_from_path(path: &str) -> Option<String> {
    let start = ROUTE_DIRS.iter().find_map(|dir| {
        if path.starts_with(dir) {
            Some(dir.len() - "api/".len())
        } else {
            path.find(&format!("/{dir}"))
                .map(|idx| idx + 1 + dir.len() - "api/".len())
        }
    })?;

    let relative = &path[start..];
    let without_ext = match relative.rsplit_once('.') {
        Some((stem, _)) if !stem.ends_with('/') => stem,
        _ => relative,
    };
    let mut segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last().is_some_and(|last| *last == "index" || *last == "route") {
        segments.pop();
    }
    Some(format!("/{}", segments.join("/")))
}

/// The route text followed by something that cannot continue a path segment.
fn route_mentioned(haystack: &str, route: &str) -> bool {
    haystack.match_indices(route).any(|(idx, _)| {
        haystack[idx + route.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '-'))
    })
}

/// For `/api/users/[id]` a literal starting with `/api/users/` counts.
fn dynamic_prefix_mentioned(haystack: &str, route: &str) -> bool {
    let Some(bracket) = route.find('[') else {
        return false;
    };
    let prefix = &route[..bracket];
    if prefix.len() <= API_ROOT.len() {
        return false;
    }
    ['"', '\'', '`']
        .iter()
        .any(|quote| haystack.contains(&format!("{quote}{prefix}")))
}

impl SymbolAnalyzer for ApiRouteAnalyzer {
    fn name(&self) -> &'static str {
        "api_endpoints"
    }

    fn extract(&self, files: &[SourceFile]) -> DeclarationTable {
        let mut table = DeclarationTable::new(self.policy);
        for endpoint in endpoints(files) {
            table.insert(Declaration::new(
                endpoint.route,
                DeclKind::ApiRoute,
                &endpoint.file,
                endpoint.line,
            ));
        }
        table
    }

    fn resolve(&self, files: &[SourceFile], declared: &DeclarationTable) -> HashSet<Identity> {
        let haystack = files
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        declared
            .iter()
            .filter(|decl| {
                route_mentioned(&haystack, &decl.name)
                    || dynamic_prefix_mentioned(&haystack, &decl.name)
            })
            .map(|decl| decl.identity())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_from_file_conventions() {
        assert_eq!(route_from_path("pages/api/users.ts").as_deref(), Some("/api/users"));
        assert_eq!(route_from_path("src/pages/api/index.js").as_deref(), Some("/api"));
        assert_eq!(
            route_from_path("src/pages/api/users/[id].ts").as_deref(),
            Some("/api/users/[id]")
        );
        assert_eq!(route_from_path("app/api/health/route.ts").as_deref(), Some("/api/health"));
        assert_eq!(route_from_path("src/mypages/api/x.ts"), None);
        assert_eq!(route_from_path("src/components/Api.tsx"), None);
    }

    #[test]
    fn call_sites_and_methods() {
        let files = vec![SourceFile::new(
            "src/client.ts",
            "fetch('/api/users');\naxios.post(\"/api/login\", body);\nconst { data } = useSWR('/api/me');\nky.delete(`https://example.com/v1/items`);\nfetch(url);\nfetch('relative/path');\n",
        )];
        let found: Vec<(String, Option<String>, usize)> = endpoints(&files)
            .into_iter()
            .map(|e| (e.route, e.method, e.line))
            .collect();
        assert_eq!(
            found,
            vec![
                ("/api/users".to_string(), None, 1),
                ("/api/login".to_string(), Some("POST".to_string()), 2),
                ("/api/me".to_string(), Some("GET".to_string()), 3),
                ("https://example.com/v1/items".to_string(), Some("DELETE".to_string()), 4),
            ]
        );
    }

    #[test]
    fn handler_without_caller_is_unused() {
        let files = vec![
            SourceFile::new("pages/api/orphan.ts", "export default function handler() {}\n"),
            SourceFile::new("pages/api/users.ts", "export default function handler() {}\n"),
            SourceFile::new("src/App.tsx", "fetch('/api/users?limit=5');\n"),
        ];
        let report = ApiRouteAnalyzer::default().report(&files);
        assert_eq!(report.total, 2);
        let unused: Vec<&str> = report.unused.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(unused, vec!["/api/orphan"]);
        assert_eq!(report.unused[0].line, 1);
        assert_eq!(report.endpoints.len(), 3);
    }

    #[test]
    fn dynamic_route_matches_static_prefix() {
        let files = vec![
            SourceFile::new("pages/api/posts/[id].ts", "export default () => {};\n"),
            SourceFile::new("pages/api/[slug].ts", "export default () => {};\n"),
            SourceFile::new("src/Post.tsx", "fetch(`/api/posts/${id}`);\nfetch(`/api/${slug}`);\n"),
        ];
        let report = ApiRouteAnalyzer::default().report(&files);
        let unused: Vec<&str> = report.unused.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(unused, vec!["/api/[slug]"]);
    }

    #[test]
    fn longer_route_is_not_a_mention() {
        assert!(!route_mentioned("'/api/users-admin'", "/api/users"));
        assert!(route_mentioned("'/api/users/5'", "/api/users"));
        assert!(route_mentioned("https://x.io/api/users", "/api/users"));
    }
}
