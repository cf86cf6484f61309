//! Static reference and declaration patterns.
//!
//! All patterns run on the `regex` crate's finite-automata engine, so matching
//! time stays linear in the input no matter how hostile the text is.

use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

pub(crate) fn regex_state_destructure() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"^\s*(?:export\s+)?(?:const|let|var)\s*\[\s*([A-Za-z_$][\w$]*)\s*,\s*([A-Za-z_$][\w$]*)\s*\]\s*="#)
    })
}

pub(crate) fn regex_state_initializer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(?:useState|useReducer)\s*(?:<[^>\n]*>)?\s*\("#))
}

pub(crate) fn regex_function_value_binding() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|[A-Za-z_$][\w$]*\s*=>)"#,
        )
    })
}

pub(crate) fn regex_exported_binding() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*export\s+(?:const|let|var)\s+([A-Za-z_$][\w$]*)"#))
}

pub(crate) fn regex_constructed_binding() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `const x = new Foo()` and `const x = a.b(...)` (optionally awaited)
    RE.get_or_init(|| {
        regex(
            r#"(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*(?::[^=]+)?=\s*(?:await\s+)?(?:new\s+[A-Za-z_$]|[A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)+\s*\()"#,
        )
    })
}

pub(crate) fn regex_plain_binding() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?:^|[^\w$.])(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=;]+)?=(?:[^=]|$)"#))
}

// ---------------------------------------------------------------------------
// Functions and hooks
// ---------------------------------------------------------------------------

pub(crate) fn regex_function_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>\n]*>)?\s*\("#,
        )
    })
}

pub(crate) fn regex_arrow_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?m)^[ \t]*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=\n]+)?=\s*(?:async\s+)?(?:function\b|(?:<[^>\n]*>\s*)?\([^)]*\)\s*(?::[^=\n]+)?=>|[A-Za-z_$][\w$]*\s*=>)"#,
        )
    })
}

pub(crate) fn regex_hook_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^use[A-Z0-9][\w$]*$"#))
}

/// `const useStore = create(...)`: a hook-named binding of any value.
pub(crate) fn regex_hook_binding() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"(?:^|[^\w$.])(?:const|let|var)\s+(use[A-Z0-9][\w$]*)\s*(?::[^=;]+)?=(?:[^=]|$)"#)
    })
}

// ---------------------------------------------------------------------------
// Exports and imports
// ---------------------------------------------------------------------------

pub(crate) fn regex_export_named_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?m)^[ \t]*export\s+(?:declare\s+)?(?:async\s+)?(?:abstract\s+)?(?:function\s*\*?|const|let|var|class|interface|type|enum)\s+([A-Za-z_$][\w$]*)"#,
        )
    })
}

pub(crate) fn regex_export_default_named() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"(?m)^[ \t]*export\s+default\s+(?:async\s+)?(?:function\s*\*?|class)\s+([A-Za-z_$][\w$]*)"#)
    })
}

pub(crate) fn regex_export_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^[ \t]*export\s+(?:type\s+)?\{([^}]*)\}"#))
}

pub(crate) fn regex_reexport_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"export\s+(?:type\s+)?\{([^}]*)\}\s*from\s*["']"#))
}

pub(crate) fn regex_reexport_star_as() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^[ \t]*export\s+\*\s+as\s+([A-Za-z_$][\w$]*)\s+from"#))
}

pub(crate) fn regex_import_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"import\s+(?:type\s+)?(?:[A-Za-z_$][\w$]*\s*,\s*)?\{([^}]*)\}\s*from"#)
    })
}

pub(crate) fn regex_import_default() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"import\s+(?:type\s+)?([A-Za-z_$][\w$]*)\s*(?:,|\s+from\b)"#))
}

pub(crate) fn regex_require_destructure() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?:const|let|var)\s*\{([^}]*)\}\s*=\s*require\s*\("#))
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub(crate) fn regex_interface_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:declare\s+)?interface\s+([A-Za-z_$][\w$]*)"#)
    })
}

pub(crate) fn regex_type_alias_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?type\s+([A-Za-z_$][\w$]*)\s*(?:<[^=\n]*>)?\s*="#)
    })
}

pub(crate) fn regex_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"[A-Za-z_$][\w$]*"#))
}

// ---------------------------------------------------------------------------
// Markup and styles
// ---------------------------------------------------------------------------

pub(crate) fn regex_style_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?is)<style[^>]*>(.*?)</style>"#))
}

pub(crate) fn regex_css_class_selector() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\.(-?[_a-zA-Z][\w-]*)"#))
}

// ---------------------------------------------------------------------------
// Network calls
// ---------------------------------------------------------------------------

pub(crate) fn regex_fetch_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\bfetch\s*\(\s*["'`]([^"'`\s]+)["'`]"#))
}

pub(crate) fn regex_client_verb_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?:\b(?:axios|ky|api|http|client)|\$http|\$)\s*\.\s*(get|post|put|patch|delete|head|options|getJSON)\s*(?:<[^>\n]*>)?\s*\(\s*["'`]([^"'`\s]+)["'`]"#,
        )
    })
}

pub(crate) fn regex_axios_bare_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\baxios\s*\(\s*["'`]([^"'`\s]+)["'`]"#))
}

pub(crate) fn regex_swr_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\buseSWR(?:Immutable)?\s*(?:<[^>\n]*>)?\s*\(\s*["'`]([^"'`\s]+)["'`]"#))
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

pub(crate) fn regex_web_storage_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"\b(localStorage|sessionStorage)\s*\.\s*(?:getItem|setItem|removeItem)\s*\(\s*["'`]([^"'`]+)["'`]"#)
    })
}

pub(crate) fn regex_web_storage_index() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(localStorage|sessionStorage)\s*\[\s*["'`]([^"'`]+)["'`]\s*\]"#))
}

pub(crate) fn regex_web_storage_property() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(localStorage|sessionStorage)\.([A-Za-z_$][\w$]*)"#))
}

pub(crate) fn regex_cookie_library() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\bCookies\s*\.\s*(?:get|set|remove)\s*\(\s*["'`]([^"'`]+)["'`]"#))
}

pub(crate) fn regex_cookie_store() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"\bcookies\s*\(\s*\)\s*\.\s*(?:get|set|delete|has)\s*\(\s*["'`]([^"'`]+)["'`]"#)
    })
}

pub(crate) fn regex_document_cookie() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"document\.cookie\s*=\s*["'`]\s*([^=;"'`\s]+)\s*="#))
}

pub(crate) fn regex_response_cookie() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"\b(?:res|response)\s*\.\s*(?:cookie|clearCookie)\s*\(\s*["'`]([^"'`]+)["'`]"#)
    })
}

pub(crate) fn regex_request_cookie() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r#"\breq\s*\.\s*cookies\s*(?:\.\s*([A-Za-z_$][\w$]*)|\[\s*["'`]([^"'`]+)["'`]\s*\])"#)
    })
}

pub(crate) fn regex_indexed_db_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\b(?:indexedDB\s*\.\s*open|openDB)\s*\("#))
}
