//! Shared text primitives: escaping, token-boundary search and asset path spellings.

/// Escape text for safe embedding in HTML element content or attribute values.
///
/// Library API for callers that put report names into HTML. The text and JSON
/// renderers print names unescaped.
///
/// ```
/// use dustpan::text::escape_html;
///
/// assert_eq!(escape_html("<Modal open=\"x\">"), "&lt;Modal open=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Characters that may appear inside a JS identifier.
pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Characters that continue a file name or CSS class token.
fn is_path_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

/// Byte offsets of every occurrence of `token` not glued to identifier characters.
pub fn token_positions<'a>(haystack: &'a str, token: &'a str) -> impl Iterator<Item = usize> + 'a {
    bounded_positions(haystack, token, is_ident_char)
}

/// True when `token` occurs in `haystack` on identifier boundaries.
pub fn contains_token(haystack: &str, token: &str) -> bool {
    token_positions(haystack, token).next().is_some()
}

/// Like [`contains_token`] but with file-name boundaries (`-` counts as a word char,
/// `$` and `.` do not).
pub fn contains_path_token(haystack: &str, token: &str) -> bool {
    bounded_positions(haystack, token, is_path_word_char)
        .next()
        .is_some()
}

fn bounded_positions<'a>(
    haystack: &'a str,
    token: &'a str,
    is_word: fn(char) -> bool,
) -> impl Iterator<Item = usize> + 'a {
    let skip_all = token.is_empty();
    haystack
        .match_indices(token)
        .filter(move |_| !skip_all)
        .filter_map(move |(start, _)| {
            let end = start + token.len();
            let before_ok = haystack[..start]
                .chars()
                .next_back()
                .is_none_or(|c| !is_word(c));
            let after_ok = haystack[end..].chars().next().is_none_or(|c| !is_word(c));
            (before_ok && after_ok).then_some(start)
        })
}

/// Alternate spellings under which an asset path may be referenced.
///
/// For `public/img/my logo.png` this yields the full path, every segment suffix
/// with and without a leading `/`, the bare name, the URL-encoded name and path,
/// and the stem. Order is deterministic and duplicates are dropped.
pub fn path_variants(path: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    };

    let trimmed = path.trim_start_matches("./").trim_start_matches('/');
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    let Some(name) = segments.last().copied() else {
        return Vec::new();
    };

    push(trimmed.to_string());
    for start in 0..segments.len() {
        let suffix = segments[start..].join("/");
        push(format!("/{suffix}"));
        push(suffix);
    }

    push(name.to_string());

    let encoded_name = urlencoding::encode(name).into_owned();
    push(encoded_name);
    let encoded_path = segments
        .iter()
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    push(encoded_path);

    if let Some((stem, _)) = name.rsplit_once('.')
        && !stem.is_empty()
    {
        push(stem.to_string());
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn token_respects_identifier_boundaries() {
        assert!(contains_token("console.log(unused)", "unused"));
        assert!(!contains_token("const unusedValue = 1", "unused"));
        assert!(!contains_token("$unused", "unused"));
        assert!(contains_token("unused", "unused"));
        assert!(!contains_token("anything", ""));
    }

    #[test]
    fn token_positions_finds_each_occurrence() {
        let positions: Vec<usize> = token_positions("a + ab + a", "a").collect();
        assert_eq!(positions, vec![0, 9]);
    }

    #[test]
    fn path_token_treats_dash_as_word() {
        assert!(contains_path_token("src=\"./assets/logo.png\"", "assets/logo.png"));
        assert!(!contains_path_token("dark-logo.png", "logo.png"));
        assert!(!contains_path_token("mylogo.png", "logo.png"));
    }

    #[test]
    fn variants_cover_suffixes_and_encodings() {
        let variants = path_variants("public/img/my logo.png");
        for expected in [
            "public/img/my logo.png",
            "/img/my logo.png",
            "img/my logo.png",
            "/my logo.png",
            "my logo.png",
            "my%20logo.png",
            "public/img/my%20logo.png",
            "my logo",
        ] {
            assert!(
                variants.iter().any(|v| v == expected),
                "missing {expected:?} in {variants:?}"
            );
        }
    }

    #[test]
    fn variants_have_no_duplicates() {
        let variants = path_variants("logo.png");
        assert_eq!(variants, vec!["logo.png", "/logo.png", "logo"]);
    }

    #[test]
    fn variants_of_empty_path_are_empty() {
        assert!(path_variants("").is_empty());
    }
}
