/// Proportion of position-aligned matching characters over the longer length.
///
/// Both empty scores 1.0, exactly one empty scores 0.0. Characters are compared
/// as Unicode scalar values, so the score is always within `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let matching = a
        .chars()
        .zip(b.chars())
        .filter(|(ca, cb)| ca == cb)
        .count();
    matching as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("return a + b;", "return a + b;"), 1.0);
    }

    #[test]
    fn empty_edges() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        assert_eq!(similarity("x", ""), 0.0);
    }

    #[test]
    fn positional_not_edit_distance() {
        // A one-char shift breaks alignment for everything after it.
        assert_eq!(similarity("abcd", "xabc"), 0.0);
        assert_eq!(similarity("abcd", "abcx"), 0.75);
    }

    #[test]
    fn longer_string_sets_denominator() {
        assert_eq!(similarity("ab", "abcd"), 0.5);
        assert_eq!(similarity("abcd", "ab"), 0.5);
    }

    #[test]
    fn score_is_bounded() {
        let samples = ["", "a", "ábc", "const x = 1;", "🦀🦀", "zzzzzzzzzz"];
        for a in samples {
            for b in samples {
                let score = similarity(a, b);
                assert!((0.0..=1.0).contains(&score), "{a:?} vs {b:?} = {score}");
            }
        }
    }
}
