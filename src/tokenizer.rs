//! Splitting raw prompt and answer text into units.
//!
//! A unit is the smallest piece that gets its own card: one Zhuyin symbol
//! (or a space-separated compound), one CJK ideograph, or one Latin word.

/// First and last code points of the CJK Unified Ideographs block.
const IDEOGRAPH_FIRST: char = '\u{4E00}';
const IDEOGRAPH_LAST: char = '\u{9FFF}';

/// Whether `c` is a CJK unified ideograph.
pub fn is_ideograph(c: char) -> bool {
    (IDEOGRAPH_FIRST..=IDEOGRAPH_LAST).contains(&c)
}

/// Split a phonetic prompt into units.
///
/// Without internal whitespace every character is its own unit; once the
/// host separates with spaces, the whitespace-delimited tokens are used
/// instead so that multi-symbol compounds stay together.
pub fn tokenize_phonetic(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.contains(char::is_whitespace) {
        trimmed.split_whitespace().map(str::to_string).collect()
    } else {
        trimmed.chars().map(String::from).collect()
    }
}

/// Split an answer into units.
///
/// Each ideograph is a unit on its own. Runs of anything else inside a word
/// stay together, so a Latin word is never broken apart.
pub fn tokenize_answer(raw: &str) -> Vec<String> {
    let mut units = Vec::new();

    for word in raw.split_whitespace() {
        let mut run = String::new();
        for c in word.chars() {
            if is_ideograph(c) {
                if !run.is_empty() {
                    units.push(std::mem::take(&mut run));
                }
                units.push(c.to_string());
            } else {
                run.push(c);
            }
        }
        if !run.is_empty() {
            units.push(run);
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonetic_without_spaces_splits_per_character() {
        assert_eq!(tokenize_phonetic("ㄋㄖㄇ"), vec!["ㄋ", "ㄖ", "ㄇ"]);
        assert_eq!(tokenize_phonetic("  ㄇㄕ  "), vec!["ㄇ", "ㄕ"]);
    }

    #[test]
    fn phonetic_with_spaces_keeps_compounds() {
        assert_eq!(tokenize_phonetic("ㄅㄧ  ㄊ ㄡˊ"), vec!["ㄅㄧ", "ㄊ", "ㄡˊ"]);
        assert_eq!(tokenize_phonetic("a\tbc\n d"), vec!["a", "bc", "d"]);
    }

    #[test]
    fn phonetic_every_character_of_unspaced_input() {
        for s in ["x", "ㄑㄜ", "abcˇ˙", "發大財"] {
            let expected: Vec<String> = s.chars().map(String::from).collect();
            assert_eq!(tokenize_phonetic(s), expected, "input {s:?}");
        }
    }

    #[test]
    fn phonetic_empty_input() {
        assert!(tokenize_phonetic("").is_empty());
        assert!(tokenize_phonetic(" \t\n ").is_empty());
    }

    #[test]
    fn answer_mixed_scripts() {
        assert_eq!(
            tokenize_answer("Pin k oi 發大財"),
            vec!["Pin", "k", "oi", "發", "大", "財"]
        );
    }

    #[test]
    fn answer_ideographs_are_single_units() {
        assert_eq!(tokenize_answer("紅包"), vec!["紅", "包"]);
    }

    #[test]
    fn answer_run_inside_word_is_flushed_around_ideographs() {
        assert_eq!(tokenize_answer("ab發cd"), vec!["ab", "發", "cd"]);
        assert_eq!(tokenize_answer("OK啦!"), vec!["OK", "啦", "!"]);
    }

    #[test]
    fn answer_latin_word_is_atomic() {
        assert_eq!(tokenize_answer("don't-stop"), vec!["don't-stop"]);
    }

    #[test]
    fn answer_empty_input() {
        assert!(tokenize_answer("   ").is_empty());
    }

    #[test]
    fn ideograph_range_bounds() {
        assert!(is_ideograph('\u{4E00}'));
        assert!(is_ideograph('\u{9FFF}'));
        assert!(!is_ideograph('\u{3105}')); // ㄅ
        assert!(!is_ideograph('a'));
    }
}
