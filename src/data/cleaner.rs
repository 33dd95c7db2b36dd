use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::language::Language;
use crate::data::sentences::split_sentences;

/// Regex patterns compiled once.
pub(crate) static PATTERNS: Lazy<CleanerPatterns> = Lazy::new(CleanerPatterns::new);

pub(crate) struct CleanerPatterns {
    // Noise tokens
    pub digits_and_quotes: Regex,
    pub digits: Regex,
    pub hashtag: Regex,
    pub mention: Regex,
    pub url: Regex,

    // Cleanup
    pub multi_space: Regex,
}

impl CleanerPatterns {
    fn new() -> Self {
        Self {
            digits_and_quotes: Regex::new(r#"[0-9"]"#).unwrap(),
            digits: Regex::new(r"[0-9]").unwrap(),
            hashtag: Regex::new(r"#\S+\b").unwrap(),
            mention: Regex::new(r"@\S+\b").unwrap(),
            url: Regex::new(r"https?\S+").unwrap(),
            multi_space: Regex::new(r"\s+").unwrap(),
        }
    }
}

/// Cleaner for raw comment text.
///
/// Strips digit/quote characters, hashtags, @-mentions and URLs, collapses
/// whitespace and drops repeated sentences. Pure: same input, same output.
pub struct TextCleaner;

impl TextCleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, text: &str, lang: Language) -> String {
        let mut result = PATTERNS.digits_and_quotes.replace_all(text, "").to_string();
        result = PATTERNS.hashtag.replace_all(&result, "").to_string();
        result = PATTERNS.mention.replace_all(&result, "").to_string();
        result = PATTERNS.url.replace_all(&result, "").to_string();
        result = PATTERNS.multi_space.replace_all(&result, " ").to_string();
        result = exclude_duplicate_sentences(&result, lang);
        result.trim().to_string()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the first occurrence of each sentence, in order. Comparison is
/// case-sensitive on the trimmed sentence.
pub fn exclude_duplicate_sentences(text: &str, lang: Language) -> String {
    let mut sentences: Vec<String> = Vec::new();
    for sentence in split_sentences(text, lang.sentence_rules()) {
        let sentence = sentence.trim().to_string();
        if !sentences.contains(&sentence) {
            sentences.push(sentence);
        }
    }
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_all_noise_tokens() {
        let cleaner = TextCleaner::new();
        let output = cleaner.clean("Check this out http://x.co #great @bob 123", Language::En);
        assert_eq!(output, "Check this out");
    }

    #[test]
    fn test_clean_removes_digits_and_quotes() {
        let cleaner = TextCleaner::new();
        let output = cleaner.clean(r#"he said "hello" in 1999"#, Language::En);
        assert!(!output.contains('"'));
        assert!(!output.chars().any(|c| c.is_ascii_digit()));
        assert!(output.contains("he said hello in"));
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        let cleaner = TextCleaner::new();
        let output = cleaner.clean("too   many\t\tspaces\nhere", Language::En);
        assert_eq!(output, "too many spaces here");
    }

    #[test]
    fn test_clean_drops_duplicate_sentences() {
        let cleaner = TextCleaner::new();
        let output = cleaner.clean("Go away. You are bad. Go away.", Language::En);
        assert_eq!(output, "Go away. You are bad.");
    }

    #[test]
    fn test_duplicates_keep_first_occurrence_order() {
        let input = "B comes first. A comes second. B comes first. A comes second.";
        let output = exclude_duplicate_sentences(input, Language::En);
        assert_eq!(output, "B comes first. A comes second.");
    }

    #[test]
    fn test_clean_can_produce_empty_output() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("12345 #tag @user", Language::En), "");
    }

    #[test]
    fn test_no_noise_patterns_survive() {
        let cleaner = TextCleaner::new();
        let inputs = [
            "mixed @user text #hashtag with http://url.com and 42 numbers",
            "@a @b @c ###x 999 https://y.z/path?q=1",
        ];
        for input in inputs {
            let output = cleaner.clean(input, Language::En);
            assert!(!PATTERNS.digits.is_match(&output), "digits left in: {output}");
            assert!(!PATTERNS.hashtag.is_match(&output), "hashtag left in: {output}");
            assert!(!PATTERNS.mention.is_match(&output), "mention left in: {output}");
            assert!(!PATTERNS.url.is_match(&output), "url left in: {output}");
        }
    }
}
