//! Language-aware sentence splitting.
//!
//! Rule-based: a sentence ends at `.`, `!`, `?` or `…` (plus any trailing
//! closing quotes/brackets) when followed by whitespace, unless the token in
//! front of the period is a known abbreviation or a single-letter initial.

/// Per-language abbreviation rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceRules {
    English,
    Italian,
    French,
    Spanish,
    Turkish,
}

impl SentenceRules {
    fn abbreviations(&self) -> &'static [&'static str] {
        match self {
            SentenceRules::English => &[
                "mr", "mrs", "ms", "dr", "prof", "st", "vs", "etc", "jr", "sr", "inc", "approx",
                "dept", "est", "fig", "no",
            ],
            SentenceRules::Italian => &[
                "sig", "dott", "prof", "ing", "avv", "ecc", "pag", "art",
            ],
            SentenceRules::French => &[
                "m", "mme", "mlle", "dr", "etc", "av", "bd", "ex",
            ],
            SentenceRules::Spanish => &[
                "sr", "sra", "srta", "dr", "dra", "etc", "ud", "uds", "av", "gral",
            ],
            SentenceRules::Turkish => &[
                "dr", "prof", "av", "vb", "vs", "bkz", "yy",
            ],
        }
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '»' | '”' | '’')
}

/// Last whitespace-delimited token before byte position `end`, lowercased and
/// stripped of leading punctuation. Used for the abbreviation check.
fn token_before(text: &str, end: usize) -> String {
    text[..end]
        .split_whitespace()
        .next_back()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Split `text` into sentences under the given rule set.
///
/// Whitespace-only input yields no sentences. Text without any terminal
/// punctuation comes back as a single sentence.
pub fn split_sentences(text: &str, rules: SentenceRules) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }

        // Ellipsis written as dots, or abbreviation dot: inspect context.
        if c == '.' {
            let before = token_before(text, pos);
            // Single-letter initial ("J. Smith") or known abbreviation.
            if before.chars().count() == 1 && before.chars().all(|b| b.is_alphabetic()) {
                continue;
            }
            if rules.abbreviations().contains(&before.as_str()) {
                continue;
            }
        }

        // Swallow repeated terminals ("!!", "?!") and closing punctuation.
        let mut end = pos + c.len_utf8();
        while let Some(&(next_pos, next_c)) = chars.peek() {
            if is_terminal(next_c) || is_closing(next_c) {
                end = next_pos + next_c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        // Boundary only when followed by whitespace (or end of text); this
        // keeps "3.5" and bare URLs in one piece.
        let followed_by_space = match chars.peek() {
            Some(&(_, next_c)) => next_c.is_whitespace(),
            None => true,
        };
        if !followed_by_space {
            continue;
        }

        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = end;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}
