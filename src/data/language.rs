//! Language codes carried by the comment CSVs.

use serde::{Deserialize, Serialize};

use crate::data::sentences::SentenceRules;

/// Two-letter language code attached to every comment row.
///
/// Unknown codes fall back to `En` so a bad row never aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    It,
    Fr,
    Es,
    Tr,
    Ru,
    Pt,
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "it" => Language::It,
            "fr" => Language::Fr,
            "es" => Language::Es,
            "tr" => Language::Tr,
            "ru" => Language::Ru,
            "pt" => Language::Pt,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::Tr => "tr",
            Language::Ru => "ru",
            Language::Pt => "pt",
        }
    }

    /// Sentence-splitting rules per language.
    ///
    /// Russian and Portuguese map onto the English rules; there was never a
    /// dedicated rule set for them and the English one splits both fine.
    pub fn sentence_rules(&self) -> SentenceRules {
        match self {
            Language::It => SentenceRules::Italian,
            Language::Fr => SentenceRules::French,
            Language::Es => SentenceRules::Spanish,
            Language::Tr => SentenceRules::Turkish,
            Language::En | Language::Ru | Language::Pt => SentenceRules::English,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}
