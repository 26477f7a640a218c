use serde::{Deserialize, Serialize};

use crate::utils::eq_ignore_case;

/// One vocabulary group as published under `words/<group>.json`.
///
/// Every field except `WordEntry::highlight` is required on the wire; a payload
/// missing any of them is rejected at decode time instead of being defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordGroupDocument {
    pub metadata: Metadata,
    pub core_word: CoreWord,
    pub home_page_words: Vec<String>,
    pub all_words: Vec<WordEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    #[serde(rename = "total_words")]
    pub total_word_count: i64,
    pub core_word_position: i64,
    pub created_date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreWord {
    pub english: String,
    pub phonetic: String,
    pub chinese: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: i64,
    pub english: String,
    pub phonetic: String,
    pub chinese: String,
    pub phrases: Vec<Phrase>,
    pub examples: Vec<Example>,
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub english: String,
    pub chinese: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub english: String,
    pub chinese: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub english: Option<Vec<HighlightRange>>,
}

/// Half-open `[start, end)` character range over `WordEntry::english`.
///
/// Ranges are not checked against the word length; consumers guard indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: i64,
    pub end: i64,
    pub color: String,
}

impl WordEntry {
    /// Entries with an empty `english` are grid placeholders, not real words.
    pub fn is_placeholder(&self) -> bool {
        self.english.is_empty()
    }

    pub fn highlight_ranges(&self) -> &[HighlightRange] {
        self.highlight
            .as_ref()
            .and_then(|h| h.english.as_deref())
            .unwrap_or(&[])
    }
}

impl WordGroupDocument {
    /// Number of real (non-placeholder) words in the group.
    pub fn word_count(&self) -> usize {
        self.all_words.iter().filter(|w| !w.is_placeholder()).count()
    }

    /// Case-insensitive exact lookup by English spelling.
    pub fn entry(&self, english: &str) -> Option<&WordEntry> {
        self.all_words
            .iter()
            .find(|w| eq_ignore_case(&w.english, english))
    }

    /// The entry for the core word, falling back to the first entry.
    pub fn core_entry(&self) -> Option<&WordEntry> {
        self.entry(&self.core_word.english)
            .or_else(|| self.all_words.first())
    }

    pub fn core_word_chinese(&self) -> &str {
        &self.core_word.chinese
    }

    /// Home-page words resolved to entries, in home-page order.
    ///
    /// Words without a matching entry are dropped, as are matches that are placeholders.
    pub fn home_page_entries(&self) -> Vec<&WordEntry> {
        self.home_page_words
            .iter()
            .filter_map(|word| self.entry(word))
            .filter(|entry| !entry.is_placeholder())
            .collect()
    }

    /// Home-page word at `index`, or `placeholder` when the list is shorter.
    pub fn home_page_word_or<'a>(&'a self, index: usize, placeholder: &'a str) -> &'a str {
        self.home_page_words
            .get(index)
            .map(String::as_str)
            .unwrap_or(placeholder)
    }
}
