use serde::Serialize;

use super::{Example, Phrase, WordEntry, WordGroupDocument};
use crate::utils::eq_ignore_case;

/// Number of sibling home-page words shown alongside a card.
const RELATED_WORD_COUNT: usize = 2;

/// A word as rendered on a card or detail screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCard {
    pub main_word: String,
    pub translation: String,
    pub phonetic: String,
    pub related_words: Vec<String>,
    pub phrases: Vec<Phrase>,
    pub examples: Vec<Example>,
}

impl WordGroupDocument {
    /// Cards for every resolvable home-page word, in home-page order.
    pub fn cards(&self) -> Vec<WordCard> {
        self.home_page_entries()
            .into_iter()
            .map(|entry| self.card_for_entry(entry))
            .collect()
    }

    /// Card for any word in the group (case-insensitive).
    pub fn card(&self, english: &str) -> Option<WordCard> {
        self.entry(english).map(|entry| self.card_for_entry(entry))
    }

    fn card_for_entry(&self, entry: &WordEntry) -> WordCard {
        let related_words = self
            .home_page_words
            .iter()
            .filter(|w| !eq_ignore_case(w.as_str(), &entry.english))
            .take(RELATED_WORD_COUNT)
            .cloned()
            .collect();

        WordCard {
            main_word: entry.english.clone(),
            translation: entry.chinese.clone(),
            phonetic: entry.phonetic.clone(),
            related_words,
            phrases: entry.phrases.clone(),
            examples: entry.examples.clone(),
        }
    }
}
