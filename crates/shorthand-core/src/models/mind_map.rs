use serde::Serialize;

use super::WordGroupDocument;

/// Background used for every mind-map cell until per-word colors are published.
pub const DEFAULT_CELL_COLOR: &str = "F8F8F8";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMapWord {
    pub english: String,
    pub chinese: String,
    pub background_color: String,
}

/// Grid of all words in a group, titled with the group description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MindMap {
    pub title: String,
    pub words: Vec<MindMapWord>,
}

impl WordGroupDocument {
    pub fn mind_map(&self) -> MindMap {
        MindMap {
            title: self.metadata.description.clone(),
            words: self
                .all_words
                .iter()
                .map(|w| MindMapWord {
                    english: w.english.clone(),
                    chinese: w.chinese.clone(),
                    background_color: DEFAULT_CELL_COLOR.to_string(),
                })
                .collect(),
        }
    }
}
