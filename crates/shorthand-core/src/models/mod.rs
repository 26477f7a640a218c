//! Data models for vocabulary groups.
//!
//! - `WordGroupDocument`: one group's words as published remotely and cached locally
//! - `GroupId`, `GroupIndex`: group identifiers and the remote manifest
//! - `WordCard`, `MindMap`: views derived from a document for display

pub mod card;
pub mod group;
pub mod mind_map;
pub mod word;

pub use card::WordCard;
pub use group::{GroupId, GroupIndex};
pub use mind_map::{MindMap, MindMapWord, DEFAULT_CELL_COLOR};
pub use word::{
    CoreWord, Example, Highlight, HighlightRange, Metadata, Phrase, WordEntry, WordGroupDocument,
};
