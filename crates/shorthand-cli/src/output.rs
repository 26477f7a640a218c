//! Plain-text rendering of command views.

use std::fmt::Write;

use shorthand_core::utils::truncate_string;

use crate::commands::{
    BoardView, ConfigView, FailedView, GroupList, GroupSummary, MindMapView, StatusView, WordView,
};
use shorthand_core::models::WordCard;

/// Column width for group ids in tables
const GROUP_COL: usize = 12;
/// Column width for load states in tables
const STATE_COL: usize = 16;
/// Longest message shown inline in the browse table
const MESSAGE_MAX: usize = 60;
/// Mind-map cells per row
const MIND_MAP_COLUMNS: usize = 3;
/// Width of one mind-map cell
const CELL_WIDTH: usize = 18;

/// Offline advisories go to stderr so piped stdout stays clean.
pub fn advisory(message: &str) {
    eprintln!("{}", message);
}

pub fn render_group_list(list: &GroupList) -> String {
    let mut out = String::new();
    if list.groups.is_empty() {
        out.push_str("No groups available\n");
        return out;
    }
    let _ = writeln!(out, "{} group(s) via {}", list.groups.len(), list.strategy);
    for row in &list.groups {
        match &row.cached_age {
            Some(age) => {
                let _ = writeln!(out, "  {:<width$} cached {}", row.group, age, width = GROUP_COL);
            }
            None => {
                let _ = writeln!(out, "  {}", row.group);
            }
        }
    }
    out
}

pub fn render_failed(view: &FailedView) -> String {
    format!("{}\n", view.message)
}

fn render_card(out: &mut String, card: &WordCard) {
    let _ = writeln!(out, "{}  {}  {}", card.main_word, card.phonetic, card.translation);
    if !card.related_words.is_empty() {
        let _ = writeln!(out, "  see also: {}", card.related_words.join(", "));
    }
    for phrase in &card.phrases {
        let _ = writeln!(out, "  - {}  {}", phrase.english, phrase.chinese);
    }
    for example in &card.examples {
        let _ = writeln!(out, "  > {}", example.english);
        let _ = writeln!(out, "    {}", example.chinese);
    }
}

pub fn render_group_summary(summary: &GroupSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] {} words",
        summary.group, summary.state, summary.word_count
    );
    let _ = writeln!(out, "{}", summary.description);
    let _ = writeln!(
        out,
        "Core word: {} ({})",
        summary.core_word, summary.core_word_chinese
    );
    let _ = writeln!(out, "Home: {}", summary.home_page_words.join(" | "));
    let _ = writeln!(out, "Mind map image: {}", summary.image_url);
    for card in &summary.cards {
        out.push('\n');
        render_card(&mut out, card);
    }
    out
}

pub fn render_word(view: &WordView) -> String {
    let mut out = String::new();
    render_card(&mut out, &view.card);
    out
}

/// One fixed-width mind-map cell holding at most `max_chars` characters.
fn cell(text: &str, max_chars: usize) -> String {
    format!(
        "{:<width$}",
        truncate_string(text, max_chars),
        width = CELL_WIDTH
    )
}

pub fn render_mind_map(view: &MindMapView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.mind_map.title, view.group);

    for row in view.mind_map.words.chunks(MIND_MAP_COLUMNS) {
        let english: String = row
            .iter()
            .map(|w| cell(&w.english, CELL_WIDTH - 1))
            .collect();
        let chinese: String = row
            .iter()
            .map(|w| cell(&w.chinese, CELL_WIDTH / 2))
            .collect();
        let _ = writeln!(out, "{}", english.trim_end());
        let _ = writeln!(out, "{}", chinese.trim_end());
    }
    out
}

pub fn render_board(view: &BoardView) -> String {
    let mut out = String::new();
    if view.total_groups == 0 {
        out.push_str("No groups available\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Showing {} of {} group(s) via {}",
        view.displayed,
        view.total_groups,
        view.strategy.as_deref().unwrap_or("none")
    );
    for row in &view.rows {
        let detail = match (&row.core_word, &row.message) {
            (Some(core), Some(message)) => format!(
                "{} ({} words)  {}",
                core,
                row.word_count,
                truncate_string(message, MESSAGE_MAX)
            ),
            (Some(core), None) => format!("{} ({} words)", core, row.word_count),
            (None, Some(message)) => truncate_string(message, MESSAGE_MAX),
            (None, None) => String::new(),
        };
        let _ = writeln!(
            out,
            "  {:<gw$} {:<sw$} {}",
            row.group,
            row.state,
            detail,
            gw = GROUP_COL,
            sw = STATE_COL
        );
    }
    if view.has_more {
        out.push_str("More groups available, rerun with --pages to load more\n");
    }
    if let Some(summary) = &view.error_summary {
        let _ = writeln!(out, "\n{}", summary);
    }
    out
}

pub fn render_status(view: &StatusView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Bucket: {} ({})",
        view.base_url,
        if view.reachable { "reachable" } else { "unreachable" }
    );
    let _ = writeln!(out, "Cache:  {}", view.cache_dir);
    if view.cached.is_empty() {
        out.push_str("No cached groups\n");
    }
    for row in &view.cached {
        let _ = writeln!(
            out,
            "  {:<width$} {}",
            row.group,
            row.cached_age.as_deref().unwrap_or("unknown age"),
            width = GROUP_COL
        );
    }
    out
}

pub fn render_config(view: &ConfigView) -> String {
    let mut out = String::new();
    let unknown = "unavailable";
    let _ = writeln!(out, "config file:     {}", view.config_path.as_deref().unwrap_or(unknown));
    let _ = writeln!(out, "base url:        {}", view.base_url);
    let _ = writeln!(out, "cache dir:       {}", view.cache_dir.as_deref().unwrap_or(unknown));
    let _ = writeln!(out, "log dir:         {}", view.log_dir.as_deref().unwrap_or(unknown));
    let _ = writeln!(out, "request timeout: {}s", view.request_timeout_secs);
    let _ = writeln!(out, "page size:       {}", view.page_size);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{BoardRow, GroupRow};
    use shorthand_core::models::{MindMap, MindMapWord};
    use shorthand_core::GroupId;

    #[test]
    fn test_group_list_marks_cached_groups() {
        let list = GroupList {
            strategy: "manifest".to_string(),
            groups: vec![
                GroupRow {
                    group: GroupId::from("out_001"),
                    cached_age: Some("5m ago".to_string()),
                },
                GroupRow {
                    group: GroupId::from("out_002"),
                    cached_age: None,
                },
            ],
        };
        let text = render_group_list(&list);
        assert!(text.starts_with("2 group(s) via manifest\n"));
        assert!(text.contains("out_001      cached 5m ago"));
        assert!(text.contains("  out_002\n"));
    }

    #[test]
    fn test_board_lists_failures_after_rows() {
        let view = BoardView {
            strategy: Some("probing".to_string()),
            total_groups: 2,
            displayed: 2,
            has_more: false,
            rows: vec![
                BoardRow {
                    group: GroupId::from("out_001"),
                    state: "online".to_string(),
                    word_count: 12,
                    core_word: Some("out".to_string()),
                    message: None,
                },
                BoardRow {
                    group: GroupId::from("out_002"),
                    state: "failed".to_string(),
                    word_count: 0,
                    core_word: None,
                    message: Some("Could not load out_002".to_string()),
                },
            ],
            error_summary: Some("some groups failed to load:\nCould not load out_002".to_string()),
        };
        let text = render_board(&view);
        assert!(text.contains("out (12 words)"));
        assert!(text.ends_with("some groups failed to load:\nCould not load out_002\n"));
        assert!(!text.contains("More groups available"));
    }

    #[test]
    fn test_mind_map_rows() {
        let word = |english: &str| MindMapWord {
            english: english.to_string(),
            chinese: "字".to_string(),
            background_color: "F8F8F8".to_string(),
        };
        let view = MindMapView {
            group: GroupId::from("out_001"),
            mind_map: MindMap {
                title: "Words built around out".to_string(),
                words: vec![word("out"), word("outside"), word("about"), word("sprout")],
            },
        };
        let text = render_mind_map(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Words built around out (out_001)");
        // Two grid rows, each an english line and a chinese line
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("out"));
        assert_eq!(lines[3], "sprout");
    }
}
