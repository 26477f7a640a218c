//! Subcommand handlers.
//!
//! Every handler builds its view from `shorthand_core` and hands it to
//! `output` for rendering, so `--json` and text output share one data path.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use tracing::{debug, info};

use shorthand_core::models::{MindMap, WordCard};
use shorthand_core::{
    CacheManager, CloudClient, Config, GroupBoard, GroupDiscovery, GroupId, WordGroupDocument,
    WordGroupLoader, WordSource,
};

use crate::cli::{CacheCommand, Command, ConfigCommand};
use crate::output;

/// Number of word slots on a group's home screen
const HOME_PAGE_SLOTS: usize = 3;
/// Shown in a home screen slot with no word
const EMPTY_SLOT: &str = "-";

/// Shared state for one CLI invocation.
pub struct Context {
    config: Config,
    client: CloudClient,
    cache: Arc<CacheManager>,
    json: bool,
}

impl Context {
    pub fn new(config: Config, json: bool) -> Result<Self> {
        let client = CloudClient::with_timeout(config.base_url(), config.request_timeout())
            .context("Failed to build HTTP client")?;
        let cache = Arc::new(CacheManager::new(config.cache_dir()?));
        Ok(Self {
            config,
            client,
            cache,
            json,
        })
    }

    fn source(&self) -> Arc<dyn WordSource> {
        Arc::new(self.client.clone())
    }

    fn emit<T: Serialize>(&self, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", render(value));
        }
        Ok(())
    }
}

// ===== Views =====

#[derive(Debug, Serialize)]
pub struct GroupRow {
    pub group: GroupId,
    pub cached_age: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupList {
    pub strategy: String,
    pub groups: Vec<GroupRow>,
}

#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub group: GroupId,
    pub state: String,
    pub advisory: Option<String>,
    pub description: String,
    pub core_word: String,
    pub core_word_chinese: String,
    pub word_count: usize,
    pub image_url: String,
    pub home_page_words: Vec<String>,
    pub cards: Vec<WordCard>,
}

#[derive(Debug, Serialize)]
pub struct FailedView {
    pub group: GroupId,
    pub state: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WordView {
    pub group: GroupId,
    pub card: WordCard,
}

#[derive(Debug, Serialize)]
pub struct MindMapView {
    pub group: GroupId,
    pub mind_map: MindMap,
}

#[derive(Debug, Serialize)]
pub struct BoardRow {
    pub group: GroupId,
    pub state: String,
    pub word_count: usize,
    pub core_word: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub strategy: Option<String>,
    pub total_groups: usize,
    pub displayed: usize,
    pub has_more: bool,
    pub rows: Vec<BoardRow>,
    pub error_summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub base_url: String,
    pub reachable: bool,
    pub cache_dir: String,
    pub cached: Vec<GroupRow>,
}

#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub config_path: Option<String>,
    pub base_url: String,
    pub cache_dir: Option<String>,
    pub log_dir: Option<String>,
    pub request_timeout_secs: u64,
    pub page_size: usize,
}

// ===== Dispatch =====

pub async fn run(ctx: &Context, command: Command) -> Result<()> {
    debug!(command = ?command, "Dispatching command");
    match command {
        Command::Groups => groups(ctx).await,
        Command::Show { group } => show(ctx, GroupId::new(group)).await,
        Command::Word { group, english } => word(ctx, GroupId::new(group), &english).await,
        Command::MindMap { group } => mind_map(ctx, GroupId::new(group)).await,
        Command::ImageUrl { group } => image_url(ctx, GroupId::new(group)),
        Command::Browse { pages } => browse(ctx, pages).await,
        Command::Status => status(ctx).await,
        Command::Cache(CacheCommand::Clear) => cache_clear(ctx),
        Command::Config(ConfigCommand::Show) => config_show(ctx),
        Command::Config(ConfigCommand::SetBaseUrl { url }) => config_set_base_url(&url),
    }
}

/// Load one group and wait for its write-through.
///
/// A group that settles in `Failed` is reported here and yields `None`; that is
/// a displayable outcome, not a CLI error.
async fn load_group(ctx: &Context, group: GroupId) -> Result<Option<WordGroupLoader>> {
    let mut loader = WordGroupLoader::new(group, ctx.source(), Arc::clone(&ctx.cache));
    loader.load().await;
    loader.wait_for_cache_write().await;

    let state = loader.state();
    if let Some(message) = state.error_message() {
        let view = FailedView {
            group: loader.group().clone(),
            state: state.phase().to_string(),
            message: message.to_string(),
        };
        ctx.emit(&view, output::render_failed)?;
        return Ok(None);
    }
    if let Some(advisory) = state.advisory() {
        output::advisory(advisory);
    }
    Ok(Some(loader))
}

async fn groups(ctx: &Context) -> Result<()> {
    let discovery = GroupDiscovery::new(ctx.source())
        .discover_with_strategy()
        .await;
    info!(strategy = %discovery.strategy, count = discovery.groups.len(), "Groups discovered");

    let list = GroupList {
        strategy: discovery.strategy.to_string(),
        groups: discovery
            .groups
            .into_iter()
            .map(|group| GroupRow {
                cached_age: ctx.cache.age_display(&group),
                group,
            })
            .collect(),
    };
    ctx.emit(&list, output::render_group_list)
}

async fn show(ctx: &Context, group: GroupId) -> Result<()> {
    let Some(loader) = load_group(ctx, group).await? else {
        return Ok(());
    };
    let state = loader.state();
    let Some(document) = state.document() else {
        bail!("No document available for {}", loader.group());
    };

    let summary = GroupSummary {
        group: loader.group().clone(),
        state: state.phase().to_string(),
        advisory: state.advisory().map(str::to_string),
        description: document.metadata.description.clone(),
        core_word: document.core_word.english.clone(),
        core_word_chinese: document.core_word_chinese().to_string(),
        word_count: document.word_count(),
        image_url: loader.image_url(),
        home_page_words: home_page_slots(document),
        cards: document.cards(),
    };
    ctx.emit(&summary, output::render_group_summary)
}

/// Home screen slots; the first falls back to the core word, the rest to a dash.
fn home_page_slots(document: &WordGroupDocument) -> Vec<String> {
    (0..HOME_PAGE_SLOTS)
        .map(|slot| {
            let placeholder = if slot == 0 {
                document.core_word.english.as_str()
            } else {
                EMPTY_SLOT
            };
            document.home_page_word_or(slot, placeholder).to_string()
        })
        .collect()
}

async fn word(ctx: &Context, group: GroupId, english: &str) -> Result<()> {
    let Some(loader) = load_group(ctx, group).await? else {
        return Ok(());
    };
    let card = loader
        .document()
        .and_then(|d| d.card(english))
        .with_context(|| format!("No word {:?} in {}", english, loader.group()))?;

    let view = WordView {
        group: loader.group().clone(),
        card,
    };
    ctx.emit(&view, output::render_word)
}

async fn mind_map(ctx: &Context, group: GroupId) -> Result<()> {
    let Some(loader) = load_group(ctx, group).await? else {
        return Ok(());
    };
    let Some(mind_map) = loader.mind_map() else {
        bail!("No document available for {}", loader.group());
    };

    let view = MindMapView {
        group: loader.group().clone(),
        mind_map,
    };
    ctx.emit(&view, output::render_mind_map)
}

fn image_url(ctx: &Context, group: GroupId) -> Result<()> {
    if !group.is_path_safe() {
        bail!("Invalid group id {:?}", group.as_str());
    }
    let url = ctx.client.image_url(&group);
    ctx.emit(&url, |url| format!("{}\n", url))
}

async fn browse(ctx: &Context, pages: usize) -> Result<()> {
    let mut board = GroupBoard::new(ctx.source(), Arc::clone(&ctx.cache))
        .with_page_size(ctx.config.page_size());

    board.start().await;
    for _ in 1..pages {
        if !board.has_more() {
            break;
        }
        board.load_more().await;
    }
    board.wait_for_cache_writes().await;

    let status = board.status();
    let rows = board
        .loaders()
        .iter()
        .map(|loader| {
            let state = loader.state();
            BoardRow {
                group: loader.group().clone(),
                state: state.phase().to_string(),
                word_count: loader.word_count(),
                core_word: state.document().map(|d| d.core_word.english.clone()),
                message: state
                    .error_message()
                    .or_else(|| state.advisory())
                    .map(str::to_string),
            }
        })
        .collect();

    let view = BoardView {
        strategy: board.strategy().map(|s| s.to_string()),
        total_groups: status.total_groups,
        displayed: status.displayed,
        has_more: board.has_more(),
        rows,
        error_summary: status.error_summary(),
    };
    ctx.emit(&view, output::render_board)
}

async fn status(ctx: &Context) -> Result<()> {
    let reachable = ctx.client.check_connection().await;
    let cached = ctx
        .cache
        .cached_groups()
        .into_iter()
        .map(|group| GroupRow {
            cached_age: ctx.cache.age_display(&group),
            group,
        })
        .collect();

    let view = StatusView {
        base_url: ctx.client.base_url().to_string(),
        reachable,
        cache_dir: ctx.cache.cache_dir().display().to_string(),
        cached,
    };
    ctx.emit(&view, output::render_status)
}

fn cache_clear(ctx: &Context) -> Result<()> {
    let count = ctx.cache.cached_groups().len();
    ctx.cache.clear_all();
    info!(count = count, "Cache cleared");
    ctx.emit(&count, |count| format!("Removed {} cached group(s)\n", count))
}

fn config_show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    let view = ConfigView {
        config_path: Config::config_path().ok().map(|p| p.display().to_string()),
        base_url: config.base_url().to_string(),
        cache_dir: config.cache_dir().ok().map(|p| p.display().to_string()),
        log_dir: config.log_dir().ok().map(|p| p.display().to_string()),
        request_timeout_secs: config.request_timeout().as_secs(),
        page_size: config.page_size(),
    };
    ctx.emit(&view, output::render_config)
}

/// Persist a new base URL. Works on the file contents, not on CLI overrides.
fn config_set_base_url(url: &str) -> Result<()> {
    let url = url.trim().trim_end_matches('/');
    validate_base_url(url)?;

    let mut config = Config::load()?;
    config.base_url = Some(url.to_string());
    config.save()?;
    println!("Base URL set to {}", url);
    Ok(())
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        bail!("Base URL must start with http:// or https://: {}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_check() {
        assert!(validate_base_url("https://bucket.example.com").is_ok());
        assert!(validate_base_url("http://127.0.0.1:9000").is_ok());
        assert!(validate_base_url("ftp://bucket").is_err());
        assert!(validate_base_url("bucket.example.com").is_err());
    }

    #[test]
    fn test_home_page_slots_fill_placeholders() {
        let document: WordGroupDocument = serde_json::from_value(serde_json::json!({
            "metadata": {
                "version": "1.0",
                "total_words": 1,
                "core_word_position": 0,
                "created_date": "2025-06-25",
                "description": "out"
            },
            "core_word": {"english": "out", "phonetic": "/aʊt/", "chinese": "出"},
            "home_page_words": ["outside"],
            "all_words": []
        }))
        .expect("document");
        assert_eq!(home_page_slots(&document), vec!["outside", "-", "-"]);

        let empty = WordGroupDocument {
            home_page_words: Vec::new(),
            ..document
        };
        assert_eq!(home_page_slots(&empty), vec!["out", "-", "-"]);
    }

    #[test]
    fn test_image_url_rejects_unsafe_group() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            base_url: Some("http://127.0.0.1:9".to_string()),
            cache_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let ctx = Context::new(config, true).expect("context");
        assert!(image_url(&ctx, GroupId::from("../secret")).is_err());
        assert!(image_url(&ctx, GroupId::from("out_001")).is_ok());
    }
}
