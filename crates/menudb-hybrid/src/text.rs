//! Lexical stage over product titles.

use menudb_core::pipeline::{Stage, TextSearchStage};

pub const TITLE_PATH: &str = "title";
pub const SCORE_META: &str = "searchScore";

pub fn lexical_stage(index: &str, title: &str) -> Stage {
    Stage::Search(TextSearchStage {
        index: index.to_string(),
        path: TITLE_PATH.to_string(),
        query: title.to_string(),
    })
}
