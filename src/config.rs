use std::env;
use std::path::PathBuf;

use crate::engine::{DEFAULT_PLAYER_A_NAME, DEFAULT_PLAYER_B_NAME, MatchOverPolicy};
use crate::persist;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub data_dir: Option<PathBuf>,
    pub player_a_name: String,
    pub player_b_name: String,
    pub match_over: MatchOverPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            player_a_name: DEFAULT_PLAYER_A_NAME.to_string(),
            player_b_name: DEFAULT_PLAYER_B_NAME.to_string(),
            match_over: MatchOverPolicy::default(),
        }
    }
}

impl SessionConfig {
    /// Reads `SCORE_*` variables; unset or blank values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: persist::default_data_dir(),
            player_a_name: non_blank_env("SCORE_PLAYER_A").unwrap_or(defaults.player_a_name),
            player_b_name: non_blank_env("SCORE_PLAYER_B").unwrap_or(defaults.player_b_name),
            match_over: non_blank_env("SCORE_MATCH_OVER")
                .and_then(|raw| parse_match_over(&raw))
                .unwrap_or(defaults.match_over),
        }
    }
}

pub fn parse_match_over(raw: &str) -> Option<MatchOverPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "restart" | "reset" => Some(MatchOverPolicy::RestartImmediately),
        "hold" => Some(MatchOverPolicy::HoldUntilNextMatch),
        _ => None,
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
