use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::api::{espn, nba_scoreboard, sbr};

const DEFAULT_SPORTSBOOKS: &str = "fanduel,betmgm,caesars,draftkings,bet365";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the dashboard listens on
    pub bind_addr: SocketAddr,

    /// Interval in seconds between dashboard refreshes
    pub poll_interval: u64,

    /// HTTP request timeout in seconds
    pub request_timeout: u64,

    /// NBA live scoreboard JSON URL
    pub nba_scoreboard_url: String,

    /// ESPN scoreboard header URL
    pub espn_header_url: String,

    /// SportsbookReview base URL
    pub sbr_base_url: String,

    /// Sportsbooks shown as table columns, lowercase
    pub sportsbooks: Vec<String>,

    /// Sportsbook whose line is shown on the game cards
    pub card_sportsbook: String,

    /// "all" or a single sportsbook name
    pub odds_provider_mode: sbr::ProviderMode,

    /// Optional team aliases file
    pub team_aliases_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8501".to_string())
                .parse()
                .context("BIND_ADDR must be a socket address like 127.0.0.1:8501")?,

            poll_interval: env::var("POLL_INTERVAL")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("POLL_INTERVAL must be a valid number")?,

            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("REQUEST_TIMEOUT must be a valid number")?,

            nba_scoreboard_url: env::var("NBA_SCOREBOARD_URL")
                .unwrap_or_else(|_| nba_scoreboard::DEFAULT_SCOREBOARD_URL.to_string()),

            espn_header_url: env::var("ESPN_HEADER_URL")
                .unwrap_or_else(|_| espn::DEFAULT_HEADER_URL.to_string()),

            sbr_base_url: env::var("SBR_BASE_URL")
                .unwrap_or_else(|_| sbr::DEFAULT_BASE_URL.to_string()),

            sportsbooks: parse_list(
                &env::var("SPORTSBOOKS").unwrap_or_else(|_| DEFAULT_SPORTSBOOKS.to_string()),
            ),

            card_sportsbook: env::var("CARD_SPORTSBOOK")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| espn::ESPN_BOOK.to_string()),

            odds_provider_mode: sbr::ProviderMode::parse(
                &env::var("ODDS_PROVIDER_MODE").unwrap_or_else(|_| "all".to_string()),
            ),

            team_aliases_path: env::var("TEAM_ALIASES_PATH")
                .unwrap_or_else(|_| "data/team_aliases.json".to_string())
                .into(),
        })
    }

    /// Table columns; a single-book provider only ever fills one
    pub fn table_sportsbooks(&self) -> Vec<String> {
        match &self.odds_provider_mode {
            sbr::ProviderMode::AllBooks => self.sportsbooks.clone(),
            sbr::ProviderMode::SingleBook(book) => vec![book.clone()],
        }
    }
}

/// Split a comma separated list, dropping blanks and duplicates
fn parse_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in value.split(',').map(|s| s.trim().to_lowercase()) {
        if !item.is_empty() && !items.contains(&item) {
            items.push(item);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" FanDuel, betmgm,,fanduel ,Bet365"),
            vec!["fanduel", "betmgm", "bet365"]
        );
        assert!(parse_list("").is_empty());
    }
}
