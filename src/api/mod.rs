pub mod combined;
pub mod espn;
pub mod http;
pub mod nba_scoreboard;
pub mod sbr;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Game, GameOdds};

pub use combined::CombinedOddsSource;
pub use espn::EspnOddsClient;
pub use nba_scoreboard::LiveScoreClient;
pub use sbr::SbrOddsClient;

/// Number from a JSON value that may be sent as a number or a string
pub(crate) fn json_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Source of today's live games
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn fetch_games(&self) -> Result<Vec<Game>>;
}

/// Source of today's moneylines, grouped per game
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Short name used in logs and error notes
    fn name(&self) -> &str;

    async fn fetch_odds(&self) -> Result<Vec<GameOdds>>;
}
