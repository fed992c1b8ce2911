use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Moneyline, OddsTable, Side};
use crate::pricing;

/// Everything one poll cycle produced. Built once, rendered, then dropped.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub cards: Vec<GameCard>,
    pub odds_table: OddsTable,
    pub fetched_at: DateTime<Utc>,

    /// Sources that failed this cycle, shown as a footnote
    pub errors: Vec<String>,
}

impl DashboardSnapshot {
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            cards: Vec::new(),
            odds_table: OddsTable::default(),
            fetched_at,
            errors: Vec::new(),
        }
    }

    pub fn has_games(&self) -> bool {
        !self.cards.is_empty()
    }
}

/// One game: home card on the left, away card on the right
#[derive(Debug, Clone, Serialize)]
pub struct GameCard {
    pub home: TeamCard,
    pub away: TeamCard,
    pub status: String,

    /// Seconds left on the clock, zero before tip-off and after the final
    pub seconds_remaining: u32,

    /// Over/under from the card sportsbook
    pub total: Option<f64>,
}

/// Team half of a game card
#[derive(Debug, Clone, Serialize)]
pub struct TeamCard {
    pub full_name: String,
    pub tricode: String,
    pub side: Side,
    pub score: i32,
    pub points_differential: i32,
    pub moneyline: Option<Moneyline>,

    /// Sportsbook the moneyline came from
    pub sportsbook: Option<String>,
}

impl TeamCard {
    pub fn implied_probability(&self) -> Option<f64> {
        pricing::moneyline_to_probability(self.moneyline)
    }

    pub fn price(&self) -> Option<f64> {
        pricing::probability_to_price(self.implied_probability())
    }
}
