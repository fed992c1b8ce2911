use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// American-format moneyline (payout relative to a 100-unit stake)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Moneyline(pub i32);

/// Error returned when a moneyline string is not a signed integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid moneyline: {input:?}")]
pub struct ParseMoneylineError {
    pub input: String,
}

impl Moneyline {
    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_underdog(self) -> bool {
        self.0 > 0
    }

    /// Read a moneyline from a loosely typed JSON value.
    ///
    /// Providers send either numbers (`-150`) or strings (`"+130"`, `"EVEN"`).
    /// Anything that is not an integer is treated as no line.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .and_then(|v| i32::try_from(v).ok())
                .map(Moneyline),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for Moneyline {
    type Err = ParseMoneylineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

        digits.parse::<i32>().map(Moneyline).map_err(|_| ParseMoneylineError {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for Moneyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Lines a single sportsbook offers for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookLine {
    /// Home team moneyline
    pub home: Option<Moneyline>,

    /// Away team moneyline
    pub away: Option<Moneyline>,

    /// Over/under points total
    pub total: Option<f64>,
}

impl BookLine {
    /// Same line with the home and away sides exchanged
    pub fn reversed(&self) -> Self {
        Self {
            home: self.away,
            away: self.home,
            total: self.total,
        }
    }
}

/// Odds for one game across every sportsbook a provider returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOdds {
    pub home_team: String,
    pub away_team: String,

    /// sportsbook name -> lines
    pub books: BTreeMap<String, BookLine>,
}

impl GameOdds {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            books: BTreeMap::new(),
        }
    }

    /// Flatten into one record per team per sportsbook
    pub fn moneyline_records(&self) -> Vec<MoneylineRecord> {
        let mut records = Vec::with_capacity(self.books.len() * 2);

        for (sportsbook, line) in &self.books {
            records.push(MoneylineRecord {
                team: self.home_team.clone(),
                sportsbook: sportsbook.clone(),
                moneyline: line.home,
            });
            records.push(MoneylineRecord {
                team: self.away_team.clone(),
                sportsbook: sportsbook.clone(),
                moneyline: line.away,
            });
        }

        records
    }
}

/// One team's moneyline at one sportsbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneylineRecord {
    pub team: String,
    pub sportsbook: String,
    pub moneyline: Option<Moneyline>,
}

/// One table row: a team and its moneyline per sportsbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsRow {
    pub team: String,
    pub lines: BTreeMap<String, Option<Moneyline>>,
}

impl OddsRow {
    /// Moneyline at a sportsbook, `None` when the book offers no line
    pub fn line(&self, sportsbook: &str) -> Option<Moneyline> {
        self.lines.get(sportsbook).copied().flatten()
    }
}

/// Teams x sportsbooks table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsTable {
    pub sportsbooks: Vec<String>,
    pub rows: Vec<OddsRow>,
}

impl OddsTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, team: &str) -> Option<&OddsRow> {
        self.rows.iter().find(|r| r.team == team)
    }
}
