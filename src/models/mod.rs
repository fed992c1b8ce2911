pub mod game;
pub mod odds;
pub mod snapshot;

pub use game::{clock_to_seconds, format_clock, Game, Side, TeamLine, TeamScore};
pub use odds::{BookLine, GameOdds, Moneyline, MoneylineRecord, OddsRow, OddsTable, ParseMoneylineError};
pub use snapshot::{DashboardSnapshot, GameCard, TeamCard};
