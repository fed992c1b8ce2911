pub mod board;
pub mod team_resolver;

pub use board::BoardBuilder;
pub use team_resolver::{OddsMatch, TeamResolver};
