use chrono::{DateTime, Utc};

use super::{OddsMatch, TeamResolver};
use crate::models::{BookLine, DashboardSnapshot, Game, GameCard, GameOdds, TeamCard};
use crate::pricing::OddsTableBuilder;

/// Joins scoreboard games with odds into a dashboard snapshot
pub struct BoardBuilder<'a> {
    resolver: &'a TeamResolver,
    table_sportsbooks: &'a [String],
    card_sportsbook: &'a str,
}

impl<'a> BoardBuilder<'a> {
    pub fn new(
        resolver: &'a TeamResolver,
        table_sportsbooks: &'a [String],
        card_sportsbook: &'a str,
    ) -> Self {
        Self {
            resolver,
            table_sportsbooks,
            card_sportsbook,
        }
    }

    /// Every game gets a card, with or without odds
    pub fn build(
        &self,
        games: &[Game],
        odds: &[GameOdds],
        fetched_at: DateTime<Utc>,
        errors: Vec<String>,
    ) -> DashboardSnapshot {
        let cards = games
            .iter()
            .map(|game| self.card(game, self.resolver.match_odds_to_game(game, odds)))
            .collect();

        let odds_table = OddsTableBuilder::new(self.resolver, self.table_sportsbooks).build(odds);

        DashboardSnapshot {
            cards,
            odds_table,
            fetched_at,
            errors,
        }
    }

    fn card(&self, game: &Game, matched: Option<OddsMatch<'_>>) -> GameCard {
        let [home_line, away_line] = game.team_lines();
        let picked = matched.and_then(|m| self.pick_line(&m));

        let (sportsbook, line) = match picked {
            Some((book, line)) => (Some(book), line),
            None => (None, BookLine::default()),
        };

        GameCard {
            home: TeamCard {
                full_name: game.home.full_name(),
                tricode: home_line.tricode,
                side: home_line.side,
                score: game.home.score,
                points_differential: home_line.points_differential,
                moneyline: line.home,
                sportsbook: line.home.and(sportsbook.clone()),
            },
            away: TeamCard {
                full_name: game.away.full_name(),
                tricode: away_line.tricode,
                side: away_line.side,
                score: game.away.score,
                points_differential: away_line.points_differential,
                moneyline: line.away,
                sportsbook: line.away.and(sportsbook),
            },
            status: game.status.clone(),
            seconds_remaining: home_line.seconds_remaining,
            total: line.total,
        }
    }

    /// Preferred card book first, then table order; first book with a moneyline wins
    fn pick_line(&self, matched: &OddsMatch<'_>) -> Option<(String, BookLine)> {
        std::iter::once(self.card_sportsbook)
            .chain(self.table_sportsbooks.iter().map(String::as_str))
            .filter_map(|book| matched.line(book).map(|line| (book.to_string(), line)))
            .find(|(_, line)| line.home.is_some() || line.away.is_some())
    }
}
