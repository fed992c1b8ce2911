use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::matching::TeamResolver;
use crate::models::{GameOdds, Moneyline, OddsRow, OddsTable};

/// Builds the teams x sportsbooks table from per-game odds
pub struct OddsTableBuilder<'a> {
    resolver: &'a TeamResolver,
    sportsbooks: Vec<String>,
}

impl<'a> OddsTableBuilder<'a> {
    pub fn new(resolver: &'a TeamResolver, sportsbooks: &[String]) -> Self {
        Self {
            resolver,
            sportsbooks: sportsbooks.to_vec(),
        }
    }

    /// One row per canonical team, one column per known sportsbook.
    ///
    /// Rows are ordered by first appearance. A team seen again in a later
    /// game has its whole row replaced.
    pub fn build(&self, games: &[GameOdds]) -> OddsTable {
        let mut rows: Vec<OddsRow> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for game in games {
            for row in self.game_rows(game) {
                match index.get(&row.team) {
                    Some(&i) => {
                        debug!("Team {} appears in more than one game, keeping the later line", row.team);
                        rows[i].lines = row.lines;
                    }
                    None => {
                        index.insert(row.team.clone(), rows.len());
                        rows.push(row);
                    }
                }
            }
        }

        OddsTable {
            sportsbooks: self.sportsbooks.clone(),
            rows,
        }
    }

    /// Home and away rows for one game, filled from its moneyline records
    fn game_rows(&self, game: &GameOdds) -> Vec<OddsRow> {
        let mut rows: Vec<OddsRow> = [&game.home_team, &game.away_team]
            .into_iter()
            .map(|team| OddsRow {
                team: self.resolver.canonical_name(team),
                lines: self.empty_lines(),
            })
            .collect();

        for record in game.moneyline_records() {
            let team = self.resolver.canonical_name(&record.team);
            let cell = rows
                .iter_mut()
                .find(|row| row.team == team)
                .and_then(|row| row.lines.get_mut(&record.sportsbook));

            // Books outside the configured columns are dropped
            if let Some(cell) = cell {
                *cell = record.moneyline;
            }
        }

        rows
    }

    fn empty_lines(&self) -> BTreeMap<String, Option<Moneyline>> {
        self.sportsbooks.iter().map(|book| (book.clone(), None)).collect()
    }
}
