use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::OddsSource;
use crate::matching::TeamResolver;
use crate::models::GameOdds;

/// Merges several odds providers into one list, one entry per game.
///
/// Providers are queried in order. A provider that fails is logged and
/// skipped; the merge only fails when every provider failed.
pub struct CombinedOddsSource {
    sources: Vec<Box<dyn OddsSource>>,
    team_resolver: Arc<TeamResolver>,
}

impl CombinedOddsSource {
    pub fn new(sources: Vec<Box<dyn OddsSource>>, team_resolver: Arc<TeamResolver>) -> Self {
        Self {
            sources,
            team_resolver,
        }
    }

    /// Fold `incoming` into `merged`, matching games by canonical home/away.
    ///
    /// A game listed with the sides reversed joins the existing entry, with
    /// its lines flipped to that entry's orientation.
    fn merge(&self, merged: &mut Vec<GameOdds>, incoming: Vec<GameOdds>) {
        for game in incoming {
            let home = self.team_resolver.normalize(&game.home_team);
            let away = self.team_resolver.normalize(&game.away_team);

            let mut reversed = false;
            let existing = merged.iter_mut().find(|g| {
                let g_home = self.team_resolver.normalize(&g.home_team);
                let g_away = self.team_resolver.normalize(&g.away_team);
                reversed = g_home == away && g_away == home;
                (g_home == home && g_away == away) || reversed
            });

            match existing {
                Some(entry) if reversed => {
                    debug!(
                        "{} vs {} listed with sides reversed, flipping lines",
                        game.home_team, game.away_team
                    );
                    entry
                        .books
                        .extend(game.books.into_iter().map(|(book, line)| (book, line.reversed())));
                }
                Some(entry) => entry.books.extend(game.books),
                None => merged.push(game),
            }
        }
    }
}

#[async_trait]
impl OddsSource for CombinedOddsSource {
    fn name(&self) -> &str {
        "combined"
    }

    async fn fetch_odds(&self) -> Result<Vec<GameOdds>> {
        let mut merged = Vec::new();
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.fetch_odds().await {
                Ok(games) => {
                    debug!("{} returned {} games", source.name(), games.len());
                    self.merge(&mut merged, games);
                }
                Err(e) => {
                    warn!("Odds source {} failed: {:#}", source.name(), e);
                    failures.push(format!("{}: {:#}", source.name(), e));
                }
            }
        }

        if !self.sources.is_empty() && failures.len() == self.sources.len() {
            anyhow::bail!("All odds sources failed: {}", failures.join("; "));
        }

        Ok(merged)
    }
}
