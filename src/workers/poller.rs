use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::api::{OddsSource, ScoreSource};
use crate::matching::{BoardBuilder, TeamResolver};
use crate::models::DashboardSnapshot;
use crate::render;

/// Worker that refreshes the dashboard: fetch, join, render, publish
pub struct DashboardPoller<S, O> {
    scores: S,
    odds: O,
    team_resolver: Arc<TeamResolver>,
    table_sportsbooks: Vec<String>,
    card_sportsbook: String,
    page_tx: watch::Sender<String>,
    poll_interval: Duration,
}

impl<S: ScoreSource, O: OddsSource> DashboardPoller<S, O> {
    /// Create a new dashboard poller
    pub fn new(
        scores: S,
        odds: O,
        team_resolver: Arc<TeamResolver>,
        table_sportsbooks: Vec<String>,
        card_sportsbook: String,
        page_tx: watch::Sender<String>,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            scores,
            odds,
            team_resolver,
            table_sportsbooks,
            card_sportsbook,
            page_tx,
            poll_interval: Duration::from_secs(poll_interval_secs.max(1)),
        }
    }

    /// Run until the token is cancelled. The first cycle runs immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Dashboard poller started (interval: {:?})", self.poll_interval);

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Dashboard poller stopped");
                    return;
                }
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// One full cycle. Failures become empty data plus an error note.
    pub async fn run_cycle(&self) -> DashboardSnapshot {
        let mut errors = Vec::new();

        let games = match self.scores.fetch_games().await {
            Ok(games) => games,
            Err(e) => {
                error!("Failed to fetch live games: {:#}", e);
                errors.push(format!("Live scores unavailable: {}", e));
                Vec::new()
            }
        };

        let odds = match self.odds.fetch_odds().await {
            Ok(odds) => odds,
            Err(e) => {
                error!("Failed to fetch odds from {}: {:#}", self.odds.name(), e);
                errors.push(format!("Odds unavailable: {}", e));
                Vec::new()
            }
        };

        debug!("Joining {} games with odds for {} games", games.len(), odds.len());

        let snapshot = BoardBuilder::new(
            &self.team_resolver,
            &self.table_sportsbooks,
            &self.card_sportsbook,
        )
        .build(&games, &odds, Utc::now(), errors);

        let page = render::render_live_page(&snapshot, self.poll_interval.as_secs());
        self.page_tx.send_replace(page);

        info!(
            "Dashboard refreshed: {} games, {} teams in odds table",
            snapshot.cards.len(),
            snapshot.odds_table.rows.len()
        );

        snapshot
    }
}
