use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nba_odds_board::api::{
    http, CombinedOddsSource, EspnOddsClient, LiveScoreClient, OddsSource, SbrOddsClient,
};
use nba_odds_board::config::Config;
use nba_odds_board::matching::TeamResolver;
use nba_odds_board::render;
use nba_odds_board::server;
use nba_odds_board::workers::DashboardPoller;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nba_odds_board=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting nba-odds-board");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Load team aliases
    let team_resolver = Arc::new(load_team_resolver(&config)?);
    info!("Team resolver initialized");

    // Initialize API clients
    let client = http::build_client(config.request_timeout)?;
    let scores = LiveScoreClient::new(client.clone(), &config.nba_scoreboard_url);

    let odds_sources: Vec<Box<dyn OddsSource>> = vec![
        Box::new(EspnOddsClient::new(client.clone(), &config.espn_header_url)),
        Box::new(SbrOddsClient::new(
            client,
            &config.sbr_base_url,
            &config.sportsbooks,
            config.odds_provider_mode.clone(),
        )),
    ];
    let odds = CombinedOddsSource::new(odds_sources, Arc::clone(&team_resolver));
    info!("API clients initialized");

    // Latest rendered page, shared with the web server
    let (page_tx, page_rx) = watch::channel(render::render_loading_page(config.poll_interval));

    let poller = DashboardPoller::new(
        scores,
        odds,
        Arc::clone(&team_resolver),
        config.table_sportsbooks(),
        config.card_sportsbook.clone(),
        page_tx,
        config.poll_interval,
    );

    let cancel = CancellationToken::new();

    let poller_handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            poller.run(cancel).await;
        })
    };

    let mut server_handle = {
        let cancel = cancel.clone();
        let addr = config.bind_addr;
        tokio::spawn(async move { server::serve(addr, page_rx, cancel).await })
    };

    info!("Dashboard poller and server started");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = &mut server_handle => {
            error!("Dashboard server exited unexpectedly: {:?}", result);
        }
    }

    cancel.cancel();
    if let Err(e) = poller_handle.await {
        error!("Dashboard poller task failed: {}", e);
    }
    if !server_handle.is_finished() {
        if let Ok(Err(e)) = server_handle.await {
            error!("Dashboard server failed during shutdown: {:#}", e);
        }
    }

    info!("Shutting down nba-odds-board");
    Ok(())
}

/// Load team resolver from JSON file or fall back to the built-in aliases
fn load_team_resolver(config: &Config) -> Result<TeamResolver> {
    if config.team_aliases_path.exists() {
        TeamResolver::load_from_file(&config.team_aliases_path)
    } else {
        info!("No team aliases file found, using built-in aliases");
        Ok(TeamResolver::with_defaults())
    }
}
