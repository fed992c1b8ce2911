use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::http::eastern_today;
use super::{json_f64, OddsSource};
use crate::models::{BookLine, GameOdds, Moneyline};

pub const DEFAULT_BASE_URL: &str = "https://www.sportsbookreview.com";

const MONEYLINE_PATH: &str = "betting-odds/nba-basketball/money-line/full-game/";
const TOTALS_PATH: &str = "betting-odds/nba-basketball/totals/full-game/";
const NEXT_DATA_MARKER: &str = r#"<script id="__NEXT_DATA__" type="application/json">"#;

/// Which sportsbooks a provider instance reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderMode {
    /// Every configured sportsbook in one pass
    AllBooks,
    /// A single sportsbook; the same query filtered down
    SingleBook(String),
}

impl ProviderMode {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.is_empty() || value == "all" {
            ProviderMode::AllBooks
        } else {
            ProviderMode::SingleBook(value)
        }
    }
}

/// Client for SportsbookReview odds pages
pub struct SbrOddsClient {
    client: Client,
    base_url: String,
    sportsbooks: Vec<String>,
    mode: ProviderMode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextData {
    props: NextProps,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextProps {
    page_props: PageProps,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageProps {
    #[serde(default)]
    odds_tables: Vec<OddsTableData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OddsTableData {
    odds_table_model: OddsTableModel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OddsTableModel {
    #[serde(default)]
    game_rows: Vec<GameRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameRow {
    game_view: GameView,
    #[serde(default)]
    odds_views: Vec<Option<OddsView>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameView {
    home_team: SbrTeam,
    away_team: SbrTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SbrTeam {
    full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OddsView {
    sportsbook: String,
    current_line: Option<CurrentLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentLine {
    #[serde(default)]
    home_odds: serde_json::Value,
    #[serde(default)]
    away_odds: serde_json::Value,
    #[serde(default)]
    total: serde_json::Value,
}

impl SbrOddsClient {
    pub fn new(client: Client, base_url: &str, sportsbooks: &[String], mode: ProviderMode) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sportsbooks: sportsbooks.iter().map(|s| s.to_lowercase()).collect(),
            mode,
        }
    }

    /// Sportsbooks this instance reports
    pub fn active_books(&self) -> Vec<String> {
        match &self.mode {
            ProviderMode::AllBooks => self.sportsbooks.clone(),
            ProviderMode::SingleBook(book) => vec![book.clone()],
        }
    }

    /// Fetch moneylines and totals for a date
    pub async fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<GameOdds>> {
        let moneyline_page = self.fetch_page(MONEYLINE_PATH, date).await?;
        let mut games = parse_moneyline_page(&moneyline_page, &self.active_books())?;

        match self.fetch_page(TOTALS_PATH, date).await {
            Ok(page) => match parse_totals_page(&page) {
                Ok(totals) => apply_totals(&mut games, &totals),
                Err(e) => warn!("Failed to parse SBR totals: {}", e),
            },
            Err(e) => warn!("Failed to fetch SBR totals: {}", e),
        }

        info!("SBR returned odds for {} games", games.len());
        Ok(games)
    }

    async fn fetch_page(&self, path: &str, date: NaiveDate) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);
        let date_str = date.format("%Y-%m-%d").to_string();
        debug!("Fetching SBR page {} for {}", url, date_str);

        let response = self
            .client
            .get(&url)
            .query(&[("date", date_str.as_str())])
            .send()
            .await
            .context("Failed to fetch SBR odds page")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("SBR error: {} for {}", status, url);
        }

        response.text().await.context("Failed to read SBR odds page")
    }
}

#[async_trait]
impl OddsSource for SbrOddsClient {
    fn name(&self) -> &str {
        "sbr"
    }

    async fn fetch_odds(&self) -> Result<Vec<GameOdds>> {
        self.fetch_for_date(eastern_today()).await
    }
}

/// Pull the embedded page data out of the HTML
fn extract_next_data(html: &str) -> Result<NextData> {
    let start = html
        .find(NEXT_DATA_MARKER)
        .context("SBR page has no __NEXT_DATA__ script")?
        + NEXT_DATA_MARKER.len();
    let len = html[start..]
        .find("</script>")
        .context("SBR __NEXT_DATA__ script is not closed")?;

    serde_json::from_str(&html[start..start + len]).context("Failed to parse SBR page data")
}

fn game_rows(html: &str) -> Result<Vec<GameRow>> {
    let data = extract_next_data(html)?;

    Ok(data
        .props
        .page_props
        .odds_tables
        .into_iter()
        .next()
        .map(|t| t.odds_table_model.game_rows)
        .unwrap_or_default())
}

/// Moneylines per game for the given sportsbooks.
///
/// Every requested book gets an entry, empty when SBR lists no line for it.
pub fn parse_moneyline_page(html: &str, sportsbooks: &[String]) -> Result<Vec<GameOdds>> {
    let rows = game_rows(html)?;
    let mut games = Vec::with_capacity(rows.len());

    for row in rows {
        let mut game = GameOdds::new(
            row.game_view.home_team.full_name.trim(),
            row.game_view.away_team.full_name.trim(),
        );

        for book in sportsbooks {
            game.books.insert(book.clone(), BookLine::default());
        }

        for view in row.odds_views.into_iter().flatten() {
            let book = view.sportsbook.to_lowercase();
            let Some(entry) = game.books.get_mut(&book) else {
                continue;
            };
            if let Some(line) = view.current_line {
                entry.home = Moneyline::from_json(&line.home_odds);
                entry.away = Moneyline::from_json(&line.away_odds);
            }
        }

        games.push(game);
    }

    Ok(games)
}

/// (home, away) -> sportsbook -> total
pub type Totals = HashMap<(String, String), HashMap<String, f64>>;

pub fn parse_totals_page(html: &str) -> Result<Totals> {
    let mut totals: Totals = HashMap::new();

    for row in game_rows(html)? {
        let key = (
            row.game_view.home_team.full_name.trim().to_string(),
            row.game_view.away_team.full_name.trim().to_string(),
        );
        let books = totals.entry(key).or_default();

        for view in row.odds_views.into_iter().flatten() {
            if let Some(total) = view.current_line.and_then(|l| json_f64(&l.total)) {
                books.insert(view.sportsbook.to_lowercase(), total);
            }
        }
    }

    Ok(totals)
}

fn apply_totals(games: &mut [GameOdds], totals: &Totals) {
    for game in games {
        let key = (game.home_team.clone(), game.away_team.clone());
        let Some(book_totals) = totals.get(&key) else {
            continue;
        };
        for (book, line) in game.books.iter_mut() {
            line.total = book_totals.get(book).copied();
        }
    }
}
