use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::http::eastern_today;
use super::{json_f64, OddsSource};
use crate::models::{BookLine, GameOdds, Moneyline};

pub const DEFAULT_HEADER_URL: &str = "https://site.web.api.espn.com/apis/v2/scoreboard/header";

/// Sportsbook name ESPN lines are filed under
pub const ESPN_BOOK: &str = "espn";

/// Client for the ESPN scoreboard header, which carries one moneyline per team
pub struct EspnOddsClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct HeaderResponse {
    #[serde(default)]
    sports: Vec<HeaderSport>,
}

#[derive(Debug, Deserialize)]
struct HeaderSport {
    #[serde(default)]
    leagues: Vec<HeaderLeague>,
}

#[derive(Debug, Deserialize)]
struct HeaderLeague {
    #[serde(default)]
    events: Vec<HeaderEvent>,
}

#[derive(Debug, Deserialize)]
struct HeaderEvent {
    #[serde(default)]
    competitors: Vec<HeaderCompetitor>,
    odds: Option<HeaderOdds>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderCompetitor {
    display_name: String,
    #[serde(default)]
    home_away: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderOdds {
    home: Option<HeaderSideOdds>,
    away: Option<HeaderSideOdds>,
    #[serde(default)]
    over_under: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderSideOdds {
    #[serde(default)]
    money_line: serde_json::Value,
}

impl EspnOddsClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Fetch moneylines for every NBA game on a date
    pub async fn fetch_for_date(&self, date: NaiveDate) -> Result<Vec<GameOdds>> {
        let date_str = date.format("%Y%m%d").to_string();
        debug!("Fetching ESPN odds for {}", date_str);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("sport", "basketball"),
                ("league", "nba"),
                ("region", "us"),
                ("lang", "en"),
                ("contentorigin", "espn"),
                ("buyWindow", "1m"),
                ("showAirings", "buy,live,replay"),
                ("tz", "America/New_York"),
                ("dates", date_str.as_str()),
            ])
            .send()
            .await
            .context("Failed to fetch ESPN scoreboard header")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("ESPN API error: {} - {}", status, text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read ESPN response")?;

        let odds = parse_header(&body)?;
        info!("ESPN returned odds for {} games", odds.len());

        Ok(odds)
    }
}

#[async_trait]
impl OddsSource for EspnOddsClient {
    fn name(&self) -> &str {
        ESPN_BOOK
    }

    async fn fetch_odds(&self) -> Result<Vec<GameOdds>> {
        self.fetch_for_date(eastern_today()).await
    }
}

/// Parse the header payload into one `GameOdds` per event.
///
/// Events without both a home and an away competitor are skipped. Events
/// without odds still produce an entry, with an empty line.
pub fn parse_header(body: &str) -> Result<Vec<GameOdds>> {
    let response: HeaderResponse =
        serde_json::from_str(body).context("Failed to parse ESPN scoreboard header")?;

    let events = response
        .sports
        .into_iter()
        .next()
        .and_then(|s| s.leagues.into_iter().next())
        .map(|l| l.events)
        .unwrap_or_default();

    let mut games = Vec::with_capacity(events.len());

    for event in events {
        let home = event.competitors.iter().find(|c| c.home_away == "home");
        let away = event.competitors.iter().find(|c| c.home_away == "away");

        let (Some(home), Some(away)) = (home, away) else {
            debug!("Skipping ESPN event without home/away competitors");
            continue;
        };

        let mut game = GameOdds::new(home.display_name.trim(), away.display_name.trim());

        let line = match &event.odds {
            Some(odds) => BookLine {
                home: odds
                    .home
                    .as_ref()
                    .and_then(|h| Moneyline::from_json(&h.money_line)),
                away: odds
                    .away
                    .as_ref()
                    .and_then(|a| Moneyline::from_json(&a.money_line)),
                total: json_f64(&odds.over_under),
            },
            None => BookLine::default(),
        };
        game.books.insert(ESPN_BOOK.to_string(), line);

        games.push(game);
    }

    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sports": [{
            "name": "Basketball",
            "leagues": [{
                "abbreviation": "NBA",
                "events": [
                    {
                        "id": "401705000",
                        "competitors": [
                            {"displayName": "Denver Nuggets", "homeAway": "away"},
                            {"displayName": "LA Clippers", "homeAway": "home"}
                        ],
                        "odds": {
                            "details": "LAC -2.5",
                            "overUnder": 224.5,
                            "home": {"moneyLine": -135},
                            "away": {"moneyLine": "+115"}
                        }
                    },
                    {
                        "id": "401705001",
                        "competitors": [
                            {"displayName": "Utah Jazz", "homeAway": "away"},
                            {"displayName": "Sacramento Kings", "homeAway": "home"}
                        ],
                        "odds": {"overUnder": "218.5", "home": {"moneyLine": "OFF"}, "away": {}}
                    },
                    {
                        "id": "401705002",
                        "competitors": [
                            {"displayName": "Miami Heat", "homeAway": "away"},
                            {"displayName": "Boston Celtics", "homeAway": "home"}
                        ]
                    },
                    {
                        "id": "401705003",
                        "competitors": [{"displayName": "TBD", "homeAway": "home"}]
                    }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_parse_header() {
        let games = parse_header(SAMPLE).unwrap();
        assert_eq!(games.len(), 3);

        let clippers = &games[0];
        assert_eq!(clippers.home_team, "LA Clippers");
        assert_eq!(clippers.away_team, "Denver Nuggets");
        let line = &clippers.books[ESPN_BOOK];
        assert_eq!(line.home, Some(Moneyline(-135)));
        assert_eq!(line.away, Some(Moneyline(115)));
        assert_eq!(line.total, Some(224.5));
    }

    #[test]
    fn test_non_numeric_lines_are_absent() {
        let games = parse_header(SAMPLE).unwrap();

        let kings = &games[1].books[ESPN_BOOK];
        assert_eq!(kings.home, None);
        assert_eq!(kings.away, None);
        assert_eq!(kings.total, Some(218.5));

        assert_eq!(games[2].books[ESPN_BOOK], BookLine::default());
    }

    #[test]
    fn test_no_sports() {
        assert!(parse_header(r#"{"sports": []}"#).unwrap().is_empty());
        assert!(parse_header("not json").is_err());
    }
}
