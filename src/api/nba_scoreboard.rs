use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::ScoreSource;
use crate::models::{Game, TeamScore};

pub const DEFAULT_SCOREBOARD_URL: &str =
    "https://cdn.nba.com/static/json/liveData/scoreboard/todaysScoreboard_00.json";

/// Client for the NBA live scoreboard
pub struct LiveScoreClient {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    scoreboard: Option<Scoreboard>,
}

#[derive(Debug, Deserialize)]
struct Scoreboard {
    #[serde(default)]
    games: Vec<ScoreboardGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreboardGame {
    game_id: String,
    #[serde(default)]
    game_status_text: String,
    #[serde(default)]
    game_clock: String,
    home_team: ScoreboardTeam,
    away_team: ScoreboardTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreboardTeam {
    #[serde(default)]
    team_name: String,
    #[serde(default)]
    team_city: String,
    #[serde(default)]
    team_tricode: String,
    score: Option<i32>,
}

impl LiveScoreClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Fetch today's games
    pub async fn fetch_todays_games(&self) -> Result<Vec<Game>> {
        debug!("Fetching NBA scoreboard from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch NBA scoreboard")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("NBA scoreboard error: {} - {}", status, text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read NBA scoreboard body")?;

        let games = parse_scoreboard(&body)?;
        info!("NBA scoreboard returned {} games", games.len());

        Ok(games)
    }
}

#[async_trait]
impl ScoreSource for LiveScoreClient {
    async fn fetch_games(&self) -> Result<Vec<Game>> {
        self.fetch_todays_games().await
    }
}

/// Parse the scoreboard JSON. A payload without a scoreboard is an error;
/// a scoreboard without games is an empty day.
pub fn parse_scoreboard(body: &str) -> Result<Vec<Game>> {
    let response: ScoreboardResponse =
        serde_json::from_str(body).context("Failed to parse NBA scoreboard")?;

    let scoreboard = response
        .scoreboard
        .context("NBA scoreboard payload has no scoreboard")?;

    let updated_at = Utc::now();

    Ok(scoreboard
        .games
        .into_iter()
        .map(|g| Game {
            game_id: g.game_id,
            home: convert_team(g.home_team),
            away: convert_team(g.away_team),
            status: g.game_status_text.trim().to_string(),
            clock: g.game_clock,
            updated_at,
        })
        .collect())
}

fn convert_team(team: ScoreboardTeam) -> TeamScore {
    TeamScore {
        city: team.team_city,
        name: team.team_name,
        tricode: team.team_tricode,
        score: team.score.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "meta": {"version": 1},
        "scoreboard": {
            "gameDate": "2025-01-14",
            "games": [
                {
                    "gameId": "0022400550",
                    "gameStatus": 2,
                    "gameStatusText": "Q3 4:12 ",
                    "gameClock": "PT04M12.00S",
                    "homeTeam": {"teamId": 1610612746, "teamName": "Clippers", "teamCity": "LA", "teamTricode": "LAC", "score": 78},
                    "awayTeam": {"teamId": 1610612743, "teamName": "Nuggets", "teamCity": "Denver", "teamTricode": "DEN", "score": 81}
                },
                {
                    "gameId": "0022400551",
                    "gameStatusText": "10:00 pm ET",
                    "gameClock": "",
                    "homeTeam": {"teamName": "Kings", "teamCity": "Sacramento", "teamTricode": "SAC", "score": 0},
                    "awayTeam": {"teamName": "Jazz", "teamCity": "Utah", "teamTricode": "UTA"}
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_scoreboard() {
        let games = parse_scoreboard(SAMPLE).unwrap();
        assert_eq!(games.len(), 2);

        let first = &games[0];
        assert_eq!(first.home.full_name(), "LA Clippers");
        assert_eq!(first.away.score, 81);
        assert_eq!(first.status, "Q3 4:12");
        assert_eq!(first.clock, "PT04M12.00S");

        assert_eq!(games[1].away.score, 0);
        assert_eq!(games[1].away.tricode, "UTA");
    }

    #[test]
    fn test_empty_day() {
        let games = parse_scoreboard(r#"{"scoreboard": {"games": []}}"#).unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn test_missing_scoreboard_is_error() {
        assert!(parse_scoreboard(r#"{"meta": {}}"#).is_err());
        assert!(parse_scoreboard("<html>").is_err());
    }
}
