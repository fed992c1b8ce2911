use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live game snapshot from the NBA scoreboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// NBA game ID
    pub game_id: String,

    /// Home team info
    pub home: TeamScore,

    /// Away team info
    pub away: TeamScore,

    /// Status text as published by the league (e.g. "Q3 5:21", "Final")
    pub status: String,

    /// Raw game clock (ISO-8601 duration or MM:SS), empty before tip-off
    pub clock: String,

    /// When this snapshot was fetched
    pub updated_at: DateTime<Utc>,
}

/// One side of a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamScore {
    /// City, e.g. "LA"
    pub city: String,

    /// Team name, e.g. "Clippers"
    pub name: String,

    /// Three letter code, e.g. "LAC"
    pub tricode: String,

    /// Current points
    pub score: i32,
}

impl TeamScore {
    /// "{city} {name}", the form odds providers use
    pub fn full_name(&self) -> String {
        match (self.city.trim(), self.name.trim()) {
            ("", name) => name.to_string(),
            (city, name) => format!("{} {}", city, name),
        }
    }
}

/// Which side of the game a team is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Per-team view of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLine {
    pub tricode: String,
    pub side: Side,

    /// Own score minus opponent score
    pub points_differential: i32,

    /// Seconds left on the game clock
    pub seconds_remaining: u32,
}

impl Game {
    /// Home and away lines, home first
    pub fn team_lines(&self) -> [TeamLine; 2] {
        let seconds_remaining = clock_to_seconds(&self.clock);

        [
            TeamLine {
                tricode: self.home.tricode.clone(),
                side: Side::Home,
                points_differential: self.home.score - self.away.score,
                seconds_remaining,
            },
            TeamLine {
                tricode: self.away.tricode.clone(),
                side: Side::Away,
                points_differential: self.away.score - self.home.score,
                seconds_remaining,
            },
        ]
    }
}

/// Convert a game clock to seconds.
///
/// Accepts `MM:SS` and the live feed's `PT05M23.00S`. Empty, "N/A" and
/// malformed clocks count as zero.
pub fn clock_to_seconds(clock: &str) -> u32 {
    let clock = clock.trim();
    if clock.is_empty() || clock.eq_ignore_ascii_case("n/a") {
        return 0;
    }

    if let Some(rest) = clock.strip_prefix("PT") {
        return parse_iso_clock(rest).unwrap_or(0);
    }

    let Some((minutes, seconds)) = clock.split_once(':') else {
        return 0;
    };

    match (minutes.parse::<u32>(), seconds.parse::<u32>()) {
        (Ok(m), Ok(s)) => m.checked_mul(60).and_then(|m| m.checked_add(s)).unwrap_or(0),
        _ => 0,
    }
}

fn parse_iso_clock(rest: &str) -> Option<u32> {
    let (minutes, rest) = rest.split_once('M')?;
    let seconds = rest.strip_suffix('S')?;

    let minutes: u32 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }

    minutes.checked_mul(60)?.checked_add(seconds.floor() as u32)
}

/// Format seconds as M:SS
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home_score: i32, away_score: i32, clock: &str) -> Game {
        Game {
            game_id: "0022400001".to_string(),
            home: TeamScore {
                city: "LA".to_string(),
                name: "Clippers".to_string(),
                tricode: "LAC".to_string(),
                score: home_score,
            },
            away: TeamScore {
                city: "Denver".to_string(),
                name: "Nuggets".to_string(),
                tricode: "DEN".to_string(),
                score: away_score,
            },
            status: "Q4 5:23".to_string(),
            clock: clock.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_clock_to_seconds() {
        assert_eq!(clock_to_seconds("05:23"), 323);
        assert_eq!(clock_to_seconds("PT05M23.00S"), 323);
        assert_eq!(clock_to_seconds("PT00M09.40S"), 9);
        assert_eq!(clock_to_seconds(""), 0);
        assert_eq!(clock_to_seconds("N/A"), 0);
        assert_eq!(clock_to_seconds("5m"), 0);
        assert_eq!(clock_to_seconds("PTxxM"), 0);
    }

    #[test]
    fn test_oversized_clock_is_zero() {
        assert_eq!(clock_to_seconds("99999999:00"), 0);
        assert_eq!(clock_to_seconds("PT99999999M00.00S"), 0);
        assert_eq!(clock_to_seconds("71582788:15"), u32::MAX);
        assert_eq!(clock_to_seconds("71582788:16"), 0);
    }

    #[test]
    fn test_team_lines() {
        let [home, away] = game(101, 96, "PT05M23.00S").team_lines();

        assert_eq!(home.tricode, "LAC");
        assert_eq!(home.side, Side::Home);
        assert_eq!(home.points_differential, 5);
        assert_eq!(away.points_differential, -5);
        assert_eq!(away.seconds_remaining, 323);
    }

    #[test]
    fn test_full_name() {
        let g = game(0, 0, "");
        assert_eq!(g.home.full_name(), "LA Clippers");
        assert_eq!(format_clock(323), "5:23");
    }
}
