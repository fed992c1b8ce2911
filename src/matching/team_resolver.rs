use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{BookLine, Game, GameOdds};

/// Aliases every resolver knows about, even without an aliases file
const BUILTIN_ALIASES: &[(&str, &str)] = &[("Los Angeles Clippers", "LA Clippers")];

/// Resolves team names between the scoreboard and the odds providers
pub struct TeamResolver {
    /// Map of lowercased alias -> canonical display name
    aliases: HashMap<String, String>,
}

/// Team alias configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAliases {
    pub teams: Vec<TeamAliasEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAliasEntry {
    /// Canonical team name
    pub canonical: String,
    /// Other spellings used by data sources
    pub aliases: Vec<String>,
}

/// Odds matched to a scoreboard game
#[derive(Debug, Clone, Copy)]
pub struct OddsMatch<'a> {
    pub odds: &'a GameOdds,
    /// The provider lists the scoreboard's home team as away
    pub swapped: bool,
}

impl OddsMatch<'_> {
    /// Book line oriented to the scoreboard's home/away
    pub fn line(&self, sportsbook: &str) -> Option<BookLine> {
        let line = self.odds.books.get(sportsbook)?;
        if self.swapped {
            Some(line.reversed())
        } else {
            Some(line.clone())
        }
    }
}

impl TeamResolver {
    /// Create a new resolver with no aliases
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Resolver with the built-in aliases only
    pub fn with_defaults() -> Self {
        let mut resolver = Self::new();
        for (alias, canonical) in BUILTIN_ALIASES {
            resolver.add_alias(alias, canonical);
        }
        resolver
    }

    /// Load aliases from a JSON file, on top of the built-in ones
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context("Failed to read team aliases file")?;

        let aliases_config: TeamAliases =
            serde_json::from_str(&content).context("Failed to parse team aliases JSON")?;

        let mut resolver = Self::with_defaults();

        for entry in aliases_config.teams {
            resolver.add_alias(&entry.canonical, &entry.canonical);

            for alias in &entry.aliases {
                resolver.add_alias(alias, &entry.canonical);
            }
        }

        info!("Loaded {} team alias mappings", resolver.aliases.len());

        Ok(resolver)
    }

    /// Canonical display name, or the trimmed input when the name is unknown
    pub fn canonical_name(&self, name: &str) -> String {
        let trimmed = name.trim();

        self.aliases
            .get(&trimmed.to_lowercase())
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Case-insensitive key for comparisons
    pub fn normalize(&self, name: &str) -> String {
        self.canonical_name(name).to_lowercase()
    }

    /// Check if two team names match (accounting for aliases)
    pub fn names_match(&self, name_a: &str, name_b: &str) -> bool {
        self.normalize(name_a) == self.normalize(name_b)
    }

    /// Find the odds entry for a scoreboard game
    pub fn match_odds_to_game<'a>(
        &self,
        game: &Game,
        odds: &'a [GameOdds],
    ) -> Option<OddsMatch<'a>> {
        let home = self.normalize(&game.home.full_name());
        let away = self.normalize(&game.away.full_name());

        for entry in odds {
            let odds_home = self.normalize(&entry.home_team);
            let odds_away = self.normalize(&entry.away_team);

            if odds_home == home && odds_away == away {
                return Some(OddsMatch {
                    odds: entry,
                    swapped: false,
                });
            }

            if odds_home == away && odds_away == home {
                debug!("Odds for {} vs {} list the teams reversed", home, away);
                return Some(OddsMatch {
                    odds: entry,
                    swapped: true,
                });
            }
        }

        debug!("No odds found for {} vs {}", home, away);
        None
    }

    /// Add a new alias mapping
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        let canonical = canonical.trim().to_string();
        self.aliases
            .insert(canonical.to_lowercase(), canonical.clone());
        self.aliases.insert(alias.trim().to_lowercase(), canonical);
    }
}

impl Default for TeamResolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Moneyline, TeamScore};
    use chrono::Utc;

    fn score(city: &str, name: &str) -> TeamScore {
        TeamScore {
            city: city.to_string(),
            name: name.to_string(),
            tricode: String::new(),
            score: 0,
        }
    }

    fn game(home: TeamScore, away: TeamScore) -> Game {
        Game {
            game_id: "1".to_string(),
            home,
            away,
            status: "7:30 pm ET".to_string(),
            clock: String::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_canonical_name() {
        let resolver = TeamResolver::with_defaults();

        assert_eq!(resolver.canonical_name("Los Angeles Clippers"), "LA Clippers");
        assert_eq!(resolver.canonical_name("los angeles clippers "), "LA Clippers");
        assert_eq!(resolver.canonical_name("LA Clippers"), "LA Clippers");
        assert_eq!(resolver.canonical_name(" Boston Celtics"), "Boston Celtics");
    }

    #[test]
    fn test_names_match() {
        let mut resolver = TeamResolver::new();
        resolver.add_alias("Sixers", "Philadelphia 76ers");

        assert!(resolver.names_match("Philadelphia 76ers", "sixers"));
        assert!(resolver.names_match("Boston Celtics", "boston celtics"));
        assert!(!resolver.names_match("Sixers", "Boston Celtics"));
    }

    #[test]
    fn test_match_odds_to_game() {
        let resolver = TeamResolver::with_defaults();

        let mut odds = GameOdds::new("Los Angeles Clippers", "Denver Nuggets");
        odds.books.insert(
            "espn".to_string(),
            BookLine {
                home: Some(Moneyline(-130)),
                away: Some(Moneyline(110)),
                total: Some(224.5),
            },
        );
        let odds = vec![GameOdds::new("Boston Celtics", "Miami Heat"), odds];

        let matched = resolver
            .match_odds_to_game(&game(score("LA", "Clippers"), score("Denver", "Nuggets")), &odds)
            .unwrap();
        assert!(!matched.swapped);
        assert_eq!(matched.line("espn").unwrap().home, Some(Moneyline(-130)));

        let swapped = resolver
            .match_odds_to_game(&game(score("Denver", "Nuggets"), score("LA", "Clippers")), &odds)
            .unwrap();
        assert!(swapped.swapped);
        let line = swapped.line("espn").unwrap();
        assert_eq!(line.home, Some(Moneyline(110)));
        assert_eq!(line.away, Some(Moneyline(-130)));
        assert_eq!(line.total, Some(224.5));
        assert!(swapped.line("fanduel").is_none());

        let missing = resolver
            .match_odds_to_game(&game(score("Utah", "Jazz"), score("Denver", "Nuggets")), &odds);
        assert!(missing.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("team_aliases_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"teams":[{"canonical":"Portland Trail Blazers","aliases":["Portland Trailblazers","Blazers"]}]}"#,
        )
        .unwrap();

        let resolver = TeamResolver::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(resolver.canonical_name("blazers"), "Portland Trail Blazers");
        assert_eq!(resolver.canonical_name("Portland Trailblazers"), "Portland Trail Blazers");
        assert_eq!(resolver.canonical_name("Los Angeles Clippers"), "LA Clippers");
    }
}
