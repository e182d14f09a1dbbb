use anyhow::{anyhow, Result};

use crate::model::player::PlayerRecord;

pub const MAX_SUGGESTIONS: usize = 3;

/// Players whose name contains `query`, ignoring case, in dataset order.
/// An empty query suggests nothing.
pub fn suggest<'a>(players: &'a [PlayerRecord], query: &str) -> Vec<&'a PlayerRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    players
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Resolves a typed name to exactly one player: an exact name match wins,
/// otherwise the query must match a single player.
pub fn resolve<'a>(players: &'a [PlayerRecord], query: &str) -> Result<&'a PlayerRecord> {
    let needle = query.trim().to_lowercase();
    if let Some(exact) = players.iter().find(|p| p.name.to_lowercase() == needle) {
        return Ok(exact);
    }

    let matches = suggest(players, query);
    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("No player matches '{}'", query)),
        _ => {
            let names: Vec<&str> = matches.iter().map(|p| p.name.as_str()).collect();
            Err(anyhow!("'{}' is ambiguous: {:?}", query, names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::fixtures::skater;
    use crate::model::player::Position;

    fn players() -> Vec<PlayerRecord> {
        ["Jack Hughes", "Quinn Hughes", "Luke Hughes", "Jack Eichel", "Hughes"]
            .iter()
            .map(|n| skater(n, Position::Center))
            .collect()
    }

    #[test]
    fn test_suggest_limits_and_ignores_case() {
        let players = players();
        let found: Vec<&str> = suggest(&players, "HUGHES").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(found, vec!["Jack Hughes", "Quinn Hughes", "Luke Hughes"]);

        assert!(suggest(&players, "").is_empty());
        assert!(suggest(&players, "   ").is_empty());
        assert!(suggest(&players, "zzz").is_empty());
    }

    #[test]
    fn test_resolve() {
        let players = players();
        assert_eq!(resolve(&players, "eichel").unwrap().name, "Jack Eichel");
        assert_eq!(resolve(&players, "hughes").unwrap().name, "Hughes");
        assert!(resolve(&players, "jack").is_err());
        assert!(resolve(&players, "nobody").is_err());
    }
}
