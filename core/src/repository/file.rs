use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::model::player::PlayerRecord;
use crate::repository::traits::PlayerRepository;

const BUNDLED_DATASET: &str = include_str!("../../data/players.json");

/// Read-only player dataset, parsed once up front.
#[derive(Clone, Debug)]
pub struct FilePlayerRepository {
    players: Vec<PlayerRecord>,
}

impl FilePlayerRepository {
    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATASET).context("Failed to parse bundled player dataset")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open dataset {}", path.display()))?;
        let reader = BufReader::new(file);
        let players: Vec<PlayerRecord> = serde_json::from_reader(reader)
            .with_context(|| format!("Could not parse dataset {}", path.display()))?;
        Ok(Self::from_records(players))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let players: Vec<PlayerRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(players))
    }

    fn from_records(mut players: Vec<PlayerRecord>) -> Self {
        for (index, player) in players.iter_mut().enumerate() {
            player.id = index;
        }
        debug!(count = players.len(), "loaded player dataset");
        FilePlayerRepository { players }
    }
}

impl PlayerRepository for FilePlayerRepository {
    fn list(&self) -> Result<Vec<PlayerRecord>> {
        Ok(self.players.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::Position;
    use crate::model::stat::StatKey;

    #[test]
    fn test_bundled_dataset_loads() {
        let repo = FilePlayerRepository::bundled().unwrap();
        let players = repo.list().unwrap();

        assert!(!players.is_empty());
        for (index, player) in players.iter().enumerate() {
            assert_eq!(player.id, index);
            assert!(!player.name.is_empty());
        }
        assert!(players.iter().any(|p| p.position == Position::Goalie));
        assert!(players.iter().all(|p| p.stat(StatKey::TotalTimeOnIce) > 0.0));
    }

    #[test]
    fn test_list_returns_independent_copies() {
        let repo = FilePlayerRepository::bundled().unwrap();
        let mut first = repo.list().unwrap();
        first[0].goals = -1.0;

        let second = repo.list().unwrap();
        assert_ne!(second[0].goals, -1.0);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = FilePlayerRepository::from_path(Path::new("/nonexistent/players.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        assert!(FilePlayerRepository::from_json("{\"name\": \"x\"}").is_err());
        assert!(FilePlayerRepository::from_json("[]").unwrap().list().unwrap().is_empty());
    }
}
