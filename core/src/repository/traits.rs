use crate::model::player::PlayerRecord;
use anyhow::Result;

pub trait PlayerRepository {
    /// Every record in dataset order, each with its `id` set.
    fn list(&self) -> Result<Vec<PlayerRecord>>;
}
