pub mod player;
pub mod stat;

pub use player::{PlayerId, PlayerRecord, Position};
pub use stat::{StatKey, StatLine, STAT_COUNT};
