use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::player::PlayerRecord;
use crate::model::stat::{StatKey, StatLine};
use crate::time::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AggregateMode {
    Total,
    #[default]
    Average,
}

impl AggregateMode {
    pub fn toggled(self) -> Self {
        match self {
            AggregateMode::Total => AggregateMode::Average,
            AggregateMode::Average => AggregateMode::Total,
        }
    }
}

impl fmt::Display for AggregateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateMode::Total => f.write_str("Total Stats"),
            AggregateMode::Average => f.write_str("Average Stats"),
        }
    }
}

/// One ranking row. `values` are the numbers the score was computed from,
/// so they are normalized when the ranking ran in min-max mode.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub record: PlayerRecord,
    pub values: StatLine,
    pub score: f64,
    /// Where the player sits in the skater pool for each statistic, 0 (pool
    /// minimum) to 1 (pool maximum), whatever the scoring mode.
    pub standing: StatLine,
}

/// A player's membership in a roster or trade side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub player: PlayerRecord,
}

impl Entry {
    pub fn new(player: PlayerRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AggregateValue {
    Number(f64),
    Clock(Clock),
}

impl AggregateValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AggregateValue::Number(n) => Some(*n),
            AggregateValue::Clock(_) => None,
        }
    }
}

impl fmt::Display for AggregateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateValue::Number(n) => write!(f, "{:.2}", n),
            AggregateValue::Clock(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub mode: AggregateMode,
    pub count: usize,
    pub values: Vec<(StatKey, AggregateValue)>,
}

impl RosterSummary {
    pub fn get(&self, key: StatKey) -> Option<AggregateValue> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// One slice of a single-statistic distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("Team 1"),
            Side::B => f.write_str("Team 2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub values: Vec<(StatKey, f64)>,
}

impl TeamStats {
    pub fn get(&self, key: StatKey) -> f64 {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

/// Which side holds the strictly larger value for a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    SideA,
    SideB,
    Even,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatComparison {
    pub key: StatKey,
    pub side_a: f64,
    pub side_b: f64,
    pub edge: Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    SideTotal,
    Player,
}

/// A bar series in the trade chart, one value per team statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Stable handle for legend toggling: the side label for totals, the
    /// entry id for players.
    pub key: String,
    pub label: String,
    pub side: Side,
    pub kind: SeriesKind,
    pub opacity: f64,
    pub stack: Option<String>,
    pub values: Vec<f64>,
    pub visible: bool,
}
