use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use crate::model::player::{PlayerRecord, Position};
use crate::model::stat::{StatKey, StatLine};
use crate::repository::PlayerRepository;
use crate::service::dto::RankedPlayer;
use crate::time::format_seconds;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 5;
pub const DEFAULT_TOP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightMode {
    /// Slider multipliers, 1 to 5.
    #[default]
    Manual,
    /// Usage-rate weights derived from the dataset.
    Default,
}

/// Manual multipliers plus the statistics they have selected.
///
/// A statistic is selected as soon as its multiplier goes above 1 and drops
/// out again when it comes back down to 1. Selection keeps the order in
/// which statistics were first raised.
#[derive(Debug, Clone, Default)]
pub struct StatWeights {
    manual: HashMap<StatKey, u8>,
    selected: Vec<StatKey>,
}

impl StatWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a multiplier, clamped to 1..=5, and returns the stored value.
    pub fn set(&mut self, key: StatKey, weight: u8) -> u8 {
        let weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self.manual.insert(key, weight);

        if weight > MIN_WEIGHT {
            if !self.selected.contains(&key) {
                self.selected.push(key);
            }
        } else {
            self.selected.retain(|s| *s != key);
        }
        weight
    }

    pub fn increment(&mut self, key: StatKey) -> u8 {
        self.set(key, self.manual(key).saturating_add(1))
    }

    pub fn decrement(&mut self, key: StatKey) -> u8 {
        self.set(key, self.manual(key).saturating_sub(1))
    }

    pub fn manual(&self, key: StatKey) -> u8 {
        self.manual.get(&key).copied().unwrap_or(MIN_WEIGHT)
    }

    pub fn selected(&self) -> &[StatKey] {
        &self.selected
    }

    pub fn is_selected(&self, key: StatKey) -> bool {
        self.selected.contains(&key)
    }
}

#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub weight_mode: WeightMode,
    pub min_max: bool,
    pub positions: Vec<Position>,
    pub top: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            weight_mode: WeightMode::default(),
            min_max: false,
            positions: Position::SKATERS.to_vec(),
            top: DEFAULT_TOP,
        }
    }
}

impl RankingOptions {
    pub fn toggle_position(&mut self, position: Position) {
        if self.positions.contains(&position) {
            self.positions.retain(|p| *p != position);
        } else {
            self.positions.push(position);
        }
    }
}

/// Weighted ranking over the skaters of a dataset.
///
/// Holds its own copy of the records, raw and min-max normalized, so
/// rescaling never touches the repository's data.
pub struct RankingService {
    skaters: Vec<PlayerRecord>,
    raw: Vec<StatLine>,
    normalized: Vec<StatLine>,
    default_weights: StatLine,
}

impl RankingService {
    pub fn new<R: PlayerRepository>(repo: &R) -> Result<Self> {
        Ok(Self::from_players(repo.list()?))
    }

    pub fn from_players(players: Vec<PlayerRecord>) -> Self {
        let skaters: Vec<PlayerRecord> = players.into_iter().filter(|p| !p.is_goalie()).collect();
        let raw: Vec<StatLine> = skaters.iter().map(|p| p.stat_line()).collect();
        let normalized = min_max_normalize(&raw);
        let default_weights = default_weights(&raw);

        Self {
            skaters,
            raw,
            normalized,
            default_weights,
        }
    }

    pub fn skaters(&self) -> &[PlayerRecord] {
        &self.skaters
    }

    pub fn default_weight(&self, key: StatKey) -> f64 {
        self.default_weights.get(key)
    }

    /// The multiplier applied to `key` under `mode`.
    pub fn weight(&self, key: StatKey, weights: &StatWeights, mode: WeightMode) -> f64 {
        match mode {
            WeightMode::Manual => weights.manual(key) as f64,
            WeightMode::Default => self.default_weight(key),
        }
    }

    pub fn rank(&self, weights: &StatWeights, options: &RankingOptions) -> Vec<RankedPlayer> {
        let lines = if options.min_max { &self.normalized } else { &self.raw };

        let mut ranked: Vec<RankedPlayer> = self
            .skaters
            .iter()
            .zip(lines.iter().zip(self.normalized.iter()))
            .filter(|(player, _)| options.positions.contains(&player.position))
            .map(|(player, (line, standing))| RankedPlayer {
                record: player.clone(),
                values: *line,
                score: self.score(line, weights, options.weight_mode),
                standing: *standing,
            })
            .collect();

        // Vec::sort_by is stable, so equal scores keep dataset order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(options.top);

        debug!(
            selected = weights.selected().len(),
            min_max = options.min_max,
            results = ranked.len(),
            "ranked skaters"
        );
        ranked
    }

    fn score(&self, line: &StatLine, weights: &StatWeights, mode: WeightMode) -> f64 {
        weights
            .selected()
            .iter()
            .map(|&key| line.get(key) * self.weight(key, weights, mode))
            .sum()
    }
}

/// Per-statistic usage rate: league total of the statistic divided by league
/// total time on ice in seconds. Zero when there is no ice time at all.
pub fn default_weights(lines: &[StatLine]) -> StatLine {
    let total_toi: f64 = lines.iter().map(|l| l.get(StatKey::TotalTimeOnIce)).sum();
    let mut weights = StatLine::default();

    if total_toi == 0.0 {
        return weights;
    }
    for key in StatKey::ALL {
        let total: f64 = lines.iter().map(|l| l.get(key)).sum();
        weights.set(key, total / total_toi);
    }
    weights
}

/// Rescales every statistic to [0, 1] using the observed min and max of
/// that statistic. A statistic with no spread maps to 0.
pub fn min_max_normalize(lines: &[StatLine]) -> Vec<StatLine> {
    let mut normalized = lines.to_vec();

    for key in StatKey::ALL {
        let min = lines.iter().map(|l| l.get(key)).fold(f64::INFINITY, f64::min);
        let max = lines.iter().map(|l| l.get(key)).fold(f64::NEG_INFINITY, f64::max);
        let spread = max - min;

        for line in normalized.iter_mut() {
            let value = if spread > 0.0 { (line.get(key) - min) / spread } else { 0.0 };
            line.set(key, value);
        }
    }
    normalized
}

/// Display form of a ranking value: clocks as `M:SS` unless normalized,
/// fractions to four places.
pub fn format_value(key: StatKey, value: f64, min_max: bool) -> String {
    if key.is_clock() && !min_max {
        return format_seconds(value.round() as i64);
    }
    if value > 0.0 && value < 1.0 {
        return format!("{:.4}", value);
    }
    format!("{}", value)
}
