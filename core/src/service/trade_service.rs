use std::collections::HashSet;

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::player::PlayerRecord;
use crate::model::stat::StatKey;
use crate::service::dto::{
    AggregateMode, ChartSeries, Edge, Entry, SeriesKind, Side, StatComparison, TeamStats,
};

/// Statistics compared in a trade, in chart order. Total time on ice is not
/// part of the comparison.
pub const TRADE_STATS: [StatKey; 16] = [
    StatKey::Goals,
    StatKey::Assists,
    StatKey::Points,
    StatKey::PlusMinus,
    StatKey::PenaltyMinutes,
    StatKey::PowerplayGoals,
    StatKey::PowerplayPoints,
    StatKey::ShorthandedGoals,
    StatKey::ShorthandedPoints,
    StatKey::GameWinningGoals,
    StatKey::ShotsOnGoal,
    StatKey::ShootingPercentage,
    StatKey::FaceoffsWon,
    StatKey::Hits,
    StatKey::Blocks,
    StatKey::TimeOnIcePerGame,
];

const TOTAL_OPACITY: f64 = 0.5;
const PLAYER_OPACITY: f64 = 0.3;
const PLAYER_OPACITY_STEP: f64 = 0.2;

/// Two sides of a proposed trade. Nothing stops the same player from being
/// on both sides.
#[derive(Debug, Clone, Default)]
pub struct TradeBoard {
    side_a: Vec<Entry>,
    side_b: Vec<Entry>,
    hidden: HashSet<String>,
}

impl TradeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, side: Side, player: PlayerRecord) -> Uuid {
        let entry = Entry::new(player);
        let id = entry.id;
        self.side_mut(side).push(entry);
        id
    }

    pub fn remove(&mut self, side: Side, id: &Uuid) -> Result<PlayerRecord> {
        let entries = self.side_mut(side);
        let pos = entries
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| anyhow!("{} has no entry {}", side, id))?;
        let removed = entries.remove(pos);
        self.hidden.remove(&removed.id.to_string());
        Ok(removed.player)
    }

    pub fn entries(&self, side: Side) -> &[Entry] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<Entry> {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    pub fn stats(&self, side: Side, mode: AggregateMode) -> TeamStats {
        let players: Vec<&PlayerRecord> = self.entries(side).iter().map(|e| &e.player).collect();
        team_stats(&players, mode)
    }

    pub fn compare(&self, mode: AggregateMode) -> Vec<StatComparison> {
        let a = self.stats(Side::A, mode);
        let b = self.stats(Side::B, mode);

        TRADE_STATS
            .iter()
            .map(|&key| {
                let (side_a, side_b) = (a.get(key), b.get(key));
                let edge = if side_a > side_b {
                    Edge::SideA
                } else if side_b > side_a {
                    Edge::SideB
                } else {
                    Edge::Even
                };
                StatComparison { key, side_a, side_b, edge }
            })
            .collect()
    }

    /// Bar series for the chart: each side's total followed by one faded
    /// series per player on that side.
    pub fn chart(&self, mode: AggregateMode) -> Vec<ChartSeries> {
        let mut series = Vec::new();

        for side in [Side::A, Side::B] {
            let total_key = format!("{} Total", side);
            series.push(ChartSeries {
                visible: !self.hidden.contains(&total_key),
                key: total_key.clone(),
                label: total_key,
                side,
                kind: SeriesKind::SideTotal,
                opacity: TOTAL_OPACITY,
                stack: None,
                values: values_of(&self.stats(side, mode)),
            });

            for (index, entry) in self.entries(side).iter().enumerate() {
                let key = entry.id.to_string();
                let solo = team_stats(&[&entry.player], AggregateMode::Total);
                series.push(ChartSeries {
                    visible: !self.hidden.contains(&key),
                    key,
                    label: entry.player.name.clone(),
                    side,
                    kind: SeriesKind::Player,
                    opacity: (PLAYER_OPACITY - index as f64 * PLAYER_OPACITY_STEP).max(0.0),
                    stack: Some(stack_name(side)),
                    values: values_of(&solo),
                });
            }
        }
        series
    }

    /// Legend click: hides or shows a series. Returns whether it is now visible.
    pub fn toggle_series(&mut self, key: &str) -> bool {
        if self.hidden.remove(key) {
            true
        } else {
            self.hidden.insert(key.to_string());
            false
        }
    }
}

fn stack_name(side: Side) -> String {
    match side {
        Side::A => "stack_team1".to_string(),
        Side::B => "stack_team2".to_string(),
    }
}

fn values_of(stats: &TeamStats) -> Vec<f64> {
    TRADE_STATS.iter().map(|&key| stats.get(key)).collect()
}

/// Per-side statistics for a trade.
///
/// Counting stats are summed, then divided by the side size in average mode.
/// Shooting percentage is always recomputed from the aggregated goals and
/// shots. Time on ice per game is the mean of each player's whole minutes,
/// seconds dropped, in either mode.
pub fn team_stats(players: &[&PlayerRecord], mode: AggregateMode) -> TeamStats {
    let count = players.len() as f64;
    let average = mode == AggregateMode::Average && !players.is_empty();

    let sum = |key: StatKey| players.iter().map(|p| p.stat(key)).sum::<f64>();
    let scale = |total: f64| if average { total / count } else { total };

    let goals = scale(sum(StatKey::Goals));
    let shots = scale(sum(StatKey::ShotsOnGoal));
    let shooting = if shots > 0.0 { round_to(goals / shots * 100.0, 4) } else { 0.0 };

    let toi = if players.is_empty() {
        0.0
    } else {
        let minutes: f64 = players.iter().map(|p| p.time_on_ice_per_game.minutes as f64).sum();
        round_to(minutes / count, 2)
    };

    let values = TRADE_STATS
        .iter()
        .map(|&key| {
            let value = match key {
                StatKey::ShootingPercentage => shooting,
                StatKey::TimeOnIcePerGame => toi,
                _ => scale(sum(key)),
            };
            (key, value)
        })
        .collect();

    TeamStats { values }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::fixtures::skater;
    use crate::model::player::Position;
    use crate::time::Clock;

    fn player(name: &str, goals: f64, shots: f64, toi: Clock) -> PlayerRecord {
        let mut p = skater(name, Position::RightWing);
        p.goals = goals;
        p.shots_on_goal = shots;
        p.assists = goals / 2.0;
        p.hits = 10.0;
        p.shooting_percentage = 99.0;
        p.time_on_ice_per_game = toi;
        p
    }

    #[test]
    fn test_single_player_shooting_percentage() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("Shooter", 10.0, 50.0, Clock::new(18, 0)));

        let stats = board.stats(Side::A, AggregateMode::Total);
        assert_eq!(stats.get(StatKey::ShootingPercentage), 20.0);
        assert_eq!(stats.get(StatKey::Goals), 10.0);
    }

    #[test]
    fn test_shooting_percentage_is_recomputed_not_averaged() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("Volume", 30.0, 300.0, Clock::new(20, 0)));
        board.add(Side::A, player("Lucky", 2.0, 4.0, Clock::new(8, 0)));

        for mode in [AggregateMode::Total, AggregateMode::Average] {
            let stats = board.stats(Side::A, mode);
            // 32 / 304 * 100, not the mean of 10% and 50%
            assert_eq!(stats.get(StatKey::ShootingPercentage), 10.5263);
        }
    }

    #[test]
    fn test_zero_shots_and_empty_side() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("Stay At Home", 0.0, 0.0, Clock::new(19, 0)));

        let stats = board.stats(Side::A, AggregateMode::Average);
        assert_eq!(stats.get(StatKey::ShootingPercentage), 0.0);

        let empty = board.stats(Side::B, AggregateMode::Average);
        assert!(empty.values.iter().all(|(_, v)| *v == 0.0));
        assert_eq!(empty.values.len(), TRADE_STATS.len());
    }

    #[test]
    fn test_time_on_ice_truncates_seconds() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("A", 0.0, 0.0, Clock::new(18, 59)));
        board.add(Side::A, player("B", 0.0, 0.0, Clock::new(10, 30)));
        board.add(Side::A, player("C", 0.0, 0.0, Clock::new(11, 45)));

        // (18 + 10 + 11) / 3 = 13.0 in both modes
        assert_eq!(board.stats(Side::A, AggregateMode::Total).get(StatKey::TimeOnIcePerGame), 13.0);
        assert_eq!(board.stats(Side::A, AggregateMode::Average).get(StatKey::TimeOnIcePerGame), 13.0);

        board.add(Side::B, player("D", 0.0, 0.0, Clock::new(20, 0)));
        board.add(Side::B, player("E", 0.0, 0.0, Clock::new(15, 0)));
        board.add(Side::B, player("F", 0.0, 0.0, Clock::new(15, 0)));
        // 50 / 3 = 16.666.. -> 16.67
        assert_eq!(board.stats(Side::B, AggregateMode::Total).get(StatKey::TimeOnIcePerGame), 16.67);
    }

    #[test]
    fn test_average_divides_counting_stats() {
        let mut board = TradeBoard::new();
        board.add(Side::B, player("A", 10.0, 40.0, Clock::new(15, 0)));
        board.add(Side::B, player("B", 20.0, 60.0, Clock::new(15, 0)));

        let avg = board.stats(Side::B, AggregateMode::Average);
        assert_eq!(avg.get(StatKey::Goals), 15.0);
        assert_eq!(avg.get(StatKey::ShotsOnGoal), 50.0);
        assert_eq!(avg.get(StatKey::Hits), 10.0);

        let total = board.stats(Side::B, AggregateMode::Total);
        assert_eq!(total.get(StatKey::Hits), 20.0);
    }

    #[test]
    fn test_compare_marks_strictly_greater_side() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("A", 30.0, 200.0, Clock::new(19, 0)));
        board.add(Side::B, player("B", 12.0, 100.0, Clock::new(19, 0)));
        board.add(Side::B, player("C", 12.0, 100.0, Clock::new(19, 0)));

        let total = board.compare(AggregateMode::Total);
        let goals = total.iter().find(|c| c.key == StatKey::Goals).unwrap();
        assert_eq!(goals.edge, Edge::SideA);
        let hits = total.iter().find(|c| c.key == StatKey::Hits).unwrap();
        assert_eq!(hits.edge, Edge::SideB);
        let toi = total.iter().find(|c| c.key == StatKey::TimeOnIcePerGame).unwrap();
        assert_eq!(toi.edge, Edge::Even);

        let average = board.compare(AggregateMode::Average);
        let hits = average.iter().find(|c| c.key == StatKey::Hits).unwrap();
        assert_eq!(hits.edge, Edge::Even);
    }

    #[test]
    fn test_remove_and_re_add_restores_stats() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("A", 30.0, 200.0, Clock::new(19, 0)));
        let id = board.add(Side::A, player("B", 3.0, 20.0, Clock::new(12, 0)));
        let before = board.stats(Side::A, AggregateMode::Average);

        let removed = board.remove(Side::A, &id).unwrap();
        assert!(board.remove(Side::A, &id).is_err());
        board.add(Side::A, removed);
        assert_eq!(board.stats(Side::A, AggregateMode::Average), before);
    }

    #[test]
    fn test_remove_from_wrong_side_fails() {
        let mut board = TradeBoard::new();
        let id = board.add(Side::A, player("A", 1.0, 2.0, Clock::new(10, 0)));
        assert!(board.remove(Side::B, &id).is_err());
        assert_eq!(board.entries(Side::A).len(), 1);
    }

    #[test]
    fn test_chart_series_layout() {
        let mut board = TradeBoard::new();
        board.add(Side::A, player("A1", 10.0, 50.0, Clock::new(19, 0)));
        board.add(Side::A, player("A2", 5.0, 25.0, Clock::new(14, 0)));
        let b1 = board.add(Side::B, player("B1", 7.0, 70.0, Clock::new(16, 0)));

        let chart = board.chart(AggregateMode::Average);
        let labels: Vec<&str> = chart.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Team 1 Total", "A1", "A2", "Team 2 Total", "B1"]);

        assert_eq!(chart[0].kind, SeriesKind::SideTotal);
        assert_eq!(chart[0].opacity, 0.5);
        assert_eq!(chart[0].stack, None);
        assert_eq!(chart[0].values[0], 7.5);

        assert_eq!(chart[1].opacity, 0.3);
        assert_eq!(chart[2].opacity, 0.0_f64.max(0.3 - 0.2));
        assert_eq!(chart[1].stack.as_deref(), Some("stack_team1"));
        assert_eq!(chart[4].stack.as_deref(), Some("stack_team2"));
        // Player series always show the player's own totals.
        assert_eq!(chart[2].values[0], 5.0);
        assert!(chart.iter().all(|s| s.values.len() == TRADE_STATS.len()));

        let key = b1.to_string();
        assert!(!board.toggle_series(&key));
        let chart = board.chart(AggregateMode::Average);
        assert!(!chart[4].visible);
        assert!(chart[0].visible);
        assert!(board.toggle_series(&key));
        assert!(board.chart(AggregateMode::Total)[4].visible);
    }
}
