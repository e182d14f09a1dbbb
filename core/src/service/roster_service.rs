use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::player::PlayerRecord;
use crate::model::stat::StatKey;
use crate::service::dto::{AggregateMode, AggregateValue, DistributionPoint, Entry, RosterSummary};
use crate::time::Clock;

/// A user-built team. The same player may appear more than once; every
/// membership has its own entry id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<Entry>,
    charts: Vec<StatKey>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player: PlayerRecord) -> Uuid {
        let entry = Entry::new(player);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub fn remove(&mut self, id: &Uuid) -> Result<PlayerRecord> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| anyhow!("Roster entry {} not found", id))?;
        Ok(self.entries.remove(pos).player)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self, mode: AggregateMode) -> RosterSummary {
        let players: Vec<&PlayerRecord> = self.entries.iter().map(|e| &e.player).collect();
        summarize(&players, mode)
    }

    /// Flips the distribution chart for `key`; returns whether it is now shown.
    pub fn toggle_chart(&mut self, key: StatKey) -> bool {
        if self.is_charted(key) {
            self.charts.retain(|k| *k != key);
            false
        } else {
            self.charts.push(key);
            true
        }
    }

    /// Turns the distribution chart for `key` on; a no-op when already shown.
    pub fn show_chart(&mut self, key: StatKey) {
        if !self.is_charted(key) {
            self.charts.push(key);
        }
    }

    pub fn is_charted(&self, key: StatKey) -> bool {
        self.charts.contains(&key)
    }

    pub fn charted(&self) -> &[StatKey] {
        &self.charts
    }

    /// Every roster member's value for one statistic, clocks in seconds.
    pub fn distribution(&self, key: StatKey) -> Vec<DistributionPoint> {
        self.entries
            .iter()
            .map(|e| DistributionPoint {
                name: e.player.name.clone(),
                value: e.player.stat(key),
            })
            .collect()
    }
}

/// Sum or mean of every statistic over `players`.
///
/// Clock statistics add minutes and seconds in separate columns. The mean
/// divides each column by the player count (flooring both) and only then
/// carries seconds into minutes, so it is not the mean of total seconds.
pub fn summarize(players: &[&PlayerRecord], mode: AggregateMode) -> RosterSummary {
    let count = players.len();
    let values = StatKey::ALL
        .iter()
        .map(|&key| {
            let value = if key.is_clock() {
                AggregateValue::Clock(aggregate_clock(players, key, mode))
            } else {
                AggregateValue::Number(aggregate_number(players, key, mode))
            };
            (key, value)
        })
        .collect();

    RosterSummary { mode, count, values }
}

fn aggregate_number(players: &[&PlayerRecord], key: StatKey, mode: AggregateMode) -> f64 {
    let total: f64 = players.iter().map(|p| p.stat(key)).sum();
    match mode {
        AggregateMode::Total => total,
        AggregateMode::Average if players.is_empty() => 0.0,
        AggregateMode::Average => total / players.len() as f64,
    }
}

fn aggregate_clock(players: &[&PlayerRecord], key: StatKey, mode: AggregateMode) -> Clock {
    let (minutes, seconds) = players
        .iter()
        .filter_map(|p| p.clock(key))
        .fold((0u64, 0u64), |(m, s), c| {
            (m.saturating_add(c.minutes), s.saturating_add(c.seconds))
        });

    match mode {
        AggregateMode::Total => Clock::carried(minutes, seconds),
        AggregateMode::Average if players.is_empty() => Clock::default(),
        AggregateMode::Average => {
            let n = players.len() as u64;
            Clock::carried(minutes / n, seconds / n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::player::fixtures::skater;
    use crate::model::player::Position;

    fn player(name: &str, goals: f64, hits: f64, toi: Clock) -> PlayerRecord {
        let mut p = skater(name, Position::Center);
        p.goals = goals;
        p.hits = hits;
        p.penalty_minutes = goals * 2.0;
        p.time_on_ice_per_game = toi;
        p.total_time_on_ice = Clock::new(toi.minutes * 82, toi.seconds * 82);
        p
    }

    fn clock_of(summary: &RosterSummary, key: StatKey) -> String {
        summary.get(key).unwrap().to_string()
    }

    #[test]
    fn test_average_clock_floors_columns_before_carry() {
        let mut roster = Roster::new();
        roster.add(player("First", 10.0, 5.0, Clock::new(18, 45)));
        roster.add(player("Second", 3.0, 9.0, Clock::new(10, 30)));

        let average = roster.summary(AggregateMode::Average);
        assert_eq!(clock_of(&average, StatKey::TimeOnIcePerGame), "14:37");

        let total = roster.summary(AggregateMode::Total);
        assert_eq!(clock_of(&total, StatKey::TimeOnIcePerGame), "29:15");
    }

    #[test]
    fn test_average_clock_carries_large_seconds() {
        let mut roster = Roster::new();
        roster.add(player("A", 0.0, 0.0, Clock::new(0, 150)));
        roster.add(player("B", 0.0, 0.0, Clock::new(1, 0)));

        // minutes 1/2 -> 0, seconds 150/2 -> 75 -> 1:15
        let average = roster.summary(AggregateMode::Average);
        assert_eq!(clock_of(&average, StatKey::TimeOnIcePerGame), "1:15");
    }

    #[test]
    fn test_sum_equals_mean_times_count() {
        let mut roster = Roster::new();
        roster.add(player("A", 10.0, 33.0, Clock::new(20, 1)));
        roster.add(player("B", 7.0, 41.0, Clock::new(15, 59)));
        roster.add(player("C", 1.0, 120.0, Clock::new(12, 12)));

        let total = roster.summary(AggregateMode::Total);
        let average = roster.summary(AggregateMode::Average);
        assert_eq!(total.count, 3);

        for key in StatKey::ALL.iter().filter(|k| !k.is_clock()) {
            let sum = total.get(*key).and_then(|v| v.as_number()).unwrap();
            let mean = average.get(*key).and_then(|v| v.as_number()).unwrap();
            assert!((sum - mean * 3.0).abs() < 1e-9, "{:?}", key);
        }
    }

    #[test]
    fn test_oversized_clocks_saturate() {
        let mut roster = Roster::new();
        let mut giant = skater("Giant", Position::Defense);
        giant.time_on_ice_per_game = Clock::new(u64::MAX - 1, 59);
        roster.add(giant.clone());
        roster.add(giant);

        let total = roster.summary(AggregateMode::Total);
        match total.get(StatKey::TimeOnIcePerGame) {
            Some(AggregateValue::Clock(c)) => assert_eq!(c.minutes, u64::MAX),
            other => panic!("expected a clock, got {:?}", other),
        }
        let average = roster.summary(AggregateMode::Average);
        assert!(average.get(StatKey::TotalTimeOnIce).is_some());
    }

    #[test]
    fn test_empty_roster_is_all_zero() {
        let roster = Roster::new();
        for mode in [AggregateMode::Average, AggregateMode::Total] {
            let summary = roster.summary(mode);
            assert_eq!(summary.count, 0);
            for (key, value) in &summary.values {
                match value {
                    AggregateValue::Number(n) => assert_eq!(*n, 0.0, "{:?}", key),
                    AggregateValue::Clock(c) => assert_eq!(*c, Clock::default()),
                }
            }
        }
    }

    #[test]
    fn test_remove_by_entry_keeps_duplicates() {
        let mut roster = Roster::new();
        let star = player("Star", 40.0, 10.0, Clock::new(21, 0));
        let first = roster.add(star.clone());
        let second = roster.add(star.clone());
        assert_ne!(first, second);

        let removed = roster.remove(&first).unwrap();
        assert_eq!(removed.name, "Star");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.entries()[0].id, second);

        assert!(roster.remove(&first).is_err());
    }

    #[test]
    fn test_remove_then_re_add_restores_aggregates() {
        let mut roster = Roster::new();
        let a = player("A", 12.0, 80.0, Clock::new(17, 40));
        let b = player("B", 30.0, 15.0, Clock::new(22, 5));
        roster.add(a.clone());
        let b_id = roster.add(b.clone());
        roster.add(player("C", 4.0, 200.0, Clock::new(9, 55)));

        let before_avg = roster.summary(AggregateMode::Average);
        let before_total = roster.summary(AggregateMode::Total);

        let removed = roster.remove(&b_id).unwrap();
        assert_ne!(roster.summary(AggregateMode::Total), before_total);
        roster.add(removed);

        assert_eq!(roster.summary(AggregateMode::Average), before_avg);
        assert_eq!(roster.summary(AggregateMode::Total), before_total);
    }

    #[test]
    fn test_chart_toggle_and_distribution() {
        let mut roster = Roster::new();
        roster.add(player("A", 5.0, 1.0, Clock::new(18, 45)));
        roster.add(player("B", 9.0, 2.0, Clock::new(10, 30)));

        assert!(roster.toggle_chart(StatKey::Goals));
        assert!(roster.toggle_chart(StatKey::TimeOnIcePerGame));
        assert_eq!(roster.charted(), &[StatKey::Goals, StatKey::TimeOnIcePerGame]);
        assert!(!roster.toggle_chart(StatKey::Goals));
        assert!(!roster.is_charted(StatKey::Goals));

        let toi: Vec<f64> = roster
            .distribution(StatKey::TimeOnIcePerGame)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(toi, vec![1125.0, 630.0]);

        roster.show_chart(StatKey::Hits);
        roster.show_chart(StatKey::Hits);
        assert_eq!(roster.charted(), &[StatKey::TimeOnIcePerGame, StatKey::Hits]);

        let goals = roster.distribution(StatKey::Goals);
        assert_eq!(goals[1].name, "B");
        assert_eq!(goals[1].value, 9.0);
    }
}
