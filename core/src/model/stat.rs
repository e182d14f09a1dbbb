use serde::{Deserialize, Serialize};

pub const STAT_COUNT: usize = 17;

/// Every statistic a player record carries, in display order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    Goals,
    Assists,
    Points,
    PlusMinus,
    PenaltyMinutes,
    PowerplayGoals,
    PowerplayPoints,
    ShorthandedGoals,
    ShorthandedPoints,
    GameWinningGoals,
    ShotsOnGoal,
    ShootingPercentage,
    FaceoffsWon,
    Hits,
    Blocks,
    TimeOnIcePerGame,
    TotalTimeOnIce,
}

impl StatKey {
    pub const ALL: [StatKey; STAT_COUNT] = [
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
        StatKey::TotalTimeOnIce,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn short_form(self) -> &'static str {
        match self {
            StatKey::Goals => "G",
            StatKey::Assists => "A",
            StatKey::Points => "PTS",
            StatKey::PlusMinus => "+/-",
            StatKey::PenaltyMinutes => "PIM",
            StatKey::PowerplayGoals => "PPG",
            StatKey::PowerplayPoints => "PPP",
            StatKey::ShorthandedGoals => "SHG",
            StatKey::ShorthandedPoints => "SHP",
            StatKey::GameWinningGoals => "GWG",
            StatKey::ShotsOnGoal => "SOG",
            StatKey::ShootingPercentage => "S%",
            StatKey::FaceoffsWon => "FW",
            StatKey::Hits => "HIT",
            StatKey::Blocks => "BLK",
            StatKey::TimeOnIcePerGame => "TOI/GP",
            StatKey::TotalTimeOnIce => "TOI",
        }
    }

    /// The JSON field name in the dataset.
    pub fn long_form(self) -> &'static str {
        match self {
            StatKey::Goals => "goals",
            StatKey::Assists => "assists",
            StatKey::Points => "points",
            StatKey::PlusMinus => "plusMinus",
            StatKey::PenaltyMinutes => "penaltyMinutes",
            StatKey::PowerplayGoals => "powerplayGoals",
            StatKey::PowerplayPoints => "powerplayPoints",
            StatKey::ShorthandedGoals => "shorthandedGoals",
            StatKey::ShorthandedPoints => "shorthandedPoints",
            StatKey::GameWinningGoals => "gameWinningGoals",
            StatKey::ShotsOnGoal => "shotsOnGoal",
            StatKey::ShootingPercentage => "shootingPercentage",
            StatKey::FaceoffsWon => "faceoffsWon",
            StatKey::Hits => "hits",
            StatKey::Blocks => "blocks",
            StatKey::TimeOnIcePerGame => "timeOnIcePerGame",
            StatKey::TotalTimeOnIce => "totalTimeOnIce",
        }
    }

    /// Human readable name, e.g. "Plus Minus" for `plusMinus`.
    pub fn label(self) -> String {
        let mut label = String::new();
        for (i, c) in self.long_form().chars().enumerate() {
            if i == 0 {
                label.extend(c.to_uppercase());
            } else if c.is_ascii_uppercase() {
                label.push(' ');
                label.push(c);
            } else {
                label.push(c);
            }
        }
        label
    }

    pub fn is_clock(self) -> bool {
        matches!(self, StatKey::TimeOnIcePerGame | StatKey::TotalTimeOnIce)
    }
}

/// One value per statistic, indexed by `StatKey`. Clock statistics are held
/// as total seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatLine {
    values: [f64; STAT_COUNT],
}

impl StatLine {
    pub fn get(&self, key: StatKey) -> f64 {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        self.values[key.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        StatKey::ALL.iter().map(move |&key| (key, self.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, key) in StatKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(StatKey::Goals.label(), "Goals");
        assert_eq!(StatKey::PlusMinus.label(), "Plus Minus");
        assert_eq!(StatKey::TimeOnIcePerGame.label(), "Time On Ice Per Game");
    }

    #[test]
    fn test_stat_line() {
        let mut line = StatLine::default();
        line.set(StatKey::Hits, 12.0);
        assert_eq!(line.get(StatKey::Hits), 12.0);
        assert_eq!(line.get(StatKey::Goals), 0.0);
        assert_eq!(line.iter().count(), STAT_COUNT);
    }
}
