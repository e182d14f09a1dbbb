use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::model::stat::{StatKey, StatLine};
use crate::time::Clock;

pub const HEADSHOT_DIR: &str = "headshots";
pub const FALLBACK_HEADSHOT: &str = "headshots/default.png";

/// Position in the dataset's index. Assigned once at load time.
pub type PlayerId = usize;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Position {
    LeftWing,
    Center,
    RightWing,
    Defense,
    Goalie,
}

impl Position {
    /// Skater positions, in the order the ranking filter lists them.
    pub const SKATERS: [Position; 4] = [
        Position::LeftWing,
        Position::Center,
        Position::RightWing,
        Position::Defense,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Position::LeftWing => "LW",
            Position::Center => "C",
            Position::RightWing => "RW",
            Position::Defense => "D",
            Position::Goalie => "G",
        }
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "LW" => Ok(Position::LeftWing),
            "C" => Ok(Position::Center),
            "RW" => Ok(Position::RightWing),
            "D" => Ok(Position::Defense),
            "G" | "GOALIE" => Ok(Position::Goalie),
            _ => Err(anyhow!("Unknown position: '{}'", s)),
        }
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse().map_err(|e: anyhow::Error| e.to_string())
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.code().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One skater or goalie season line, field names as in the bundled JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    #[serde(skip)]
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: Position,
    #[serde(default)]
    pub img: String,

    #[serde(deserialize_with = "lenient_number")]
    pub goals: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub assists: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub points: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub plus_minus: f64,
    // Some sources ship these two as numeric strings.
    #[serde(deserialize_with = "lenient_number")]
    pub penalty_minutes: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub powerplay_goals: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub powerplay_points: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub shorthanded_goals: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub shorthanded_points: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub game_winning_goals: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub shots_on_goal: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub shooting_percentage: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub faceoffs_won: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub hits: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub blocks: f64,
    pub time_on_ice_per_game: Clock,
    pub total_time_on_ice: Clock,

    // Carried by the dataset, never shown or aggregated.
    #[serde(default, deserialize_with = "lenient_number")]
    pub powerplay_assists: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub shorthanded_assists: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub faceoffs_lost: f64,
}

impl PlayerRecord {
    /// Numeric value of a statistic. Clocks are returned as total seconds.
    pub fn stat(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Goals => self.goals,
            StatKey::Assists => self.assists,
            StatKey::Points => self.points,
            StatKey::PlusMinus => self.plus_minus,
            StatKey::PenaltyMinutes => self.penalty_minutes,
            StatKey::PowerplayGoals => self.powerplay_goals,
            StatKey::PowerplayPoints => self.powerplay_points,
            StatKey::ShorthandedGoals => self.shorthanded_goals,
            StatKey::ShorthandedPoints => self.shorthanded_points,
            StatKey::GameWinningGoals => self.game_winning_goals,
            StatKey::ShotsOnGoal => self.shots_on_goal,
            StatKey::ShootingPercentage => self.shooting_percentage,
            StatKey::FaceoffsWon => self.faceoffs_won,
            StatKey::Hits => self.hits,
            StatKey::Blocks => self.blocks,
            StatKey::TimeOnIcePerGame => self.time_on_ice_per_game.total_seconds() as f64,
            StatKey::TotalTimeOnIce => self.total_time_on_ice.total_seconds() as f64,
        }
    }

    pub fn clock(&self, key: StatKey) -> Option<Clock> {
        match key {
            StatKey::TimeOnIcePerGame => Some(self.time_on_ice_per_game),
            StatKey::TotalTimeOnIce => Some(self.total_time_on_ice),
            _ => None,
        }
    }

    pub fn stat_line(&self) -> StatLine {
        let mut line = StatLine::default();
        for key in StatKey::ALL {
            line.set(key, self.stat(key));
        }
        line
    }

    pub fn is_goalie(&self) -> bool {
        self.position == Position::Goalie
    }

    pub fn headshot_path(&self) -> String {
        if self.img.is_empty() {
            return FALLBACK_HEADSHOT.to_string();
        }
        format!("{}/{}/{}", HEADSHOT_DIR, self.team, self.img)
    }
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite());
    Ok(number.unwrap_or_else(|| {
        warn!(value = %value, "non-numeric statistic, using 0");
        0.0
    }))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A skater with every statistic zeroed. Tests fill in what they need.
    pub fn skater(name: &str, position: Position) -> PlayerRecord {
        PlayerRecord {
            id: 0,
            name: name.to_string(),
            team: "TST".to_string(),
            position,
            img: String::new(),
            goals: 0.0,
            assists: 0.0,
            points: 0.0,
            plus_minus: 0.0,
            penalty_minutes: 0.0,
            powerplay_goals: 0.0,
            powerplay_points: 0.0,
            shorthanded_goals: 0.0,
            shorthanded_points: 0.0,
            game_winning_goals: 0.0,
            shots_on_goal: 0.0,
            shooting_percentage: 0.0,
            faceoffs_won: 0.0,
            hits: 0.0,
            blocks: 0.0,
            time_on_ice_per_game: Clock::default(),
            total_time_on_ice: Clock::default(),
            powerplay_assists: 0.0,
            shorthanded_assists: 0.0,
            faceoffs_lost: 0.0,
        }
    }
}
