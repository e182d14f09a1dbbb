mod report;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use puck_core::service::ranking_service::DEFAULT_TOP;
use puck_core::{
    expand_key, parse_weight_args, resolve, suggest, AggregateMode, FilePlayerRepository,
    PlayerRepository, Position, RankingOptions, RankingService, Roster, Side, StatWeights,
    TradeBoard, WeightMode,
};
use tracing::{debug, warn, Level};

#[derive(Parser)]
#[command(name = "puck")]
#[command(about = "Fantasy hockey rankings, rosters and trade analysis", long_about = None)]
struct Cli {
    /// Load players from this JSON file instead of the bundled dataset
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank skaters by weighted stats (usage: rank G:3 PTS:5 --positions C,LW)
    Rank {
        /// Stat weights as KEY:WEIGHT, weight 1-5. A weight above 1 selects the stat.
        #[arg(allow_hyphen_values = true)]
        weights: Vec<String>,
        /// Use usage-rate weights derived from the dataset instead of the multipliers
        #[arg(long)]
        default_weights: bool,
        /// Rescale every stat to 0-1 before scoring
        #[arg(long)]
        min_max: bool,
        /// Positions to include (LW, C, RW, D)
        #[arg(long, value_delimiter = ',')]
        positions: Vec<String>,
        /// Number of players to show
        #[arg(long, default_value_t = DEFAULT_TOP)]
        top: usize,
        /// Show every statistic, not just the weighted ones
        #[arg(long)]
        all_stats: bool,
    },
    /// Build a roster and show its aggregate stats
    Roster {
        /// Player names (quote full names)
        #[arg(required = true)]
        names: Vec<String>,
        /// Show totals instead of averages
        #[arg(long)]
        total: bool,
        /// Show the per-player breakdown of a stat (repeatable)
        #[arg(long = "chart")]
        charts: Vec<String>,
    },
    /// Compare the two sides of a trade
    Trade {
        /// Players going out
        #[arg(long = "side-a", num_args = 1.., required = true)]
        side_a: Vec<String>,
        /// Players coming in
        #[arg(long = "side-b", num_args = 1.., required = true)]
        side_b: Vec<String>,
        /// Show per-player averages instead of totals
        #[arg(long)]
        average: bool,
    },
    /// Find players by name
    Search {
        query: Vec<String>,
    },
    /// Open the Terminal User Interface
    Tui,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_positions(raw: &[String]) -> Result<Vec<Position>> {
    if raw.is_empty() {
        return Ok(Position::SKATERS.to_vec());
    }
    raw.iter()
        .map(|p| {
            let position: Position = p.parse()?;
            if position == Position::Goalie {
                return Err(anyhow!("Goalies are not ranked"));
            }
            Ok(position)
        })
        .collect()
}

/// Builds the multipliers from `KEY:WEIGHT` arguments, clamping out-of-range
/// weights with a warning.
fn build_weights(args: &[String]) -> Result<StatWeights> {
    let mut weights = StatWeights::new();
    for (key, weight) in parse_weight_args(args)? {
        let stored = weights.set(key, weight);
        if stored != weight {
            warn!(stat = key.short_form(), requested = weight, stored, "weight clamped");
        }
    }
    Ok(weights)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal; log lines would tear the alternate screen.
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    if !interactive {
        init_logging(cli.verbose);
    }

    let repo = match &cli.data {
        Some(path) => FilePlayerRepository::from_path(path)?,
        None => FilePlayerRepository::bundled()?,
    };

    match cli.command {
        Some(Commands::Rank { weights, default_weights, min_max, positions, top, all_stats }) => {
            let service = RankingService::new(&repo)?;
            let stat_weights = build_weights(&weights)?;

            let options = RankingOptions {
                weight_mode: if default_weights { WeightMode::Default } else { WeightMode::Manual },
                min_max,
                positions: parse_positions(&positions)?,
                top,
            };
            debug!(?options, selected = ?stat_weights.selected(), "ranking request");

            let ranked = service.rank(&stat_weights, &options);
            report::show_ranking(&ranked, &service, &stat_weights, &options, all_stats);
        }
        Some(Commands::Roster { names, total, charts }) => {
            let players = repo.list()?;
            let mut roster = Roster::new();
            for name in &names {
                roster.add(resolve(&players, name)?.clone());
            }
            for chart in &charts {
                roster.show_chart(expand_key(chart)?);
            }

            let mode = if total { AggregateMode::Total } else { AggregateMode::Average };
            report::show_roster(&roster, mode);
        }
        Some(Commands::Trade { side_a, side_b, average }) => {
            let players = repo.list()?;
            let mut board = TradeBoard::new();
            for (side, names) in [(Side::A, &side_a), (Side::B, &side_b)] {
                for name in names {
                    board.add(side, resolve(&players, name)?.clone());
                }
            }

            let mode = if average { AggregateMode::Average } else { AggregateMode::Total };
            report::show_trade(&board, mode);
        }
        Some(Commands::Search { query }) => {
            let players = repo.list()?;
            let query = query.join(" ");
            report::show_search(&suggest(&players, &query));
        }
        Some(Commands::Tui) | None => {
            tui::run(&repo)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use puck_core::StatKey;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!(parse_positions(&[]).unwrap(), Position::SKATERS.to_vec());
        assert_eq!(
            parse_positions(&args(&["c", "D"])).unwrap(),
            vec![Position::Center, Position::Defense]
        );
        assert!(parse_positions(&args(&["G"])).is_err());
        assert!(parse_positions(&args(&["LW", "Goalie"])).is_err());
        assert!(parse_positions(&args(&["F"])).is_err());
    }

    #[test]
    fn test_build_weights_clamps() {
        let weights = build_weights(&args(&["G:9", "hits:3", "PTS:0"])).unwrap();
        assert_eq!(weights.manual(StatKey::Goals), 5);
        assert_eq!(weights.manual(StatKey::Hits), 3);
        assert_eq!(weights.manual(StatKey::Points), 1);
        assert_eq!(weights.selected(), &[StatKey::Goals, StatKey::Hits]);

        assert!(build_weights(&args(&["nope:2"])).is_err());
    }

    #[test]
    fn test_cli_parses_repeated_charts() {
        let cli = Cli::try_parse_from(["puck", "roster", "Connor McDavid", "--chart", "G", "--chart", "G"]).unwrap();
        match cli.command {
            Some(Commands::Roster { names, charts, total }) => {
                assert_eq!(names, vec!["Connor McDavid"]);
                assert_eq!(charts, vec!["G", "G"]);
                assert!(!total);
            }
            _ => panic!("expected the roster command"),
        }
    }
}
