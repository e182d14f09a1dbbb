pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;

pub use model::{PlayerId, PlayerRecord, Position, StatKey, StatLine};
pub use repository::{PlayerRepository, FilePlayerRepository};
pub use input::{parse_args, parse_weight_args, expand_key, ParsedInput};
pub use time::{parse_clock, format_seconds, Clock};
pub use service::ranking_service::{RankingService, RankingOptions, StatWeights, WeightMode, format_value};
pub use service::roster_service::Roster;
pub use service::trade_service::{TradeBoard, TRADE_STATS};
pub use service::search_service::{suggest, resolve};
pub use service::dto::{AggregateMode, AggregateValue, RankedPlayer, Side, Edge};
