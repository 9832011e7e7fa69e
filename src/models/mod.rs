pub mod card;
pub mod pool;
pub mod table;

pub use card::{Metric, Metrics, PoolCard, RawTokenIds, RiskStatus};
pub use pool::{parse_amount, Network, PoolRow};
pub use table::to_column_map;
