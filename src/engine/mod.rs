pub mod types;
pub mod margin;
pub mod ranking;

pub use types::{ProfitRecord, RankMethod, RankQuery};
