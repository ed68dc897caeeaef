//! API endpoint modules.

mod protection;
mod stats;

pub use protection::ProtectionApi;
pub use stats::StatsApi;
