//! Core data models for dedi-stats.

mod achievement;
mod competition;
mod ids;
mod record;
mod rivalry;
mod servers;
mod stats;

pub use achievement::*;
pub use competition::*;
pub use ids::*;
pub use record::*;
pub use rivalry::*;
pub use servers::*;
pub use stats::*;
