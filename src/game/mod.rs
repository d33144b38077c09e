//! Game simulation modules

pub mod combat;
pub mod fighter;
pub mod input;
pub mod r#match;
pub mod physics;
pub mod snapshot;

pub use input::Key;
pub use r#match::{GameMatch, MatchEvent, MatchState};
pub use snapshot::{MatchSnapshot, MatchSummary};
