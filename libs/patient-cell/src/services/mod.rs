pub mod roster;

pub use roster::{build_roster, sort_history, RosterService};
