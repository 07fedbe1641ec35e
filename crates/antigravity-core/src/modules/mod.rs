//! Quota analytics, selection state, and the collaborators they depend on.

pub mod aggregator;
pub mod config_watch;
pub mod logger;
pub mod ranking;
pub mod selection;
pub mod source;
