//! Terminal presentation for reviews, statistics, and progress.

pub mod icons;
pub mod render;
pub mod watch;
