pub mod actions;
pub mod anchors;
pub mod presence;
pub mod upkeep;
