pub mod delivery;
pub mod listing;
