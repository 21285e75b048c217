pub mod confirmed_crossing;
pub mod single_direction;
