pub mod capabilities;
pub mod classify;
