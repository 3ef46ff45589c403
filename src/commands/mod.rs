pub mod classify;
pub mod tower;
