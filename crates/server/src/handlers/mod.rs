pub mod counter;
pub mod ping;
pub mod sleep;
pub mod wiki;
