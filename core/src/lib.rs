extern crate self as txpool_core;

pub mod log;
pub mod time;
