pub mod mempool;
pub mod package;
