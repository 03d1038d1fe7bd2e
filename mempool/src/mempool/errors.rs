/// Re-export errors
pub use txpool_mempool_errors::{mempool::*, package::*};
