use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum MempoolManagerError {
    /// The blocking task running a mempool operation panicked or was cancelled
    #[error("mempool task failed: {0}")]
    BlockingTask(#[from] JoinError),
}

pub type MempoolManagerResult<T> = std::result::Result<T, MempoolManagerError>;
