//! Error type for all meerkat_tod-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodError {
    #[error("{0}")]
    Receiver(#[from] crate::receiver::ReceiverError),

    #[error("{0}")]
    Scan(#[from] crate::scans::ScanError),

    #[error("{0}")]
    Selection(#[from] crate::selection::SelectionError),
}
