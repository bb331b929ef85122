use thiserror::Error;

use crate::automation::AutomationError;
use crate::tr;

#[derive(Error, Debug)]
pub enum AppError {
    /// Input problems, collected so the user sees everything at once.
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("{}", tr::pesel_already_registered(.0))]
    PeselAlreadyRegistered(String),

    #[error("{}", tr::pesel_not_found(.0))]
    PeselNotFound(String),

    /// A failed step of the page automation; aborts the whole operation.
    #[error(transparent)]
    Automation(#[from] AutomationError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
