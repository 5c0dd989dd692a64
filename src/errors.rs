use std::fmt;

#[derive(Debug)]
pub enum ReplayError {
    /// A transition precondition failed (e.g. discarding a tile absent from
    /// the hand). The round's log is corrupt; replay must not continue.
    MalformedEvent { message: String },
    /// An event other than Init arrived before any round was initialized.
    MissingInit { event: String },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::MalformedEvent { message } => {
                write!(f, "Malformed event: {}", message)
            }
            ReplayError::MissingInit { event } => {
                write!(f, "Event before round init: {}", event)
            }
        }
    }
}

impl std::error::Error for ReplayError {}

pub type ReplayResult<T> = Result<T, ReplayError>;
