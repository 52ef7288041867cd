use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Wheel core error: {0}")]
    Core(#[from] wheel_core::WheelError),

    #[error("List is empty")]
    EmptyWheel,

    #[error("Wheel is already spinning")]
    AlreadySpinning,

    #[error("No authorized session; log in first")]
    NotAuthorized,

    #[error("Please enter your name")]
    InvalidName,

    #[error("{name} has already played; only one spin is allowed per person")]
    AlreadyPlayed { name: String },

    #[error("Could not check play history: {0}")]
    AuthCheckFailed(String),

    #[error("Could not save result: {0}")]
    WriteFailed(String),

    #[error("Config sync failed: {0}")]
    Sync(String),
}
