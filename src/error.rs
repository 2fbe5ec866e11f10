//! Error types shared across the application.
//!
//! Input validation and domain failures surface as [`VestigiumError`]. Persistence faults
//! have their own [`StorageError`](crate::storage::StorageError) and are logged and swallowed
//! by the [`Vault`](crate::vault::Vault). CLI commands, which exit right after the write,
//! report a lost write as [`VestigiumError::NotSaved`].

use thiserror::Error;

use crate::date_key::DateKey;

#[derive(Debug, Error)]
pub enum VestigiumError {
    #[error("task text cannot be empty")]
    EmptyTaskText,

    #[error("cannot add tasks to a past day ({0})")]
    PastDate(DateKey),

    #[error("task {id} not found on {date}")]
    TaskNotFound { date: DateKey, id: u64 },

    #[error("invalid date '{0}' (expected YYYY-MM-DD, today, tomorrow, yesterday or 'in Nd')")]
    InvalidDateKey(String),

    #[error("invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("please enter both email and password")]
    MissingCredentials,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("volume must be between 0 and 100 (got {0})")]
    InvalidVolume(u16),

    #[error("friend name cannot be empty")]
    EmptyFriendName,

    #[error("'{0}' is already in your friends list")]
    DuplicateFriend(String),

    #[error("'{0}' is not in your friends list")]
    FriendNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not save {0}; the change was not kept (see the log for the cause)")]
    NotSaved(&'static str),

    #[error("no task ids left; the snapshot holds the largest possible id")]
    IdsExhausted,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VestigiumError>;
