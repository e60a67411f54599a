// Loading state published by every entity controller.

use std::fmt;

use vreg_api::Entity;

use crate::error::CoreError;

/// `Idle -> Loading -> {Idle, Error}`; `Error` persists until the next
/// operation starts or the error is dismissed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadingState {
    #[default]
    Idle,
    /// An operation is in flight; carries the progress message.
    Loading(String),
    Error(CoreError),
}

impl LoadingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loading(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading(message) => f.write_str(message),
            Self::Error(err) => write!(f, "{err}"),
        }
    }
}

/// Controller operation kinds, used for progress messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Refresh,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// "Loading vehicles...", "Creating driver...", "Deleting vehicle log..."
    pub(crate) fn message<E: Entity>(self) -> String {
        match self {
            Self::Refresh => format!("Loading {}...", E::PLURAL),
            Self::Create => format!("Creating {}...", E::SINGULAR),
            Self::Update => format!("Updating {}...", E::SINGULAR),
            Self::Delete => format!("Deleting {}...", E::SINGULAR),
        }
    }
}
