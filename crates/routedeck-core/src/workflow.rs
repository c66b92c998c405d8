// ── Delete confirmation workflow ──
//
//   Closed ──request(X)──▶ Open(X) ──confirm──▶ Deleting(X)
//     ▲                      │  ▲                  │    │
//     └──────cancel──────────┘  └──────failure─────┘    │
//     └──────────────────────success────────────────────┘

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeleteWorkflow {
    #[default]
    Closed,
    /// Awaiting confirmation. `error` holds the last failed attempt.
    Open {
        target: String,
        error: Option<String>,
    },
    Deleting {
        target: String,
    },
}

impl DeleteWorkflow {
    /// Open the dialog for `target`. Retargets an open dialog; refused
    /// while a delete is in flight.
    pub fn request(&mut self, target: impl Into<String>) -> Result<(), CoreError> {
        if let Self::Deleting { target: current } = self {
            return Err(CoreError::DeleteInProgress {
                target: current.clone(),
            });
        }
        *self = Self::Open {
            target: target.into(),
            error: None,
        };
        Ok(())
    }

    /// Move `Open(X)` to `Deleting(X)` and return `X`.
    pub fn confirm(&mut self) -> Result<String, CoreError> {
        match self {
            Self::Open { target, .. } => {
                let target = std::mem::take(target);
                *self = Self::Deleting {
                    target: target.clone(),
                };
                Ok(target)
            }
            Self::Deleting { target } => Err(CoreError::DeleteInProgress {
                target: target.clone(),
            }),
            Self::Closed => Err(CoreError::NoDeletePending),
        }
    }

    /// Close the dialog. No-op when already closed.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        match self {
            Self::Deleting { target } => Err(CoreError::DeleteInProgress {
                target: target.clone(),
            }),
            Self::Open { .. } | Self::Closed => {
                *self = Self::Closed;
                Ok(())
            }
        }
    }

    pub(crate) fn succeed(&mut self) {
        *self = Self::Closed;
    }

    /// Back to `Open(X)` carrying the failure message.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if let Self::Deleting { target } = self {
            *self = Self::Open {
                target: std::mem::take(target),
                error: Some(message.into()),
            };
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Closed => None,
            Self::Open { target, .. } | Self::Deleting { target } => Some(target),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Open { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self, Self::Deleting { .. })
    }
}
