use std::fmt;

use crate::kernel::error::{Error, Result};

/// Phases an [`Application`](crate::kernel::Application) moves through.
///
/// States are strictly ordered; the only legal move is to the immediate
/// successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    Created,
    Configured,
    Registered,
    Booted,
    Started,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Created => "created",
            LifecycleState::Configured => "configured",
            LifecycleState::Registered => "registered",
            LifecycleState::Booted => "booted",
            LifecycleState::Started => "started",
            LifecycleState::ShuttingDown => "shutting-down",
            LifecycleState::Stopped => "stopped",
        }
    }

    /// The state that follows this one, `None` once stopped.
    pub fn successor(&self) -> Option<LifecycleState> {
        match self {
            LifecycleState::Created => Some(LifecycleState::Configured),
            LifecycleState::Configured => Some(LifecycleState::Registered),
            LifecycleState::Registered => Some(LifecycleState::Booted),
            LifecycleState::Booted => Some(LifecycleState::Started),
            LifecycleState::Started => Some(LifecycleState::ShuttingDown),
            LifecycleState::ShuttingDown => Some(LifecycleState::Stopped),
            LifecycleState::Stopped => None,
        }
    }

    /// Returns `to` if it is the direct successor of `self`.
    pub fn advance(self, to: LifecycleState) -> Result<LifecycleState> {
        if self.successor() == Some(to) {
            log::debug!("Lifecycle transition: {} -> {}", self, to);
            Ok(to)
        } else {
            Err(Error::InvalidTransition { from: self, to })
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == LifecycleState::Stopped
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
