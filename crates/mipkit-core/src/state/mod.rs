//! # Application State Module
//!
//! The workflow state machine of the application. The board-analysis
//! workflow walks five linearly ordered modes; the UI layer asks the
//! [`StateManager`] for transitions and redraws from the resulting
//! `StateEvent`s.

mod machine;

pub use machine::{CallbackId, StateInfo, StateManager};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    /// Welcome screen, no project loaded
    Initial,
    /// Board image loaded, zoom/pan allowed
    Edit,
    /// Marking measurement points on the image
    Marking,
    /// Measuring the marked points
    Measuring,
    /// Comparing and analyzing results
    Comparison,
}

impl AppState {
    /// All states, in workflow order.
    pub const ALL: [AppState; 5] = [
        AppState::Initial,
        AppState::Edit,
        AppState::Marking,
        AppState::Measuring,
        AppState::Comparison,
    ];

    /// Index into the UI toolbar stack for this state.
    pub fn toolbar_index(&self) -> usize {
        match self {
            AppState::Initial => 0,
            AppState::Edit => 1,
            AppState::Marking => 2,
            AppState::Measuring => 3,
            AppState::Comparison => 4,
        }
    }

    /// Friendly name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            AppState::Initial => "Initial",
            AppState::Edit => "Edit",
            AppState::Marking => "Marking",
            AppState::Measuring => "Measuring",
            AppState::Comparison => "Comparison",
        }
    }

    /// Short description of what the state is for.
    pub fn description(&self) -> &'static str {
        match self {
            AppState::Initial => "Load an image or project to get started",
            AppState::Edit => "View and adjust the board image",
            AppState::Marking => "Mark measurement points on the board",
            AppState::Measuring => "Measure values at the marked points",
            AppState::Comparison => "Compare and analyze the results",
        }
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A recorded transition between two states
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// State the application left.
    pub from: AppState,
    /// State the application entered.
    pub to: AppState,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub(crate) fn new(from: AppState, to: AppState) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}
