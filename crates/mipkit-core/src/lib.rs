//! # MipKit Core
//!
//! Core types, events, and state management for MipKit.
//! Provides the fundamental abstractions shared by the board model,
//! the project layer, and the (external) UI shell: the application
//! event bus, the workflow state machine, and the error taxonomy.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod state;

pub use data::{MeasurementKind, ShapeKind, StatisticsSnapshot, ValueStats};

pub use error::{Error, PersistenceError, PointError, Result, SnapshotError};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, EventBus, EventBusError, EventCategory, EventFilter, MeasurementEvent, PointEvent,
    ProjectEvent, StateEvent, SubscriptionId,
};

pub use state::{AppState, CallbackId, StateInfo, StateManager, StateTransition};
