//! # Event Bus Module
//!
//! Publish/subscribe change notifications between the core managers and
//! the (external) UI layer.
//!
//! ## Overview
//!
//! - Managers emit typed events without knowing their subscribers
//! - Subscribers filter by event category and receive events of interest
//! - Handlers run synchronously on the publishing thread; a broadcast
//!   receiver is available for consumers that prefer polling
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use mipkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = Arc::new(EventBus::new());
//!
//! // Subscribe to point events
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Point]),
//!     |event| {
//!         if let AppEvent::Point(point) = event {
//!             println!("Point event: {:?}", point);
//!         }
//!     },
//! );
//!
//! // Unsubscribe when done
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
