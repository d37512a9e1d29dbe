//! The sequential measurement workflow.
//!
//! One measurement runs at a time, tracked by a cursor on the target point
//! plus an armed deadline. The core has no event loop of its own, so the
//! deadline is polled through `check_timeout` from the host's tick.

use std::time::{Duration, Instant};

use mipkit_core::{AppEvent, MeasurementEvent, MeasurementKind, PointEvent};

use super::PointManager;

/// Floor for the configurable measurement timeout.
const MIN_MEASUREMENT_TIMEOUT: Duration = Duration::from_secs(1);

/// The in-progress measurement
#[derive(Debug, Clone, Copy)]
pub struct ActiveMeasurement {
    /// Target point id.
    pub point_id: u32,
    /// Which board is being measured.
    pub kind: MeasurementKind,
    /// When the measurement times out; disarmed once any value is
    /// recorded.
    pub(crate) deadline: Option<Instant>,
}

impl PointManager {
    /// Start measuring the first unmeasured point.
    ///
    /// A no-op (with a warning) when a measurement is already running or
    /// every point is measured. Emits `Started` and arms the timeout.
    pub fn start_measurement_sequence(&mut self, kind: MeasurementKind) -> bool {
        if self.active.is_some() {
            tracing::warn!("Measurement already in progress");
            return false;
        }

        let Some(point_id) = self
            .order
            .iter()
            .copied()
            .find(|id| self.points.get(id).is_some_and(|p| !p.is_measured()))
        else {
            tracing::warn!("No unmeasured points to measure");
            return false;
        };

        self.active = Some(ActiveMeasurement {
            point_id,
            kind,
            deadline: Some(Instant::now() + self.measurement_timeout),
        });

        self.emit(AppEvent::Measurement(MeasurementEvent::Started {
            point_id,
            kind,
        }));
        tracing::info!(point_id, %kind, "Measurement started");
        true
    }

    /// Record a measured value on a point.
    ///
    /// Works for any point, not only the cursor target. Any successful
    /// record disarms the timeout. When the recorded point is the cursor
    /// target the measurement completes and the cursor clears; the next
    /// point is not started automatically.
    pub fn record_measurement(&mut self, point_id: u32, kind: MeasurementKind, value: f64) -> bool {
        let Some(point) = self.points.get_mut(&point_id) else {
            tracing::warn!(point_id, "Cannot record measurement on unknown point");
            return false;
        };

        match kind {
            MeasurementKind::Reference => point.set_reference_value(value),
            MeasurementKind::Test => point.set_test_value(value),
        }
        self.touch();

        if let Some(active) = &mut self.active {
            active.deadline = None;
        }

        self.emit(AppEvent::Measurement(MeasurementEvent::Recorded {
            point_id,
            kind,
            value,
        }));
        self.emit(AppEvent::Point(PointEvent::Updated { id: point_id }));

        if self.active.as_ref().is_some_and(|a| a.point_id == point_id) {
            self.active = None;
            self.emit(AppEvent::Measurement(MeasurementEvent::Completed {
                point_id,
            }));
        }

        tracing::debug!(point_id, %kind, value, "Measurement recorded");
        true
    }

    /// Cancel the in-progress measurement, if any.
    pub fn cancel_measurement(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        self.emit(AppEvent::Measurement(MeasurementEvent::Cancelled {
            point_id: active.point_id,
        }));
        tracing::info!(point_id = active.point_id, "Measurement cancelled");
        true
    }

    /// Poll the measurement deadline.
    ///
    /// Returns `true` when an armed deadline passed: the cursor clears
    /// and `TimedOut` fires. The timed-out point stays measurable; a new
    /// sequence can start immediately.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let Some(deadline) = active.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let point_id = active.point_id;
        self.active = None;
        self.emit(AppEvent::Measurement(MeasurementEvent::TimedOut {
            point_id,
        }));
        tracing::warn!(point_id, "Measurement timed out");
        true
    }

    /// Whether a measurement is currently running.
    pub fn is_measuring(&self) -> bool {
        self.active.is_some()
    }

    /// The in-progress measurement, if any.
    pub fn current_measurement(&self) -> Option<&ActiveMeasurement> {
        self.active.as_ref()
    }

    /// The configured measurement timeout.
    pub fn measurement_timeout(&self) -> Duration {
        self.measurement_timeout
    }

    /// Set the measurement timeout, floored at one second.
    pub fn set_measurement_timeout(&mut self, timeout: Duration) {
        self.measurement_timeout = timeout.max(MIN_MEASUREMENT_TIMEOUT);
    }
}
