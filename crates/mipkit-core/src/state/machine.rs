//! State machine driving the application workflow.
//!
//! Transitions are validated against an explicit allow-list: the forward
//! chain Initial → Edit → Marking → Measuring → Comparison (each pair
//! gated by a pluggable validator) plus a fixed set of backward pairs.
//! Anything else is rejected with a reason and a `TransitionBlocked`
//! event instead of an error: rejection is an expected, frequent outcome.

use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use super::{AppState, StateTransition};
use crate::event_bus::{AppEvent, EventBus, StateEvent};

/// Maximum number of transitions kept in history.
const MAX_HISTORY_SIZE: usize = 50;

/// Validator for a single (from, to) transition pair.
///
/// Returns whether the transition is allowed and, when it is not,
/// a human-readable reason.
type TransitionValidator = Box<dyn Fn() -> (bool, String) + Send + Sync>;

/// Callback invoked on entering or exiting a state.
type StateCallback = Box<dyn Fn() + Send + Sync>;

/// Handle for removing a registered enter/exit callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Bundled information about the current state
#[derive(Debug, Clone, Serialize)]
pub struct StateInfo {
    /// Current state.
    pub current: AppState,
    /// Previous state, if any transition happened yet.
    pub previous: Option<AppState>,
    /// Display name of the current state.
    pub display_name: &'static str,
    /// Description of the current state.
    pub description: &'static str,
    /// Whether `go_back` would currently succeed.
    pub can_go_back: bool,
    /// States reachable from the current state right now.
    pub available_transitions: Vec<AppState>,
    /// Number of recorded transitions.
    pub history_len: usize,
}

/// Application state manager
///
/// Owns the current/previous state, the bounded transition history, the
/// validator registry, and the per-state enter/exit callback registries.
/// Emits `StateEvent`s on the injected event bus.
pub struct StateManager {
    bus: Arc<EventBus>,
    current: AppState,
    previous: Option<AppState>,
    history: VecDeque<StateTransition>,
    validators: HashMap<(AppState, AppState), TransitionValidator>,
    enter_callbacks: HashMap<AppState, Vec<(CallbackId, StateCallback)>>,
    exit_callbacks: HashMap<AppState, Vec<(CallbackId, StateCallback)>>,
    next_callback_id: u64,
}

/// Backward transitions that are always allowed.
const ALLOWED_BACKWARD: [(AppState, AppState); 5] = [
    (AppState::Edit, AppState::Initial),
    (AppState::Marking, AppState::Edit),
    (AppState::Measuring, AppState::Marking),
    (AppState::Comparison, AppState::Measuring),
    // Restart analysis shortcut
    (AppState::Comparison, AppState::Edit),
];

impl StateManager {
    /// Create a new state manager starting in `Initial`.
    pub fn new(bus: Arc<EventBus>) -> Self {
        let mut manager = Self {
            bus,
            current: AppState::Initial,
            previous: None,
            history: VecDeque::new(),
            validators: HashMap::new(),
            enter_callbacks: HashMap::new(),
            exit_callbacks: HashMap::new(),
            next_callback_id: 1,
        };
        manager.setup_default_validators();
        manager
    }

    /// Seed the forward chain with always-allow validators.
    ///
    /// The UI replaces these with real checks (image loaded, at least one
    /// point marked, at least one point measured) via
    /// `register_transition_validator`.
    fn setup_default_validators(&mut self) {
        let forward = [
            (AppState::Initial, AppState::Edit),
            (AppState::Edit, AppState::Marking),
            (AppState::Marking, AppState::Measuring),
            (AppState::Measuring, AppState::Comparison),
        ];
        for pair in forward {
            self.validators
                .insert(pair, Box::new(|| (true, String::new())));
        }
    }

    /// Request a state change.
    ///
    /// Returns `true` when the state changed (or already matched the
    /// target). With `force` the validators and allow-lists are skipped.
    pub fn change_state(&mut self, target: AppState, force: bool) -> bool {
        if target == self.current {
            return true;
        }

        self.bus
            .publish(AppEvent::State(StateEvent::TransitionRequested { target }))
            .ok();

        if !force {
            let (allowed, reason) = self.can_transition_to(target);
            if !allowed {
                tracing::warn!("Transition to {} blocked: {}", target, reason);
                self.bus
                    .publish(AppEvent::State(StateEvent::TransitionBlocked {
                        target,
                        reason,
                    }))
                    .ok();
                return false;
            }
        }

        self.execute_transition(target);
        true
    }

    /// Check whether a transition from the current state is allowed.
    ///
    /// A registered validator for the pair takes precedence; otherwise the
    /// backward allow-list is consulted. Undefined pairs are rejected.
    pub fn can_transition_to(&self, target: AppState) -> (bool, String) {
        if let Some(validator) = self.validators.get(&(self.current, target)) {
            return validator();
        }

        if ALLOWED_BACKWARD.contains(&(self.current, target)) {
            return (true, String::new());
        }

        (
            false,
            format!("Transition from {} to {} not allowed", self.current, target),
        )
    }

    /// Commit the transition: exit callbacks, state swap, history,
    /// enter callbacks, change event. Callback panics are logged and do
    /// not roll back the committed change.
    fn execute_transition(&mut self, target: AppState) {
        let old = self.current;

        self.run_callbacks(&self.exit_callbacks, old, "exit");

        self.previous = Some(old);
        self.current = target;

        self.history.push_back(StateTransition::new(old, target));
        while self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        self.run_callbacks(&self.enter_callbacks, target, "enter");

        self.bus
            .publish(AppEvent::State(StateEvent::Changed { old, new: target }))
            .ok();

        tracing::info!("State: {} -> {}", old, target);
    }

    fn run_callbacks(
        &self,
        registry: &HashMap<AppState, Vec<(CallbackId, StateCallback)>>,
        state: AppState,
        phase: &str,
    ) {
        let Some(callbacks) = registry.get(&state) else {
            return;
        };
        for (id, callback) in callbacks {
            if catch_unwind(AssertUnwindSafe(callback)).is_err() {
                tracing::error!("{} callback {:?} for {} panicked", phase, id, state);
            }
        }
    }

    // ---- Queries ----

    /// Current state.
    pub fn current_state(&self) -> AppState {
        self.current
    }

    /// Previous state, if any transition happened.
    pub fn previous_state(&self) -> Option<AppState> {
        self.previous
    }

    /// Whether the manager is in the given state.
    pub fn is_in_state(&self, state: AppState) -> bool {
        self.current == state
    }

    /// Whether the manager is in any of the given states.
    pub fn is_in_states(&self, states: &[AppState]) -> bool {
        states.contains(&self.current)
    }

    /// Whether `go_back` would currently succeed.
    pub fn can_go_back(&self) -> bool {
        self.previous
            .is_some_and(|previous| self.can_transition_to(previous).0)
    }

    /// Return to the previous state, when a transition to it is allowed.
    pub fn go_back(&mut self) -> bool {
        let Some(previous) = self.previous else {
            return false;
        };
        if !self.can_transition_to(previous).0 {
            return false;
        }
        self.change_state(previous, false)
    }

    /// States reachable from the current state right now.
    pub fn available_transitions(&self) -> Vec<AppState> {
        AppState::ALL
            .into_iter()
            .filter(|state| *state != self.current && self.can_transition_to(*state).0)
            .collect()
    }

    /// The most recent transitions, oldest first.
    pub fn history(&self, limit: usize) -> Vec<StateTransition> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Bundle of everything the UI needs to render the current mode.
    pub fn state_info(&self) -> StateInfo {
        StateInfo {
            current: self.current,
            previous: self.previous,
            display_name: self.current.display_name(),
            description: self.current.description(),
            can_go_back: self.can_go_back(),
            available_transitions: self.available_transitions(),
            history_len: self.history.len(),
        }
    }

    // ---- Registries ----

    /// Register (or replace) the validator for a transition pair.
    pub fn register_transition_validator<F>(&mut self, from: AppState, to: AppState, validator: F)
    where
        F: Fn() -> (bool, String) + Send + Sync + 'static,
    {
        self.validators.insert((from, to), Box::new(validator));
    }

    /// Remove the validator for a transition pair.
    ///
    /// The pair falls back to the backward allow-list afterwards.
    pub fn remove_transition_validator(&mut self, from: AppState, to: AppState) -> bool {
        self.validators.remove(&(from, to)).is_some()
    }

    /// Register a callback invoked after entering `state`.
    pub fn add_state_enter_callback<F>(&mut self, state: AppState, callback: F) -> CallbackId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.enter_callbacks
            .entry(state)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Register a callback invoked before leaving `state`.
    pub fn add_state_exit_callback<F>(&mut self, state: AppState, callback: F) -> CallbackId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.exit_callbacks
            .entry(state)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered enter or exit callback.
    pub fn remove_state_callback(&mut self, state: AppState, id: CallbackId) -> bool {
        let mut removed = false;
        for registry in [&mut self.enter_callbacks, &mut self.exit_callbacks] {
            if let Some(callbacks) = registry.get_mut(&state) {
                let before = callbacks.len();
                callbacks.retain(|(cb_id, _)| *cb_id != id);
                removed |= callbacks.len() != before;
            }
        }
        removed
    }

    /// Force a reset to the initial state.
    pub fn reset_to_initial(&mut self) {
        self.change_state(AppState::Initial, true);
    }

    fn next_id(&mut self) -> CallbackId {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        id
    }
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("history_len", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::EventFilter;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manager() -> StateManager {
        StateManager::new(Arc::new(EventBus::new()))
    }

    #[test]
    fn test_starts_in_initial() {
        let manager = manager();
        assert_eq!(manager.current_state(), AppState::Initial);
        assert_eq!(manager.previous_state(), None);
        assert!(!manager.can_go_back());
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        let mut manager = manager();
        assert!(!manager.change_state(AppState::Measuring, false));
        assert_eq!(manager.current_state(), AppState::Initial);
    }

    #[test]
    fn test_forward_chain() {
        let mut manager = manager();
        assert!(manager.change_state(AppState::Edit, false));
        assert!(manager.change_state(AppState::Marking, false));
        assert!(manager.change_state(AppState::Measuring, false));
        assert!(manager.change_state(AppState::Comparison, false));
        assert_eq!(manager.current_state(), AppState::Comparison);
        assert_eq!(manager.previous_state(), Some(AppState::Measuring));
    }

    #[test]
    fn test_marking_to_edit_is_allowed_backward() {
        let mut manager = manager();
        manager.change_state(AppState::Edit, false);
        manager.change_state(AppState::Marking, false);
        assert!(manager.change_state(AppState::Edit, false));
        assert_eq!(manager.current_state(), AppState::Edit);
    }

    #[test]
    fn test_edit_to_comparison_is_rejected() {
        let mut manager = manager();
        manager.change_state(AppState::Edit, false);
        assert!(!manager.change_state(AppState::Comparison, false));
        assert_eq!(manager.current_state(), AppState::Edit);
    }

    #[test]
    fn test_comparison_restart_shortcut() {
        let mut manager = manager();
        for state in [
            AppState::Edit,
            AppState::Marking,
            AppState::Measuring,
            AppState::Comparison,
        ] {
            assert!(manager.change_state(state, false));
        }
        assert!(manager.change_state(AppState::Edit, false));
        assert_eq!(manager.current_state(), AppState::Edit);
    }

    #[test]
    fn test_same_state_is_noop_success() {
        let mut manager = manager();
        assert!(manager.change_state(AppState::Initial, false));
        assert_eq!(manager.history(10).len(), 0);
    }

    #[test]
    fn test_force_skips_validation() {
        let mut manager = manager();
        assert!(manager.change_state(AppState::Comparison, true));
        assert_eq!(manager.current_state(), AppState::Comparison);
    }

    #[test]
    fn test_validator_gates_transition() {
        let mut manager = manager();
        manager.register_transition_validator(AppState::Initial, AppState::Edit, || {
            (false, "no image loaded".to_string())
        });

        assert!(!manager.change_state(AppState::Edit, false));
        assert_eq!(manager.current_state(), AppState::Initial);

        manager.register_transition_validator(AppState::Initial, AppState::Edit, || {
            (true, String::new())
        });
        assert!(manager.change_state(AppState::Edit, false));
    }

    #[test]
    fn test_blocked_event_carries_reason() {
        let bus = Arc::new(EventBus::new());
        let mut manager = StateManager::new(bus.clone());
        let blocked = Arc::new(parking_lot::Mutex::new(None));

        let blocked_clone = blocked.clone();
        bus.subscribe(EventFilter::All, move |event| {
            if let AppEvent::State(StateEvent::TransitionBlocked { reason, .. }) = event {
                *blocked_clone.lock() = Some(reason);
            }
        });

        manager.change_state(AppState::Comparison, false);
        let reason = blocked.lock().clone().expect("blocked event emitted");
        assert!(reason.contains("not allowed"));
    }

    #[test]
    fn test_go_back() {
        let mut manager = manager();
        manager.change_state(AppState::Edit, false);
        manager.change_state(AppState::Marking, false);

        assert!(manager.can_go_back());
        assert!(manager.go_back());
        assert_eq!(manager.current_state(), AppState::Edit);
    }

    #[test]
    fn test_go_back_requires_allowed_pair() {
        let mut manager = manager();
        manager.change_state(AppState::Edit, false);
        // previous is Initial; Edit -> Initial is on the backward list
        assert!(manager.go_back());
        // previous is now Edit but Initial -> Edit runs through the validator
        manager.register_transition_validator(AppState::Initial, AppState::Edit, || {
            (false, "locked".to_string())
        });
        assert!(!manager.can_go_back());
        assert!(!manager.go_back());
    }

    #[test]
    fn test_enter_exit_callbacks_fire_in_order() {
        let bus = Arc::new(EventBus::new());
        let mut manager = StateManager::new(bus);
        let trace = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let t = trace.clone();
        manager.add_state_exit_callback(AppState::Initial, move || t.lock().push("exit-initial"));
        let t = trace.clone();
        manager.add_state_enter_callback(AppState::Edit, move || t.lock().push("enter-edit"));

        manager.change_state(AppState::Edit, false);
        assert_eq!(*trace.lock(), vec!["exit-initial", "enter-edit"]);
    }

    #[test]
    fn test_callback_removal() {
        let mut manager = manager();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let id = manager.add_state_enter_callback(AppState::Edit, move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        manager.change_state(AppState::Edit, false);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(manager.remove_state_callback(AppState::Edit, id));
        assert!(!manager.remove_state_callback(AppState::Edit, id));

        manager.change_state(AppState::Initial, false);
        manager.change_state(AppState::Edit, false);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_panic_does_not_abort_transition() {
        let mut manager = manager();
        manager.add_state_exit_callback(AppState::Initial, || panic!("boom"));

        assert!(manager.change_state(AppState::Edit, false));
        assert_eq!(manager.current_state(), AppState::Edit);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut manager = manager();
        for _ in 0..40 {
            manager.change_state(AppState::Edit, false);
            manager.change_state(AppState::Initial, false);
        }
        assert_eq!(manager.history(usize::MAX).len(), MAX_HISTORY_SIZE);

        let recent = manager.history(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent.last().expect("non-empty").to, AppState::Initial);
    }

    #[test]
    fn test_available_transitions() {
        let mut manager = manager();
        assert_eq!(manager.available_transitions(), vec![AppState::Edit]);

        manager.change_state(AppState::Edit, false);
        let available = manager.available_transitions();
        assert!(available.contains(&AppState::Initial));
        assert!(available.contains(&AppState::Marking));
        assert!(!available.contains(&AppState::Measuring));
    }

    #[test]
    fn test_state_info() {
        let mut manager = manager();
        manager.change_state(AppState::Edit, false);

        let info = manager.state_info();
        assert_eq!(info.current, AppState::Edit);
        assert_eq!(info.previous, Some(AppState::Initial));
        assert_eq!(info.display_name, "Edit");
        assert!(info.can_go_back);
        assert_eq!(info.history_len, 1);
    }

    #[test]
    fn test_reset_to_initial() {
        let mut manager = manager();
        manager.change_state(AppState::Comparison, true);
        manager.reset_to_initial();
        assert_eq!(manager.current_state(), AppState::Initial);
    }
}
