//! Effect store with middleware hooks
//!
//! The store owns the state and funnels every action through one reducer.
//! Middleware observes each dispatch before and after the reducer runs; the
//! editor installs [`LoggingMiddleware`] so every transition shows up in
//! `tracing` output.

use crate::action::{Action, ActionCategory, ActionSummary};
use crate::effect::DispatchResult;

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// Hooks around every dispatch.
pub trait Middleware<A: Action>: Send {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs actions at `debug` level
///
/// Verbose mode also logs each action's [`ActionSummary`] before dispatch.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Log after dispatch only
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: ActionCategory + ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(
                action = %action.name(),
                category = action.category().unwrap_or("uncategorized"),
                summary = %action.summary(),
                "Dispatching action"
            );
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                category = action.category().unwrap_or("uncategorized"),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// State container driven by an effect-emitting reducer.
pub struct EffectStore<S, A: Action, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    middleware: Vec<Box<dyn Middleware<A>>>,
}

impl<S, A: Action, E> EffectStore<S, A, E> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            middleware: Vec::new(),
        }
    }

    /// Add a middleware; `before` hooks run in insertion order, `after` hooks in reverse.
    pub fn with_middleware<M: Middleware<A> + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        if self.middleware.is_empty() {
            return (self.reducer)(&mut self.state, action);
        }
        for middleware in &mut self.middleware {
            middleware.before(&action);
        }
        let result = (self.reducer)(&mut self.state, action.clone());
        for middleware in self.middleware.iter_mut().rev() {
            middleware.after(&action, result.changed);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::action::EditorAction;
    use crate::effect::Effect;
    use crate::reducer::reducer;
    use crate::state::EditorState;

    #[derive(Clone, Default)]
    struct RecordingMiddleware {
        seen: Arc<Mutex<Vec<(String, &'static str, Option<bool>)>>>,
        tag: &'static str,
    }

    impl Middleware<EditorAction> for RecordingMiddleware {
        fn before(&mut self, action: &EditorAction) {
            self.seen
                .lock()
                .unwrap()
                .push((action.name().to_string(), self.tag, None));
        }

        fn after(&mut self, action: &EditorAction, state_changed: bool) {
            self.seen
                .lock()
                .unwrap()
                .push((action.name().to_string(), self.tag, Some(state_changed)));
        }
    }

    #[test]
    fn test_dispatch_runs_reducer() {
        let mut store: EffectStore<EditorState, EditorAction, Effect> =
            EffectStore::new(EditorState::default(), reducer);

        let result = store.dispatch(EditorAction::ShowButtonActions);
        assert!(result.changed);
        assert!(store.state().button_actions_visible);
    }

    #[test]
    fn test_middleware_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = EffectStore::new(EditorState::default(), reducer)
            .with_middleware(RecordingMiddleware {
                seen: seen.clone(),
                tag: "outer",
            })
            .with_middleware(RecordingMiddleware {
                seen: seen.clone(),
                tag: "inner",
            })
            .with_middleware(LoggingMiddleware::verbose());

        store.dispatch(EditorAction::SetElementSelector {
            selector: ".x".into(),
            index: 3,
        });

        let seen = seen.lock().unwrap();
        let tags: Vec<_> = seen.iter().map(|(_, tag, changed)| (*tag, *changed)).collect();
        assert_eq!(
            tags,
            vec![
                ("outer", None),
                ("inner", None),
                ("inner", Some(false)),
                ("outer", Some(false)),
            ]
        );
        assert!(seen.iter().all(|(name, _, _)| name == "SetElementSelector"));
    }

    #[test]
    fn test_noop_middleware() {
        let mut store =
            EffectStore::new(EditorState::default(), reducer).with_middleware(NoopMiddleware);
        store.dispatch(EditorAction::EditSelectorWithIndex(Some(0)));
        assert_eq!(store.state().editing_selector, Some(0));
    }
}
