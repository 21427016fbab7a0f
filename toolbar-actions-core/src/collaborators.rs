//! Capabilities the editor is constructed with
//!
//! None of these are owned by the editor. The host toolbar implements them
//! (or passes the test doubles from [`testing`](crate::testing)) and the
//! editor only calls the named operations.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::model::{ActionId, ActionRecord};

/// Actions previously loaded from the remote store.
pub trait ActionsRegistry: Send + Sync {
    /// Loaded actions, in display order
    fn actions(&self) -> Vec<ActionRecord>;

    fn find(&self, id: ActionId) -> Option<ActionRecord> {
        self.actions().into_iter().find(|action| action.id == id)
    }

    /// Insert or replace by id
    fn update_action(&self, action: ActionRecord);

    fn delete_action(&self, id: ActionId);
}

/// Toolbar chrome owned by the host.
pub trait ToolbarHost: Send + Sync {
    fn button_visible(&self) -> bool;

    fn show_button(&self);

    fn set_visible_menu(&self, menu: &str);

    /// The intent the toolbar was opened with has been handled
    fn clear_user_intent(&self);
}

/// Fire-and-forget usage events.
pub trait Telemetry: Send + Sync {
    fn capture(&self, event: &str, properties: Value);
}

/// Link button on a toast; hosts open `url` in a new browser context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastButton {
    pub label: String,
    pub url: String,
}

/// Toast notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str, button: Option<ToastButton>);

    fn info(&self, message: &str);

    /// Generic error surface for failures the editor does not handle itself
    fn error(&self, message: &str);
}

/// Registry backed by a plain vector.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    actions: Mutex<Vec<ActionRecord>>,
}

impl InMemoryRegistry {
    pub fn new(actions: Vec<ActionRecord>) -> Self {
        Self {
            actions: Mutex::new(actions),
        }
    }

    /// Replace the whole list, as after a fresh load.
    pub fn set_actions(&self, actions: Vec<ActionRecord>) {
        *self.actions.lock().unwrap_or_else(PoisonError::into_inner) = actions;
    }
}

impl ActionsRegistry for InMemoryRegistry {
    fn actions(&self) -> Vec<ActionRecord> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_action(&self, action: ActionRecord) {
        let mut actions = self.actions.lock().unwrap_or_else(PoisonError::into_inner);
        match actions.iter_mut().find(|a| a.id == action.id) {
            Some(existing) => *existing = action,
            None => actions.push(action),
        }
    }

    fn delete_action(&self, id: ActionId) {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|a| a.id != id);
    }
}
