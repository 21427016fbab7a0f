//! Core types for the toolbar actions editor
//!
//! The editor lets someone browsing their own site pick page elements,
//! turn them into action steps, and save the result to the analytics
//! backend. It follows a Redux/Elm-style architecture:
//!
//! - **State**: [`EditorState`] holds the selection, the form and the
//!   element chains captured during inspection
//! - **Actions**: [`EditorAction`] describes every transition, including the
//!   `*Did*` results of async work
//! - **Reducer**: [`reducer`] is a pure function returning the
//!   [`Effect`]s a transition needs
//! - **Controller**: [`ActionEditor`] runs effects against its injected
//!   [`Collaborators`] and feeds async results back through the reducer
//!
//! # Basic Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use toolbar_actions_core::prelude::*;
//!
//! let config = ToolbarConfig::new("https://app.posthog.com", "token");
//! let mut editor = ActionEditor::new(config.clone(), Collaborators {
//!     registry: Arc::new(InMemoryRegistry::default()),
//!     toolbar,
//!     telemetry,
//!     notifier,
//!     store: Arc::new(HttpActionStore::new(&config)),
//!     capture: Arc::new(SelectorStepCapture::default()),
//! });
//!
//! editor.new_action(Some(clicked_element));
//! editor.set_action_name("Sign up");
//! editor.submit();
//! editor.next_completion().await;
//! ```
//!
//! Superseded requests are aborted and their results ignored, so only the
//! latest save or delete ever reaches the registry.

// Derived impls name `::toolbar_actions`, which is this crate from inside it
extern crate self as toolbar_actions;

pub mod action;
pub mod api;
pub mod collaborators;
pub mod config;
pub mod debug;
pub mod editor;
pub mod effect;
pub mod element;
pub mod error;
pub mod form;
pub mod model;
pub mod reducer;
pub mod state;
pub mod store;
pub mod tasks;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Action exports
pub use action::{Action, ActionCategory, ActionSummary, EditorAction};

// Controller exports
pub use collaborators::{
    ActionsRegistry, InMemoryRegistry, Notifier, Telemetry, ToastButton, ToolbarHost,
};
pub use editor::{ActionEditor, Collaborators, MODE_TRIGGERED_EVENT};

// Store exports
pub use effect::{DispatchResult, Effect, Notification, SaveTarget};
pub use reducer::reducer;
pub use store::{EffectReducer, EffectStore, LoggingMiddleware, Middleware, NoopMiddleware};
pub use tasks::{TaskKey, TaskManager};

// Domain exports
pub use api::{HttpActionStore, RemoteActionStore};
pub use config::{ToolbarConfig, UserIntent};
pub use debug::{DebugSection, DebugState};
pub use element::{
    to_elements_chain, ElementDescriptor, ElementNode, ElementRef, SelectorStepCapture,
    SnapshotElement, StepCapture,
};
pub use error::{ApiError, ConfigError};
pub use form::{ActionForm, FormErrors, FormOptions};
pub use model::{
    ActionDraft, ActionId, ActionPayload, ActionRecord, ActionStep, SelectedAction,
    SelectedActionId, StepForm, StringMatching,
};
pub use state::{EditorState, Inspection, Selection};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, EditorAction};
    pub use crate::api::{HttpActionStore, RemoteActionStore};
    pub use crate::collaborators::{
        ActionsRegistry, InMemoryRegistry, Notifier, Telemetry, ToastButton, ToolbarHost,
    };
    pub use crate::config::{ToolbarConfig, UserIntent};
    pub use crate::editor::{ActionEditor, Collaborators};
    pub use crate::element::{ElementNode, ElementRef, SelectorStepCapture, SnapshotElement};
    pub use crate::model::{ActionId, ActionRecord, ActionStep, SelectedAction, StepForm};
}
