//! Test doubles for the editor's collaborators
//!
//! - Recording fakes for [`ToolbarHost`], [`Telemetry`] and [`Notifier`]
//! - [`ScriptedStore`]: an in-memory [`RemoteActionStore`] with scripted delays and failures
//! - [`EditorHarness`]: an [`ActionEditor`] wired to all of the above
//! - Assertion macros for reducer effects
//!
//! # Example
//!
//! ```ignore
//! use toolbar_actions_core::testing::EditorHarness;
//!
//! let mut h = EditorHarness::new();
//! h.editor.new_action(None);
//! h.editor.set_action_name("Sign up");
//! h.editor.submit();
//! h.editor.next_completion().await;
//! assert_eq!(h.registry.actions().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;

use crate::api::{BoxFuture, RemoteActionStore};
use crate::collaborators::{InMemoryRegistry, Notifier, Telemetry, ToastButton, ToolbarHost};
use crate::config::ToolbarConfig;
use crate::editor::{ActionEditor, Collaborators};
use crate::element::SelectorStepCapture;
use crate::error::ApiError;
use crate::model::{ActionId, ActionPayload, ActionRecord};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A call made on [`RecordingToolbar`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolbarCall {
    ShowButton,
    SetVisibleMenu(String),
    ClearUserIntent,
}

#[derive(Debug, Default)]
pub struct RecordingToolbar {
    button_visible: AtomicBool,
    calls: Mutex<Vec<ToolbarCall>>,
}

impl RecordingToolbar {
    pub fn with_button_visible() -> Self {
        Self {
            button_visible: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolbarCall> {
        lock(&self.calls).clone()
    }
}

impl ToolbarHost for RecordingToolbar {
    fn button_visible(&self) -> bool {
        self.button_visible.load(Ordering::SeqCst)
    }

    fn show_button(&self) {
        self.button_visible.store(true, Ordering::SeqCst);
        lock(&self.calls).push(ToolbarCall::ShowButton);
    }

    fn set_visible_menu(&self, menu: &str) {
        lock(&self.calls).push(ToolbarCall::SetVisibleMenu(menu.to_string()));
    }

    fn clear_user_intent(&self) {
        lock(&self.calls).push(ToolbarCall::ClearUserIntent);
    }
}

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingTelemetry {
    /// Captured `(event, properties)` pairs
    pub fn events(&self) -> Vec<(String, Value)> {
        lock(&self.events).clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn capture(&self, event: &str, properties: Value) {
        lock(&self.events).push((event.to_string(), properties));
    }
}

/// A toast shown through [`RecordingNotifier`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toast {
    Success {
        message: String,
        button: Option<ToastButton>,
    },
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.toasts).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str, button: Option<ToastButton>) {
        lock(&self.toasts).push(Toast::Success {
            message: message.to_string(),
            button,
        });
    }

    fn info(&self, message: &str) {
        lock(&self.toasts).push(Toast::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        lock(&self.toasts).push(Toast::Error(message.to_string()));
    }
}

/// A request received by [`ScriptedStore`]
#[derive(Clone, Debug, PartialEq)]
pub enum StoreCall {
    List,
    Create(ActionPayload),
    Update(ActionId, ActionPayload),
    Delete(ActionId),
}

/// In-memory remote store.
///
/// Created actions get ids counting up from 1. Scripted delays and failures
/// apply to requests in the order they are made.
#[derive(Debug)]
pub struct ScriptedStore {
    records: Mutex<Vec<ActionRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    delays: Mutex<VecDeque<Duration>>,
    failures: Mutex<VecDeque<(u16, String)>>,
    next_id: AtomicU64,
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScriptedStore {
    pub fn new(records: Vec<ActionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            failures: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Hold the next request's response for `delay`.
    pub fn delay_next(&self, delay: Duration) {
        lock(&self.delays).push_back(delay);
    }

    /// Answer the next request with an HTTP error.
    pub fn fail_next(&self, status: u16, body: impl Into<String>) {
        lock(&self.failures).push_back((status, body.into()));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        lock(&self.records).clone()
    }

    fn respond<T: Send + 'static>(
        &self,
        call: StoreCall,
        apply: impl FnOnce(&Self) -> T,
    ) -> BoxFuture<Result<T, ApiError>> {
        lock(&self.calls).push(call);
        let delay = lock(&self.delays).pop_front();
        let result = match lock(&self.failures).pop_front() {
            Some((status, body)) => Err(ApiError::Status { status, body }),
            None => Ok(apply(self)),
        };
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }

    fn save(&self, id: ActionId, payload: ActionPayload) -> ActionRecord {
        let record = ActionRecord {
            id,
            name: Some(payload.name),
            steps: payload.steps,
            pinned_at: payload.pinned_at,
            ..ActionRecord::new(id, "")
        };
        let mut records = lock(&self.records);
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        record
    }
}

impl RemoteActionStore for ScriptedStore {
    fn list(&self) -> BoxFuture<Result<Vec<ActionRecord>, ApiError>> {
        self.respond(StoreCall::List, |store| store.records())
    }

    fn create(&self, payload: ActionPayload) -> BoxFuture<Result<ActionRecord, ApiError>> {
        self.respond(StoreCall::Create(payload.clone()), move |store| {
            let id = ActionId(store.next_id.fetch_add(1, Ordering::SeqCst));
            store.save(id, payload)
        })
    }

    fn update(
        &self,
        id: ActionId,
        payload: ActionPayload,
    ) -> BoxFuture<Result<ActionRecord, ApiError>> {
        self.respond(StoreCall::Update(id, payload.clone()), move |store| {
            store.save(id, payload)
        })
    }

    fn delete(&self, id: ActionId) -> BoxFuture<Result<(), ApiError>> {
        self.respond(StoreCall::Delete(id), move |store| {
            lock(&store.records).retain(|r| r.id != id);
        })
    }
}

/// An [`ActionEditor`] with every collaborator replaced by a fake.
pub struct EditorHarness {
    pub editor: ActionEditor,
    pub registry: Arc<InMemoryRegistry>,
    pub toolbar: Arc<RecordingToolbar>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<ScriptedStore>,
    pub capture: Arc<SelectorStepCapture>,
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHarness {
    /// Page the harness pretends to be inspecting
    pub const PAGE_URL: &'static str = "https://example.com/signup";

    /// `https://app.posthog.com` with `data-attr` allow-listed
    pub fn default_config() -> ToolbarConfig {
        ToolbarConfig::new("https://app.posthog.com", "test-token")
            .with_data_attributes(["data-attr"])
    }

    pub fn new() -> Self {
        Self::with_actions(Vec::new())
    }

    /// Start with `actions` already in the registry.
    pub fn with_actions(actions: Vec<ActionRecord>) -> Self {
        Self::with_config(Self::default_config(), actions)
    }

    pub fn with_config(config: ToolbarConfig, actions: Vec<ActionRecord>) -> Self {
        let registry = Arc::new(InMemoryRegistry::new(actions.clone()));
        let toolbar = Arc::new(RecordingToolbar::default());
        let telemetry = Arc::new(RecordingTelemetry::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(ScriptedStore::new(actions));
        let capture = Arc::new(SelectorStepCapture::new(Self::PAGE_URL));

        let editor = ActionEditor::new(
            config,
            Collaborators {
                registry: registry.clone(),
                toolbar: toolbar.clone(),
                telemetry: telemetry.clone(),
                notifier: notifier.clone(),
                store: store.clone(),
                capture: capture.clone(),
            },
        );

        Self {
            editor,
            registry,
            toolbar,
            telemetry,
            notifier,
            store,
            capture,
        }
    }
}

/// Assert that an effect matching the pattern was emitted.
///
/// # Example
///
/// ```ignore
/// let result = reducer(&mut state, EditorAction::Delete);
/// assert_effect!(result.effects, Effect::DeleteAction { .. });
/// ```
#[macro_export]
macro_rules! assert_effect {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected effect matching `{}`, but got: {:?}",
            stringify!($pattern),
            $effects
        );
    };
}

/// Assert that no effect matching the pattern was emitted.
#[macro_export]
macro_rules! assert_no_effect {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$effects.iter().any(|e| matches!(e, $pattern $(if $guard)?)),
            "Expected no effect matching `{}`, but got: {:?}",
            stringify!($pattern),
            $effects
        );
    };
}

/// Count effects matching the pattern.
#[macro_export]
macro_rules! count_effects {
    ($effects:expr, $pattern:pat $(if $guard:expr)?) => {
        $effects.iter().filter(|e| matches!(e, $pattern $(if $guard)?)).count()
    };
}
