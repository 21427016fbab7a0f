//! The actions editor controller
//!
//! One [`ActionEditor`] exists per toolbar session. UI code calls its named
//! transition methods; each one dispatches an [`EditorAction`] to the store,
//! runs the resulting effects, and refreshes the derived selected action.
//!
//! Network calls and the tooltip timer run as keyed tasks. Their results are
//! queued on a channel and applied when the host drives
//! [`next_completion`](ActionEditor::next_completion) or
//! [`drain_completions`](ActionEditor::drain_completions) from its event loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = ui_events.recv() => handle_ui(&mut editor, event),
//!         Some(_) = editor.next_completion() => render(&editor),
//!     }
//! }
//! ```

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use crate::action::{ActionCategory, EditorAction};
use crate::api::RemoteActionStore;
use crate::collaborators::{ActionsRegistry, Notifier, Telemetry, ToastButton, ToolbarHost};
use crate::config::ToolbarConfig;
use crate::effect::{Effect, Notification, SaveTarget};
use crate::element::{to_elements_chain, ElementDescriptor, ElementRef, StepCapture};
use crate::form::{ActionForm, FormErrors};
use crate::model::{ActionDraft, ActionId, SelectedAction, SelectedActionId, StepForm};
use crate::reducer::reducer;
use crate::state::{EditorState, Selection};
use crate::store::{EffectStore, LoggingMiddleware};
use crate::tasks::{TaskKey, TaskManager};

/// Telemetry event for actions mode being switched
pub const MODE_TRIGGERED_EVENT: &str = "toolbar mode triggered";

/// Everything the editor talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn ActionsRegistry>,
    pub toolbar: Arc<dyn ToolbarHost>,
    pub telemetry: Arc<dyn Telemetry>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn RemoteActionStore>,
    pub capture: Arc<dyn StepCapture>,
}

pub struct ActionEditor {
    config: ToolbarConfig,
    store: EffectStore<EditorState, EditorAction, Effect>,
    deps: Collaborators,
    tasks: TaskManager<EditorAction>,
    completions: mpsc::UnboundedReceiver<EditorAction>,
    /// Last derived selected action; the form is resynced when it changes
    selected: Option<SelectedAction>,
}

impl ActionEditor {
    pub fn new(config: ToolbarConfig, deps: Collaborators) -> Self {
        let (action_tx, completions) = mpsc::unbounded_channel();
        let store = EffectStore::new(EditorState::new(&config), reducer)
            .with_middleware(LoggingMiddleware::new());
        Self {
            config,
            store,
            deps,
            tasks: TaskManager::new(action_tx),
            completions,
            selected: None,
        }
    }

    // ===== Projections =====

    pub fn state(&self) -> &EditorState {
        self.store.state()
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    pub fn selected_action_id(&self) -> Option<SelectedActionId> {
        self.state().selected_action_id()
    }

    /// The draft or record being edited, memoized since the last transition.
    pub fn selected_action(&self) -> Option<&SelectedAction> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &ActionForm {
        &self.state().form
    }

    /// Validation errors the UI should render now
    pub fn visible_errors(&self) -> FormErrors {
        self.state().visible_errors(&self.config.form)
    }

    pub fn editing_selector_value(&self) -> Option<&str> {
        self.state().editing_selector_value()
    }

    pub fn elements_chain_being_edited(&self) -> &[ElementDescriptor] {
        self.state().elements_chain_being_edited()
    }

    // ===== Selection =====

    pub fn select_action(&mut self, id: Option<ActionId>) {
        self.dispatch(EditorAction::SelectAction(id));
    }

    pub fn new_action(&mut self, element: Option<ElementRef>) {
        let chain = element.as_ref().map(to_elements_chain).unwrap_or_default();
        self.dispatch(EditorAction::NewAction { element, chain });
    }

    // ===== Inspection and selectors =====

    pub fn inspect_for_element_with_index(&mut self, index: Option<usize>) {
        self.dispatch(EditorAction::InspectForElementWithIndex(index));
    }

    /// Called by the host's element picker.
    pub fn inspect_element_selected(&mut self, element: ElementRef, index: Option<usize>) {
        let chain = to_elements_chain(&element);
        let step = self
            .deps
            .capture
            .element_to_step(element.as_ref(), &self.config.data_attributes);
        self.dispatch(EditorAction::InspectElementSelected {
            index,
            step: StepForm::from_step(step, true),
            chain,
        });
    }

    pub fn edit_selector_with_index(&mut self, index: Option<usize>) {
        self.dispatch(EditorAction::EditSelectorWithIndex(index));
    }

    pub fn set_element_selector(&mut self, selector: impl Into<String>, index: usize) {
        self.dispatch(EditorAction::SetElementSelector {
            selector: selector.into(),
            index,
        });
    }

    // ===== Form =====

    pub fn set_action_name(&mut self, name: impl Into<String>) {
        self.dispatch(EditorAction::FormNameSet(name.into()));
    }

    pub fn set_pinned_at(&mut self, pinned_at: Option<String>) {
        self.dispatch(EditorAction::FormPinnedAtSet(pinned_at));
    }

    pub fn add_step(&mut self) {
        self.dispatch(EditorAction::FormStepAdd);
    }

    pub fn remove_step(&mut self, index: usize) {
        self.dispatch(EditorAction::FormStepRemove(index));
    }

    pub fn update_step(&mut self, index: usize, step: StepForm) {
        self.dispatch(EditorAction::FormStepUpdate { index, step });
    }

    // ===== Persistence =====

    /// Save the form.
    ///
    /// The request runs on the current tokio runtime; without one it is
    /// skipped with a warning and the editor stays in its saving state.
    pub fn submit(&mut self) {
        self.dispatch(EditorAction::Submit);
    }

    /// Delete the selected persisted action, on the current tokio runtime.
    pub fn delete_action(&mut self) {
        self.dispatch(EditorAction::Delete);
    }

    // ===== Toolbar =====

    pub fn show_button_actions(&mut self) {
        self.dispatch(EditorAction::ShowButtonActions);
    }

    pub fn hide_button_actions(&mut self) {
        self.dispatch(EditorAction::HideButtonActions);
    }

    /// Showing the tooltip schedules its dismissal. Outside a tokio runtime
    /// the tooltip stays up until hidden.
    pub fn set_show_actions_tooltip(&mut self, show: bool) {
        self.dispatch(EditorAction::SetShowActionsTooltip(show));
    }

    /// The registry finished its first load.
    pub fn actions_loaded(&mut self) {
        self.dispatch(EditorAction::ActionsDidLoad);
    }

    /// The registry list changed outside the editor.
    pub fn registry_changed(&mut self) {
        self.sync_form();
    }

    // ===== Completions =====

    /// Wait for the next async result and apply it.
    ///
    /// Superseded tasks never deliver, so this waits for the next live one.
    pub async fn next_completion(&mut self) -> Option<EditorAction> {
        let action = self.completions.recv().await?;
        self.dispatch(action.clone());
        Some(action)
    }

    /// Apply every result that has already arrived.
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.completions.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// True while a save or delete request is running.
    pub fn is_busy(&self) -> bool {
        self.tasks.is_running(&TaskKey::SaveAction) || self.tasks.is_running(&TaskKey::DeleteAction)
    }

    // ===== Internals =====

    fn dispatch(&mut self, action: EditorAction) {
        // Only selection changes and async results can move the selected action
        let resync = matches!(action.category(), Some("selection" | "async_result"));
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        if resync {
            self.sync_form();
        }
    }

    fn derive_selected(&self) -> Option<SelectedAction> {
        let state = self.store.state();
        match state.selection {
            Selection::Idle => None,
            Selection::Creating => {
                let seed = state.new_action_element.as_ref().map(|element| {
                    self.deps
                        .capture
                        .element_to_step(element.as_ref(), &self.config.data_attributes)
                });
                Some(SelectedAction::Draft(ActionDraft::new(seed)))
            }
            // A missing id is not fetched; the registry is the source of truth
            Selection::Editing(id) => self.deps.registry.find(id).map(SelectedAction::Persisted),
        }
    }

    fn sync_form(&mut self) {
        let selected = self.derive_selected();
        if selected == self.selected {
            return;
        }
        self.selected = selected;
        let form = ActionForm::from_selected(self.selected.as_ref());
        // FormReset never emits effects
        self.store.dispatch(EditorAction::FormReset(form));
    }

    fn run_effect(&mut self, effect: Effect) {
        tracing::trace!(?effect, "Running effect");
        match effect {
            Effect::ShowToolbarButton => {
                if !self.deps.toolbar.button_visible() {
                    self.deps.toolbar.show_button();
                }
            }
            Effect::SetVisibleMenu(menu) => self.deps.toolbar.set_visible_menu(menu),
            Effect::CaptureModeToggled { enabled } => self.deps.telemetry.capture(
                MODE_TRIGGERED_EVENT,
                json!({ "mode": "actions", "enabled": enabled }),
            ),
            Effect::ScheduleTooltipDismiss { generation } => {
                self.tasks.debounce(
                    TaskKey::TooltipDismiss,
                    self.config.tooltip_delay(),
                    async move { EditorAction::TooltipDidExpire { generation } },
                );
            }
            Effect::CancelTooltipDismiss => self.tasks.cancel(&TaskKey::TooltipDismiss),
            Effect::SaveAction {
                generation,
                target,
                payload,
            } => {
                let request = match target {
                    SaveTarget::Create => self.deps.store.create(payload),
                    SaveTarget::Update(id) => self.deps.store.update(id, payload),
                };
                self.tasks.spawn(TaskKey::SaveAction, async move {
                    match request.await {
                        Ok(action) => EditorAction::SaveDidSucceed { generation, action },
                        Err(e) => EditorAction::SaveDidFail {
                            generation,
                            error: e.to_string(),
                        },
                    }
                });
            }
            Effect::DeleteAction { generation, id } => {
                let request = self.deps.store.delete(id);
                self.tasks.spawn(TaskKey::DeleteAction, async move {
                    match request.await {
                        Ok(()) => EditorAction::DeleteDidSucceed { generation, id },
                        Err(e) => EditorAction::DeleteDidFail {
                            generation,
                            error: e.to_string(),
                        },
                    }
                });
            }
            Effect::RegistryUpdate(action) => self.deps.registry.update_action(action),
            Effect::RegistryRemove(id) => self.deps.registry.delete_action(id),
            Effect::Notify(Notification::ActionSaved(id)) => {
                let button = ToastButton {
                    label: "Open in PostHog".to_string(),
                    url: format!("{}/action/{}", self.config.api_url(), id),
                };
                self.deps.notifier.success("Action saved", Some(button));
            }
            Effect::Notify(Notification::ActionDeleted) => {
                self.deps.notifier.info("Action deleted");
            }
            Effect::ClearUserIntent => self.deps.toolbar.clear_user_intent(),
            Effect::ReportError(message) => {
                tracing::error!(%message, "Action store request failed");
                self.deps.notifier.error(&message);
            }
        }
    }
}
