//! Action traits for named, loggable state transitions

use std::fmt::Debug;

use crate::element::{ElementDescriptor, ElementRef};
use crate::form::ActionForm;
use crate::model::{ActionId, ActionRecord, StepForm};

/// Marker trait for transitions dispatched to the editor store
///
/// Actions should be:
/// - Clone: they are logged and replayed by middleware
/// - Debug: for logging
/// - Send + 'static: async completions travel back over a channel
///
/// Use `#[derive(Action)]` from `toolbar-actions-macros` to implement it.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Grouping of actions for logging and test assertions
pub trait ActionCategory: Action {
    /// `None` for uncategorized actions
    fn category(&self) -> Option<&'static str>;
}

/// One-line description of an action for logs
///
/// The default uses `Debug`. Override it for actions carrying large payloads.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Every transition of the actions editor.
///
/// Intent actions come from the UI through [`ActionEditor`](crate::ActionEditor)
/// methods. `*Did*` actions carry async completions back and are tagged with
/// the generation they were started under.
#[derive(toolbar_actions_macros::Action, Clone, Debug)]
pub enum EditorAction {
    // ===== Selection =====
    #[action(category = "selection")]
    SelectAction(Option<ActionId>),
    /// Start a new action, optionally seeded from an element
    #[action(category = "selection")]
    NewAction {
        element: Option<ElementRef>,
        chain: Vec<ElementDescriptor>,
    },

    // ===== Inspection =====
    #[action(category = "inspect")]
    InspectForElementWithIndex(Option<usize>),
    /// The picker chose an element; `step` is already captured for display
    #[action(category = "inspect")]
    InspectElementSelected {
        index: Option<usize>,
        step: StepForm,
        chain: Vec<ElementDescriptor>,
    },

    // ===== Selector editing =====
    #[action(category = "selector")]
    EditSelectorWithIndex(Option<usize>),
    #[action(category = "selector")]
    SetElementSelector { selector: String, index: usize },

    // ===== Form =====
    /// Replace the form wholesale after the selected action changed
    #[action(category = "form")]
    FormReset(ActionForm),
    #[action(category = "form")]
    FormNameSet(String),
    #[action(category = "form")]
    FormPinnedAtSet(Option<String>),
    #[action(category = "form")]
    FormStepAdd,
    #[action(category = "form")]
    FormStepRemove(usize),
    #[action(category = "form")]
    FormStepUpdate { index: usize, step: StepForm },

    // ===== Persistence =====
    #[action(category = "persistence")]
    Submit,
    #[action(category = "persistence")]
    Delete,
    SaveDidSucceed {
        generation: u64,
        action: ActionRecord,
    },
    SaveDidFail {
        generation: u64,
        error: String,
    },
    DeleteDidSucceed {
        generation: u64,
        id: ActionId,
    },
    DeleteDidFail {
        generation: u64,
        error: String,
    },

    // ===== Toolbar =====
    #[action(category = "toolbar")]
    ShowButtonActions,
    #[action(category = "toolbar")]
    HideButtonActions,
    #[action(category = "toolbar")]
    SetShowActionsTooltip(bool),
    TooltipDidExpire { generation: u64 },

    /// The registry finished its first load
    ActionsDidLoad,
}

impl ActionSummary for EditorAction {
    fn summary(&self) -> String {
        match self {
            EditorAction::NewAction { element, chain } => format!(
                "NewAction {{ element: {}, chain: {} }}",
                element.is_some(),
                chain.len()
            ),
            EditorAction::InspectElementSelected { index, step, chain } => format!(
                "InspectElementSelected {{ index: {:?}, selector: {:?}, chain: {} }}",
                index,
                step.selector(),
                chain.len()
            ),
            EditorAction::FormReset(form) => format!(
                "FormReset {{ name: {:?}, steps: {} }}",
                form.name,
                form.steps.len()
            ),
            EditorAction::SaveDidSucceed { generation, action } => format!(
                "SaveDidSucceed {{ generation: {}, id: {} }}",
                generation, action.id
            ),
            _ => format!("{:?}", self),
        }
    }
}
