//! The action form: values, validation and error visibility

use serde::Deserialize;

use crate::model::{ActionPayload, SelectedAction, StepForm};

/// Error shown when the action has no name
pub const NAME_REQUIRED: &str = "Must name this action";

/// Editable values of the action being authored.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionForm {
    pub name: Option<String>,
    pub steps: Vec<StepForm>,
    pub pinned_at: Option<String>,
}

impl Default for ActionForm {
    /// `{ name: None, steps: [{}] }`
    fn default() -> Self {
        Self {
            name: None,
            steps: vec![StepForm::default()],
            pinned_at: None,
        }
    }
}

impl ActionForm {
    /// Form values for a selected action, or the defaults when nothing is selected.
    pub fn from_selected(selected: Option<&SelectedAction>) -> Self {
        match selected {
            None => Self::default(),
            Some(SelectedAction::Draft(draft)) => Self {
                name: Some(draft.name.clone()),
                steps: draft.steps.clone(),
                pinned_at: draft.pinned_at.clone(),
            },
            Some(SelectedAction::Persisted(record)) => Self {
                name: record.name.clone(),
                steps: record
                    .steps
                    .iter()
                    .cloned()
                    .map(|step| StepForm::from_step(step, false))
                    .collect(),
                pinned_at: record.pinned_at.clone(),
            },
        }
    }

    pub fn errors(&self) -> FormErrors {
        let named = self.name.as_deref().is_some_and(|n| !n.is_empty());
        FormErrors {
            name: (!named).then_some(NAME_REQUIRED),
        }
    }

    /// Body for the remote store, or `None` if the form does not validate.
    pub fn to_payload(&self) -> Option<ActionPayload> {
        if self.errors().has_errors() {
            return None;
        }
        Some(ActionPayload {
            name: self.name.clone().unwrap_or_default(),
            steps: self.steps.iter().map(StepForm::to_database_format).collect(),
            pinned_at: self.pinned_at.clone(),
        })
    }
}

/// Field-level validation errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
}

impl FormErrors {
    pub fn has_errors(&self) -> bool {
        self.name.is_some()
    }
}

/// When validation errors become visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormOptions {
    /// Show a field's error once it has been touched
    pub show_errors_on_touch: bool,
    /// Show errors before any touch or submit
    pub always_show_errors: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            show_errors_on_touch: true,
            always_show_errors: false,
        }
    }
}

/// Interaction flags tracked alongside the form values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub name_touched: bool,
    pub submit_attempted: bool,
}

impl FormStatus {
    /// Errors the UI should render right now.
    pub fn visible_errors(&self, form: &ActionForm, options: &FormOptions) -> FormErrors {
        let show = options.always_show_errors
            || self.submit_attempted
            || (options.show_errors_on_touch && self.name_touched);
        if show {
            form.errors()
        } else {
            FormErrors::default()
        }
    }
}
