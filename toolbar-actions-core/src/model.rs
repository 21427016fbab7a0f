//! Action records, steps and their editable form
//!
//! Steps exist in two shapes:
//!
//! - [`ActionStep`]: database format, as stored by the remote action store
//! - [`StepForm`]: the same fields plus per-constraint toggles the editor UI
//!   flips on and off
//!
//! [`StepForm::from_step`] goes from the first to the second,
//! [`StepForm::to_database_format`] goes back. Fields the editor never
//! touches ride along in `extra` so they survive a save.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Numeric id of a persisted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u64);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ActionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// How a text, href or url constraint is compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringMatching {
    Exact,
    Contains,
    Regex,
}

/// One match rule in database format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_matching: Option<StringMatching>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href_matching: Option<StringMatching>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_matching: Option<StringMatching>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Server fields the editor does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

fn keep_if(selected: bool, value: &Option<String>) -> Option<String> {
    if selected && non_empty(value) {
        value.clone()
    } else {
        None
    }
}

/// A step as edited in the action form.
///
/// `StepForm::default()` is the empty step `{}` a fresh form starts with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepForm {
    #[serde(flatten)]
    pub step: ActionStep,
    #[serde(default)]
    pub selector_selected: bool,
    #[serde(default)]
    pub text_selected: bool,
    #[serde(default)]
    pub href_selected: bool,
    #[serde(default)]
    pub url_selected: bool,
}

impl StepForm {
    /// Shape a database step for editing.
    ///
    /// `is_new` marks a step freshly captured from an inspected element. Such
    /// steps start with the selector and href constraints on, and fall back to
    /// the text only when no selector could be derived. Steps loaded from the
    /// server turn on every constraint that has a value.
    pub fn from_step(step: ActionStep, is_new: bool) -> Self {
        let has_selector = non_empty(&step.selector);
        let has_text = non_empty(&step.text);
        let has_href = non_empty(&step.href);
        let has_url = non_empty(&step.url);

        if is_new {
            Self {
                selector_selected: has_selector,
                text_selected: has_text && !has_selector,
                href_selected: has_href,
                url_selected: false,
                step,
            }
        } else {
            Self {
                selector_selected: has_selector,
                text_selected: has_text,
                href_selected: has_href,
                url_selected: has_url,
                step,
            }
        }
    }

    /// Strip the toggles, keeping only the constraints that are switched on.
    pub fn to_database_format(&self) -> ActionStep {
        ActionStep {
            selector: keep_if(self.selector_selected, &self.step.selector),
            text: keep_if(self.text_selected, &self.step.text),
            href: keep_if(self.href_selected, &self.step.href),
            url: keep_if(self.url_selected, &self.step.url),
            ..self.step.clone()
        }
    }

    /// Raw selector text, if any.
    pub fn selector(&self) -> Option<&str> {
        self.step.selector.as_deref()
    }
}

/// A persisted action as returned by the remote store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<ActionStep>,
    #[serde(default)]
    pub pinned_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionRecord {
    pub fn new(id: impl Into<ActionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            steps: Vec::new(),
            pinned_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_step(mut self, step: ActionStep) -> Self {
        self.steps.push(step);
        self
    }
}

/// An unsaved action being authored from scratch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionDraft {
    pub name: String,
    pub steps: Vec<StepForm>,
    pub pinned_at: Option<String>,
}

impl ActionDraft {
    /// A draft with one step: the captured one, or `{}` when there is none.
    pub fn new(seed: Option<ActionStep>) -> Self {
        Self {
            name: String::new(),
            steps: vec![seed.map_or_else(StepForm::default, |s| StepForm::from_step(s, true))],
            pinned_at: None,
        }
    }
}

/// What the editor currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectedAction {
    Draft(ActionDraft),
    Persisted(ActionRecord),
}

impl SelectedAction {
    pub fn name(&self) -> Option<&str> {
        match self {
            SelectedAction::Draft(draft) => Some(&draft.name),
            SelectedAction::Persisted(record) => record.name.as_deref(),
        }
    }

    pub fn pinned_at(&self) -> Option<&str> {
        match self {
            SelectedAction::Draft(draft) => draft.pinned_at.as_deref(),
            SelectedAction::Persisted(record) => record.pinned_at.as_deref(),
        }
    }
}

/// Externally visible selection id: `"new"` or a persisted id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectedActionId {
    New,
    Id(ActionId),
}

impl fmt::Display for SelectedActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedActionId::New => f.write_str("new"),
            SelectedActionId::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Body sent to the remote store on create and update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionPayload {
    pub name: String,
    pub steps: Vec<ActionStep>,
    pub pinned_at: Option<String>,
}
