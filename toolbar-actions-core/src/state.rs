//! Editor state and its read-only projections

use std::collections::BTreeMap;

use crate::config::{ToolbarConfig, UserIntent};
use crate::debug::{DebugSection, DebugState};
use crate::element::{ElementDescriptor, ElementRef};
use crate::form::{ActionForm, FormErrors, FormOptions, FormStatus};
use crate::model::{ActionId, SelectedActionId};

/// Which action, if any, the editor is working on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Editing(ActionId),
    Creating,
}

/// Element picker mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Inspection {
    #[default]
    Off,
    /// Picking an element for step `index`; `None` targets a step not created yet
    Active { index: Option<usize> },
}

/// Everything the reducer owns.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub selection: Selection,
    /// Element a new action was started from
    pub new_action_element: Option<ElementRef>,
    /// Ancestry chains of inspected elements, by step index
    pub elements_chains: BTreeMap<usize, Vec<ElementDescriptor>>,
    pub inspecting: Inspection,
    /// Step whose selector text is being edited by hand
    pub editing_selector: Option<usize>,
    /// Bumped on every inspected element to force re-renders
    pub counter: u64,

    pub form: ActionForm,
    pub form_status: FormStatus,

    pub button_actions_visible: bool,
    pub show_actions_tooltip: bool,

    pub user_intent: Option<UserIntent>,
    pub intent_action_id: Option<ActionId>,

    pub saving: bool,
    pub deleting: bool,
    pub save_generation: u64,
    pub delete_generation: u64,
    pub tooltip_generation: u64,
}

impl EditorState {
    pub fn new(config: &ToolbarConfig) -> Self {
        Self {
            user_intent: config.user_intent.clone(),
            intent_action_id: config.action_id,
            ..Self::default()
        }
    }

    pub fn selected_action_id(&self) -> Option<SelectedActionId> {
        match self.selection {
            Selection::Idle => None,
            Selection::Editing(id) => Some(SelectedActionId::Id(id)),
            Selection::Creating => Some(SelectedActionId::New),
        }
    }

    pub fn is_inspecting(&self) -> bool {
        matches!(self.inspecting, Inspection::Active { .. })
    }

    /// Selector of the step being hand-edited, if it has one.
    pub fn editing_selector_value(&self) -> Option<&str> {
        let index = self.editing_selector?;
        self.form
            .steps
            .get(index)
            .and_then(|step| step.selector())
            .filter(|selector| !selector.is_empty())
    }

    /// Ancestry chain of the step being hand-edited.
    pub fn elements_chain_being_edited(&self) -> &[ElementDescriptor] {
        self.editing_selector
            .and_then(|index| self.elements_chains.get(&index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn visible_errors(&self, options: &FormOptions) -> FormErrors {
        self.form_status.visible_errors(&self.form, options)
    }
}

impl DebugState for EditorState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let selected = self
            .selected_action_id()
            .map_or_else(|| "none".to_string(), |id| id.to_string());
        let inspecting = match self.inspecting {
            Inspection::Off => "off".to_string(),
            Inspection::Active { index: None } => "new step".to_string(),
            Inspection::Active { index: Some(i) } => format!("step {i}"),
        };

        vec![
            DebugSection::new("Selection")
                .entry("selected", selected)
                .entry("inspecting", inspecting)
                .entry(
                    "editing_selector",
                    self.editing_selector
                        .map_or_else(|| "none".to_string(), |i| i.to_string()),
                )
                .entry("counter", self.counter),
            DebugSection::new("Form")
                .entry("name", self.form.name.as_deref().unwrap_or("<none>"))
                .entry("steps", self.form.steps.len())
                .entry("chains", self.elements_chains.len())
                .entry("saving", self.saving)
                .entry("deleting", self.deleting),
            DebugSection::new("Toolbar")
                .entry("button_actions_visible", self.button_actions_visible)
                .entry("show_actions_tooltip", self.show_actions_tooltip),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StepForm;

    #[test]
    fn test_editing_selector_value() {
        let mut state = EditorState::default();
        assert_eq!(state.editing_selector_value(), None);

        state.editing_selector = Some(0);
        assert_eq!(state.editing_selector_value(), None);

        state.form.steps[0].step.selector = Some(".btn".into());
        assert_eq!(state.editing_selector_value(), Some(".btn"));

        state.editing_selector = Some(5);
        assert_eq!(state.editing_selector_value(), None);
    }

    #[test]
    fn test_chain_being_edited() {
        let mut state = EditorState::default();
        state.elements_chains.insert(
            1,
            vec![ElementDescriptor {
                tag_name: "a".into(),
                ..ElementDescriptor::default()
            }],
        );
        assert!(state.elements_chain_being_edited().is_empty());

        state.editing_selector = Some(1);
        assert_eq!(state.elements_chain_being_edited()[0].tag_name, "a");

        state.editing_selector = Some(0);
        assert!(state.elements_chain_being_edited().is_empty());
    }

    #[test]
    fn test_debug_sections() {
        let mut state = EditorState::default();
        state.selection = Selection::Creating;
        state.form.steps.push(StepForm::default());

        let sections = state.debug_sections();
        assert_eq!(sections[0].get("selected"), Some("new"));
        assert_eq!(sections[1].get("steps"), Some("2"));
    }
}
