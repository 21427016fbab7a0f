//! Reducer - (state, action) -> effects
//!
//! Every transition is applied here, synchronously and in one piece.
//! Collaborator calls are returned as [`Effect`]s; nothing in this module
//! awaits or touches the outside world.

use std::collections::BTreeMap;

use crate::action::EditorAction;
use crate::config::UserIntent;
use crate::effect::{DispatchResult, Effect, Notification, SaveTarget, ACTIONS_MENU};
use crate::form::FormStatus;
use crate::model::StepForm;
use crate::state::{EditorState, Inspection, Selection};

pub fn reducer(state: &mut EditorState, action: EditorAction) -> DispatchResult<Effect> {
    match action {
        // ===== Selection =====
        EditorAction::SelectAction(id) => {
            // 0 is never a persisted id
            let id = id.filter(|id| id.0 != 0);
            state.selection = id.map_or(Selection::Idle, Selection::Editing);
            state.new_action_element = None;
            state.inspecting = Inspection::Off;

            let mut result = DispatchResult::changed();
            if id.is_some() {
                result = result.with(Effect::ShowToolbarButton);
                if !state.button_actions_visible {
                    result = result.merge(reducer(state, EditorAction::ShowButtonActions));
                }
                result = result.with(Effect::SetVisibleMenu(ACTIONS_MENU));
            }
            result
        }

        EditorAction::NewAction { element, chain } => {
            state.elements_chains = match element {
                Some(_) => BTreeMap::from([(0, chain)]),
                None => BTreeMap::new(),
            };
            state.selection = Selection::Creating;
            state.new_action_element = element;
            state.inspecting = Inspection::Off;
            state.editing_selector = None;
            DispatchResult::changed()
        }

        // ===== Inspection =====
        EditorAction::InspectForElementWithIndex(index) => {
            state.inspecting = Inspection::Active { index };
            DispatchResult::changed()
        }

        EditorAction::InspectElementSelected { index, step, chain } => {
            // No index means there is no step yet: the first one takes it
            let target = index.unwrap_or(0);
            if let Some(slot) = state.form.steps.get_mut(target) {
                *slot = step;
            }
            state.elements_chains.insert(target, chain);
            state.inspecting = Inspection::Off;
            state.counter += 1;
            DispatchResult::changed()
        }

        // ===== Selector editing =====
        EditorAction::EditSelectorWithIndex(index) => {
            state.editing_selector = index;
            DispatchResult::changed()
        }

        EditorAction::SetElementSelector { selector, index } => {
            if state.selection == Selection::Idle {
                return DispatchResult::unchanged();
            }
            match state.form.steps.get_mut(index) {
                Some(step) => {
                    step.step.selector = Some(selector);
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        // ===== Form =====
        EditorAction::FormReset(form) => {
            state.form = form;
            state.form_status = FormStatus::default();
            DispatchResult::changed()
        }

        EditorAction::FormNameSet(name) => {
            state.form.name = Some(name);
            state.form_status.name_touched = true;
            DispatchResult::changed()
        }

        EditorAction::FormPinnedAtSet(pinned_at) => {
            state.form.pinned_at = pinned_at;
            DispatchResult::changed()
        }

        EditorAction::FormStepAdd => {
            state.form.steps.push(StepForm::default());
            DispatchResult::changed()
        }

        EditorAction::FormStepRemove(index) => {
            if index >= state.form.steps.len() {
                return DispatchResult::unchanged();
            }
            state.form.steps.remove(index);
            state.elements_chains = std::mem::take(&mut state.elements_chains)
                .into_iter()
                .filter(|(key, _)| *key != index)
                .map(|(key, chain)| if key > index { (key - 1, chain) } else { (key, chain) })
                .collect();
            state.editing_selector = match state.editing_selector {
                Some(i) if i == index => None,
                Some(i) if i > index => Some(i - 1),
                other => other,
            };
            DispatchResult::changed()
        }

        EditorAction::FormStepUpdate { index, step } => match state.form.steps.get_mut(index) {
            Some(slot) => {
                *slot = step;
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        // ===== Persistence =====
        EditorAction::Submit => {
            let target = match state.selection {
                Selection::Idle => return DispatchResult::unchanged(),
                Selection::Editing(id) => SaveTarget::Update(id),
                Selection::Creating => SaveTarget::Create,
            };
            state.form_status.submit_attempted = true;
            let Some(payload) = state.form.to_payload() else {
                return DispatchResult::changed();
            };
            state.save_generation += 1;
            state.saving = true;
            DispatchResult::changed_with(Effect::SaveAction {
                generation: state.save_generation,
                target,
                payload,
            })
        }

        EditorAction::SaveDidSucceed { generation, action } => {
            if generation != state.save_generation {
                tracing::debug!(generation, current = state.save_generation, "Dropping superseded save");
                return DispatchResult::unchanged();
            }
            state.saving = false;
            let id = action.id;
            DispatchResult::changed_with(Effect::RegistryUpdate(action))
                .merge(reducer(state, EditorAction::SelectAction(None)))
                .with(Effect::Notify(Notification::ActionSaved(id)))
        }

        EditorAction::SaveDidFail { generation, error } => {
            if generation != state.save_generation {
                return DispatchResult::unchanged();
            }
            state.saving = false;
            DispatchResult::changed_with(Effect::ReportError(format!(
                "Could not save action: {error}"
            )))
        }

        EditorAction::Delete => {
            let Selection::Editing(id) = state.selection else {
                return DispatchResult::unchanged();
            };
            state.delete_generation += 1;
            state.deleting = true;
            DispatchResult::changed_with(Effect::DeleteAction {
                generation: state.delete_generation,
                id,
            })
        }

        EditorAction::DeleteDidSucceed { generation, id } => {
            if generation != state.delete_generation {
                tracing::debug!(generation, current = state.delete_generation, "Dropping superseded delete");
                return DispatchResult::unchanged();
            }
            state.deleting = false;
            DispatchResult::changed_with(Effect::RegistryRemove(id))
                .merge(reducer(state, EditorAction::SelectAction(None)))
                .with(Effect::Notify(Notification::ActionDeleted))
        }

        EditorAction::DeleteDidFail { generation, error } => {
            if generation != state.delete_generation {
                return DispatchResult::unchanged();
            }
            state.deleting = false;
            DispatchResult::changed_with(Effect::ReportError(format!(
                "Could not delete action: {error}"
            )))
        }

        // ===== Toolbar =====
        EditorAction::ShowButtonActions => {
            state.button_actions_visible = true;
            DispatchResult::changed_with(Effect::CaptureModeToggled { enabled: true })
        }

        EditorAction::HideButtonActions => {
            state.button_actions_visible = false;
            reducer(state, EditorAction::SetShowActionsTooltip(false))
                .mark_changed()
                .with(Effect::CaptureModeToggled { enabled: false })
        }

        EditorAction::SetShowActionsTooltip(show) => {
            state.show_actions_tooltip = show;
            state.tooltip_generation += 1;
            if show {
                DispatchResult::changed_with(Effect::ScheduleTooltipDismiss {
                    generation: state.tooltip_generation,
                })
            } else {
                DispatchResult::changed_with(Effect::CancelTooltipDismiss)
            }
        }

        EditorAction::TooltipDidExpire { generation } => {
            if generation != state.tooltip_generation || !state.show_actions_tooltip {
                return DispatchResult::unchanged();
            }
            reducer(state, EditorAction::SetShowActionsTooltip(false))
        }

        EditorAction::ActionsDidLoad => match state.user_intent.take() {
            Some(UserIntent::EditAction) => {
                let id = state.intent_action_id;
                reducer(state, EditorAction::SelectAction(id)).with(Effect::ClearUserIntent)
            }
            Some(UserIntent::AddAction) => reducer(
                state,
                EditorAction::NewAction {
                    element: None,
                    chain: Vec::new(),
                },
            )
            .with(Effect::ClearUserIntent),
            other => {
                state.user_intent = other;
                reducer(state, EditorAction::SetShowActionsTooltip(true))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionId, ActionRecord, ActionStep, SelectedActionId};
    use crate::{assert_effect, assert_no_effect, count_effects};

    fn step_with_selector(selector: &str) -> StepForm {
        StepForm::from_step(
            ActionStep {
                selector: Some(selector.to_string()),
                ..ActionStep::default()
            },
            true,
        )
    }

    fn named_draft(state: &mut EditorState, name: &str) {
        reducer(
            state,
            EditorAction::NewAction {
                element: None,
                chain: vec![],
            },
        );
        reducer(state, EditorAction::FormNameSet(name.to_string()));
    }

    #[test]
    fn test_selection_is_three_valued() {
        let mut state = EditorState::default();
        assert_eq!(state.selected_action_id(), None);

        reducer(&mut state, EditorAction::SelectAction(Some(ActionId(42))));
        assert_eq!(state.selected_action_id(), Some(SelectedActionId::Id(ActionId(42))));

        reducer(
            &mut state,
            EditorAction::NewAction {
                element: None,
                chain: vec![],
            },
        );
        assert_eq!(state.selected_action_id(), Some(SelectedActionId::New));

        reducer(&mut state, EditorAction::SelectAction(Some(ActionId(0))));
        assert_eq!(state.selected_action_id(), None);
    }

    #[test]
    fn test_select_reveals_toolbar_once() {
        let mut state = EditorState::default();

        let result = reducer(&mut state, EditorAction::SelectAction(Some(ActionId(1))));
        assert_eq!(
            result.effects,
            vec![
                Effect::ShowToolbarButton,
                Effect::CaptureModeToggled { enabled: true },
                Effect::SetVisibleMenu(ACTIONS_MENU),
            ]
        );
        assert!(state.button_actions_visible);

        let result = reducer(&mut state, EditorAction::SelectAction(Some(ActionId(2))));
        assert_no_effect!(result.effects, Effect::CaptureModeToggled { .. });

        let result = reducer(&mut state, EditorAction::SelectAction(None));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_new_action_resets_editing_state() {
        let mut state = EditorState::default();
        state.inspecting = Inspection::Active { index: Some(2) };
        state.editing_selector = Some(1);
        state.elements_chains.insert(3, vec![]);

        reducer(
            &mut state,
            EditorAction::NewAction {
                element: None,
                chain: vec![],
            },
        );

        assert_eq!(state.selection, Selection::Creating);
        assert_eq!(state.inspecting, Inspection::Off);
        assert_eq!(state.editing_selector, None);
        assert!(state.elements_chains.is_empty());
    }

    #[test]
    fn test_inspect_replaces_only_target_step() {
        let mut state = EditorState::default();
        state.form.steps = vec![
            step_with_selector(".a"),
            step_with_selector(".b"),
            step_with_selector(".c"),
        ];
        reducer(&mut state, EditorAction::InspectForElementWithIndex(Some(1)));
        assert!(state.is_inspecting());

        reducer(
            &mut state,
            EditorAction::InspectElementSelected {
                index: Some(1),
                step: step_with_selector("#new"),
                chain: vec![],
            },
        );

        let selectors: Vec<_> = state.form.steps.iter().map(|s| s.selector()).collect();
        assert_eq!(selectors, vec![Some(".a"), Some("#new"), Some(".c")]);
        assert_eq!(state.counter, 1);
        assert!(!state.is_inspecting());
        assert!(state.elements_chains.contains_key(&1));
    }

    #[test]
    fn test_inspect_without_index_targets_first_step() {
        let mut state = EditorState::default();
        reducer(
            &mut state,
            EditorAction::InspectElementSelected {
                index: None,
                step: step_with_selector("#x"),
                chain: vec![],
            },
        );
        assert_eq!(state.form.steps[0].selector(), Some("#x"));
        assert!(state.elements_chains.contains_key(&0));

        // Same step again still bumps the counter
        reducer(
            &mut state,
            EditorAction::InspectElementSelected {
                index: None,
                step: step_with_selector("#x"),
                chain: vec![],
            },
        );
        assert_eq!(state.counter, 2);
    }

    #[test]
    fn test_set_element_selector() {
        let mut state = EditorState::default();
        let idle = reducer(
            &mut state,
            EditorAction::SetElementSelector {
                selector: ".btn".into(),
                index: 0,
            },
        );
        assert!(!idle.changed);

        named_draft(&mut state, "x");
        reducer(&mut state, EditorAction::EditSelectorWithIndex(Some(0)));
        let result = reducer(
            &mut state,
            EditorAction::SetElementSelector {
                selector: ".btn".into(),
                index: 0,
            },
        );
        assert!(result.changed);
        assert_eq!(state.editing_selector_value(), Some(".btn"));

        let result = reducer(
            &mut state,
            EditorAction::SetElementSelector {
                selector: ".nope".into(),
                index: 4,
            },
        );
        assert!(!result.changed);
    }

    #[test]
    fn test_remove_step_shifts_chains() {
        let mut state = EditorState::default();
        state.form.steps = vec![StepForm::default(); 3];
        for i in 0..3 {
            state.elements_chains.insert(i, vec![]);
        }
        state.editing_selector = Some(2);

        reducer(&mut state, EditorAction::FormStepRemove(1));

        assert_eq!(state.form.steps.len(), 2);
        assert_eq!(state.elements_chains.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(state.editing_selector, Some(1));

        assert!(!reducer(&mut state, EditorAction::FormStepRemove(9)).changed);
    }

    #[test]
    fn test_submit_without_name_is_blocked() {
        let mut state = EditorState::default();
        reducer(
            &mut state,
            EditorAction::NewAction {
                element: None,
                chain: vec![],
            },
        );

        let result = reducer(&mut state, EditorAction::Submit);
        assert!(!result.has_effects());
        assert!(state.form_status.submit_attempted);
        assert_eq!(state.save_generation, 0);
        assert_eq!(state.selected_action_id(), Some(SelectedActionId::New));
    }

    #[test]
    fn test_submit_when_idle_does_nothing() {
        let mut state = EditorState::default();
        state.form.name = Some("x".into());
        let result = reducer(&mut state, EditorAction::Submit);
        assert!(!result.changed);
        assert!(!result.has_effects());
    }

    #[test]
    fn test_submit_targets() {
        let mut state = EditorState::default();
        named_draft(&mut state, "Sign up");
        let result = reducer(&mut state, EditorAction::Submit);
        assert_effect!(
            result.effects,
            Effect::SaveAction { generation: 1, target: SaveTarget::Create, .. }
        );

        reducer(&mut state, EditorAction::SelectAction(Some(ActionId(9))));
        state.form.name = Some("Renamed".into());
        let result = reducer(&mut state, EditorAction::Submit);
        assert_effect!(
            result.effects,
            Effect::SaveAction { generation: 2, target: SaveTarget::Update(ActionId(9)), .. }
        );
    }

    #[test]
    fn test_stale_save_is_ignored() {
        let mut state = EditorState::default();
        named_draft(&mut state, "Sign up");
        reducer(&mut state, EditorAction::Submit);
        reducer(&mut state, EditorAction::Submit);
        assert_eq!(state.save_generation, 2);

        let stale = reducer(
            &mut state,
            EditorAction::SaveDidSucceed {
                generation: 1,
                action: ActionRecord::new(ActionId(5), "Sign up"),
            },
        );
        assert!(!stale.changed);
        assert!(stale.effects.is_empty());
        assert_eq!(state.selection, Selection::Creating);

        let fresh = reducer(
            &mut state,
            EditorAction::SaveDidSucceed {
                generation: 2,
                action: ActionRecord::new(ActionId(5), "Sign up"),
            },
        );
        assert_effect!(fresh.effects, Effect::RegistryUpdate(record) if record.id == ActionId(5));
        assert_effect!(fresh.effects, Effect::Notify(Notification::ActionSaved(ActionId(5))));
        assert_eq!(state.selection, Selection::Idle);
        assert!(!state.saving);
    }

    #[test]
    fn test_save_failure_reports() {
        let mut state = EditorState::default();
        named_draft(&mut state, "Sign up");
        reducer(&mut state, EditorAction::Submit);
        let result = reducer(
            &mut state,
            EditorAction::SaveDidFail {
                generation: 1,
                error: "boom".into(),
            },
        );
        assert_effect!(result.effects, Effect::ReportError(msg) if msg.contains("boom"));
        assert_eq!(state.selection, Selection::Creating);
    }

    #[test]
    fn test_delete_requires_existing_action() {
        let mut state = EditorState::default();
        assert!(!reducer(&mut state, EditorAction::Delete).has_effects());

        named_draft(&mut state, "x");
        assert!(!reducer(&mut state, EditorAction::Delete).has_effects());

        reducer(&mut state, EditorAction::SelectAction(Some(ActionId(3))));
        let result = reducer(&mut state, EditorAction::Delete);
        assert_eq!(
            result.effects,
            vec![Effect::DeleteAction {
                generation: 1,
                id: ActionId(3)
            }]
        );

        let done = reducer(
            &mut state,
            EditorAction::DeleteDidSucceed {
                generation: 1,
                id: ActionId(3),
            },
        );
        assert_effect!(done.effects, Effect::RegistryRemove(ActionId(3)));
        assert_effect!(done.effects, Effect::Notify(Notification::ActionDeleted));
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn test_hide_button_actions_hides_tooltip() {
        let mut state = EditorState::default();
        reducer(&mut state, EditorAction::ShowButtonActions);
        reducer(&mut state, EditorAction::SetShowActionsTooltip(true));

        let result = reducer(&mut state, EditorAction::HideButtonActions);
        assert!(!state.button_actions_visible);
        assert!(!state.show_actions_tooltip);
        assert_eq!(
            result.effects,
            vec![
                Effect::CancelTooltipDismiss,
                Effect::CaptureModeToggled { enabled: false }
            ]
        );
    }

    #[test]
    fn test_tooltip_expiry_respects_generation() {
        let mut state = EditorState::default();
        reducer(&mut state, EditorAction::SetShowActionsTooltip(true));
        reducer(&mut state, EditorAction::SetShowActionsTooltip(false));
        let result = reducer(&mut state, EditorAction::SetShowActionsTooltip(true));
        assert_effect!(result.effects, Effect::ScheduleTooltipDismiss { generation: 3 });

        assert!(!reducer(&mut state, EditorAction::TooltipDidExpire { generation: 1 }).changed);
        assert!(state.show_actions_tooltip);

        reducer(&mut state, EditorAction::TooltipDidExpire { generation: 3 });
        assert!(!state.show_actions_tooltip);
    }

    #[test]
    fn test_first_load_routes_intent() {
        let mut state = EditorState {
            user_intent: Some(UserIntent::EditAction),
            intent_action_id: Some(ActionId(7)),
            ..EditorState::default()
        };
        let result = reducer(&mut state, EditorAction::ActionsDidLoad);
        assert_eq!(state.selection, Selection::Editing(ActionId(7)));
        assert_effect!(result.effects, Effect::ClearUserIntent);
        assert_eq!(state.user_intent, None);

        let mut state = EditorState {
            user_intent: Some(UserIntent::AddAction),
            ..EditorState::default()
        };
        reducer(&mut state, EditorAction::ActionsDidLoad);
        assert_eq!(state.selection, Selection::Creating);

        let mut state = EditorState::default();
        let result = reducer(&mut state, EditorAction::ActionsDidLoad);
        assert!(state.show_actions_tooltip);
        assert_eq!(count_effects!(result.effects, Effect::ScheduleTooltipDismiss { .. }), 1);
        assert_no_effect!(result.effects, Effect::ClearUserIntent);
    }
}
