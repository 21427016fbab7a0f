//! Effects - side effects declared by the reducer
//!
//! The reducer never talks to collaborators. It returns a [`DispatchResult`]
//! listing the effects a transition needs, and the editor runs them after
//! the state update has been applied. Async effects are started through the
//! task manager and report back with `*Did*` actions.

use crate::model::{ActionId, ActionPayload, ActionRecord};

/// Menu shown when an action is opened for editing
pub const ACTIONS_MENU: &str = "actions";

/// Result of dispatching an action to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch, in order.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Append an effect.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    #[inline]
    pub fn mark_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    /// Fold in the result of a nested transition, keeping effect order.
    pub fn merge(mut self, other: DispatchResult<E>) -> Self {
        self.changed |= other.changed;
        self.effects.extend(other.effects);
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Where a save goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(ActionId),
}

/// Toasts the editor raises.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Saved; offers a link to the action in the main app
    ActionSaved(ActionId),
    ActionDeleted,
}

/// Side effects requested by the reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Show the toolbar button if the host has it hidden
    ShowToolbarButton,
    SetVisibleMenu(&'static str),
    /// Usage telemetry for actions mode being switched on or off
    CaptureModeToggled { enabled: bool },
    ScheduleTooltipDismiss { generation: u64 },
    CancelTooltipDismiss,
    SaveAction {
        generation: u64,
        target: SaveTarget,
        payload: ActionPayload,
    },
    DeleteAction { generation: u64, id: ActionId },
    RegistryUpdate(ActionRecord),
    RegistryRemove(ActionId),
    Notify(Notification),
    ClearUserIntent,
    /// Hand a failure to the generic error surface
    ReportError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_order_and_changed() {
        let first: DispatchResult<Effect> = DispatchResult::unchanged().with(Effect::ShowToolbarButton);
        let second = DispatchResult::changed_with(Effect::SetVisibleMenu(ACTIONS_MENU));

        let merged = first.merge(second);
        assert!(merged.changed);
        assert_eq!(
            merged.effects,
            vec![Effect::ShowToolbarButton, Effect::SetVisibleMenu(ACTIONS_MENU)]
        );
    }

    #[test]
    fn test_has_effects() {
        let r: DispatchResult<Effect> = DispatchResult::changed();
        assert!(!r.has_effects());
        assert!(r.with(Effect::ClearUserIntent).has_effects());
    }
}
