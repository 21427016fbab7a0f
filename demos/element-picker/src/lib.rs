//! Element picker for a host page
//!
//! The toolbar's picker overlay is owned by the host, not the editor. This
//! crate shows the host side: its own action enum, derived through the
//! `toolbar_actions` facade, and a [`Picker`] that hands the chosen element
//! to [`ActionEditor::inspect_element_selected`].

use toolbar_actions::prelude::*;

#[derive(Action, Clone, Debug)]
pub enum PickerAction {
    /// Start picking for a step; `None` targets the first step
    #[action(category = "picker")]
    Open { index: Option<usize> },
    #[action(category = "picker")]
    Hover(ElementRef),
    #[action(category = "picker")]
    Cancel,
    /// The user clicked an element while the overlay was open
    ElementDidPick(ElementRef),
}

#[derive(Debug, Default)]
pub struct Picker {
    /// Step index being picked for, while the overlay is open
    target: Option<Option<usize>>,
    hovered: Option<ElementRef>,
}

impl Picker {
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn hovered(&self) -> Option<&ElementRef> {
        self.hovered.as_ref()
    }

    pub fn apply(&mut self, editor: &mut ActionEditor, action: PickerAction) {
        match action {
            PickerAction::Open { index } => {
                self.target = Some(index);
                editor.inspect_for_element_with_index(index);
            }
            PickerAction::Hover(element) => {
                if self.is_open() {
                    self.hovered = Some(element);
                }
            }
            PickerAction::Cancel => {
                self.target = None;
                self.hovered = None;
            }
            PickerAction::ElementDidPick(element) => {
                self.hovered = None;
                if let Some(index) = self.target.take() {
                    editor.inspect_element_selected(element, index);
                }
            }
        }
    }
}
