//! toolbar-actions: state for the toolbar's actions editor
//!
//! Select an existing action or start a new one from a clicked element,
//! edit its steps and selectors, then save it back. All state changes go
//! through dispatched actions and a pure reducer.
//!
//! # Example
//! ```ignore
//! use toolbar_actions::prelude::*;
//!
//! editor.select_action(Some(ActionId(42)));
//! editor.inspect_for_element_with_index(Some(0));
//! editor.inspect_element_selected(element, Some(0));
//! editor.submit();
//! ```

// Re-export everything from core
pub use toolbar_actions_core::*;

// Re-export derive macros
pub use toolbar_actions_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    pub use toolbar_actions_core::prelude::*;

    // Store
    pub use toolbar_actions_core::{DispatchResult, EffectStore, LoggingMiddleware, Middleware};

    // Derive macros
    pub use toolbar_actions_macros::Action;
}
