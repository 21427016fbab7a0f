//! End-to-end editor flows against the in-memory collaborators

use std::time::Duration;

use toolbar_actions::form::NAME_REQUIRED;
use toolbar_actions::testing::{EditorHarness, StoreCall, Toast, ToolbarCall};
use toolbar_actions::{
    ActionId, ActionRecord, ActionStep, ActionsRegistry, EditorAction, FormOptions,
    SelectedActionId, SnapshotElement, UserIntent,
};

fn page_link(text: &str, href: &str) -> SnapshotElement {
    SnapshotElement::new("A")
        .with_attr("href", href)
        .with_attr("class", "nav-link active")
        .with_text(text)
        .with_parent(
            SnapshotElement::new("NAV")
                .with_attr("id", "main-nav")
                .with_parent(SnapshotElement::document_root()),
        )
}

fn checkout_record() -> ActionRecord {
    ActionRecord::new(ActionId(42), "Checkout")
        .with_step(ActionStep {
            selector: Some("#cart".into()),
            ..ActionStep::default()
        })
        .with_step(ActionStep {
            selector: Some(".pay".into()),
            text: Some("Pay now".into()),
            ..ActionStep::default()
        })
}

#[tokio::test]
async fn test_edit_selector_and_save() {
    let mut h = EditorHarness::with_actions(vec![checkout_record()]);
    h.editor.select_action(Some(ActionId(42)));

    h.editor.edit_selector_with_index(Some(1));
    assert_eq!(h.editor.editing_selector_value(), Some(".pay"));
    h.editor.set_element_selector("#pay-button", 1);
    assert_eq!(h.editor.editing_selector_value(), Some("#pay-button"));

    h.editor.submit();
    let done = h.editor.next_completion().await;
    assert!(matches!(done, Some(EditorAction::SaveDidSucceed { .. })));

    let calls = h.store.calls();
    let [StoreCall::Update(id, payload)] = &calls[..] else {
        panic!("expected one update, got {calls:?}");
    };
    assert_eq!(*id, ActionId(42));
    assert_eq!(payload.steps[0].selector.as_deref(), Some("#cart"));
    assert_eq!(payload.steps[1].selector.as_deref(), Some("#pay-button"));
    assert_eq!(payload.steps[1].text.as_deref(), Some("Pay now"));
}

#[test]
fn test_select_zero_means_nothing_selected() {
    let mut h = EditorHarness::with_actions(vec![checkout_record()]);
    h.editor.select_action(Some(ActionId(42)));
    h.editor.select_action(Some(ActionId(0)));

    assert_eq!(h.editor.selected_action_id(), None);
    assert_eq!(h.editor.selected_action(), None);
}

#[test]
fn test_remove_step_shifts_element_chains() {
    let mut h = EditorHarness::new();
    h.editor
        .new_action(Some(page_link("Pricing", "/pricing").into_ref()));
    h.editor.add_step();
    h.editor.inspect_for_element_with_index(Some(1));
    h.editor
        .inspect_element_selected(page_link("Docs", "/docs").into_ref(), Some(1));

    let keys: Vec<_> = h.editor.state().elements_chains.keys().copied().collect();
    assert_eq!(keys, vec![0, 1]);

    h.editor.edit_selector_with_index(Some(1));
    h.editor.remove_step(0);

    assert_eq!(h.editor.form().steps.len(), 1);
    assert_eq!(h.editor.form().steps[0].step.href.as_deref(), Some("/docs"));
    assert_eq!(h.editor.state().editing_selector, Some(0));
    let chain = h.editor.elements_chain_being_edited();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].text.as_deref(), Some("Docs"));
    assert_eq!(chain[1].attr_id.as_deref(), Some("main-nav"));
}

#[test]
fn test_captured_link_step() {
    let mut h = EditorHarness::new();
    h.editor
        .new_action(Some(page_link("  Pricing \n plans ", "/pricing").into_ref()));

    let step = &h.editor.form().steps[0];
    assert_eq!(step.selector(), Some("a.nav-link.active"));
    assert_eq!(step.step.text.as_deref(), Some("Pricing plans"));
    assert_eq!(step.step.url.as_deref(), Some(EditorHarness::PAGE_URL));
    assert!(step.selector_selected);
    assert!(step.href_selected);
    assert!(!step.text_selected);
    assert!(!step.url_selected);
}

#[tokio::test]
async fn test_pinned_at_is_saved() {
    let mut h = EditorHarness::new();
    h.editor.new_action(None);
    h.editor.set_action_name("Pinned");
    h.editor
        .set_pinned_at(Some("2026-10-18T09:00:00Z".to_string()));
    h.editor.submit();
    h.editor.next_completion().await;

    let saved = h.registry.actions();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].pinned_at.as_deref(), Some("2026-10-18T09:00:00Z"));
}

#[test]
fn test_always_show_errors() {
    let config = EditorHarness::default_config().with_form_options(FormOptions {
        show_errors_on_touch: false,
        always_show_errors: true,
    });
    let mut h = EditorHarness::with_config(config, Vec::new());
    h.editor.new_action(None);

    assert_eq!(h.editor.visible_errors().name, Some(NAME_REQUIRED));
    h.editor.set_action_name("Named");
    assert_eq!(h.editor.visible_errors().name, None);
}

#[tokio::test]
async fn test_delete_failure_keeps_selection() {
    let mut h = EditorHarness::with_actions(vec![checkout_record()]);
    h.store.fail_next(404, "not found");
    h.editor.select_action(Some(ActionId(42)));
    h.editor.delete_action();
    h.editor.next_completion().await;

    assert_eq!(
        h.editor.selected_action_id(),
        Some(SelectedActionId::Id(ActionId(42)))
    );
    assert!(h.registry.find(ActionId(42)).is_some());
    assert!(matches!(
        &h.notifier.toasts()[..],
        [Toast::Error(message)] if message.starts_with("Could not delete action")
    ));
}

#[tokio::test]
async fn test_add_action_intent_opens_draft() {
    let config = EditorHarness::default_config().with_user_intent(UserIntent::AddAction, None);
    let mut h = EditorHarness::with_config(config, Vec::new());

    h.editor.actions_loaded();

    assert_eq!(h.editor.selected_action_id(), Some(SelectedActionId::New));
    assert_eq!(h.toolbar.calls(), vec![ToolbarCall::ClearUserIntent]);

    // Intent is consumed by the first load only
    h.editor.select_action(None);
    h.editor.actions_loaded();
    assert_eq!(h.editor.selected_action_id(), None);
}

#[tokio::test(start_paused = true)]
async fn test_first_load_without_intent_flashes_tooltip() {
    let config = EditorHarness::default_config()
        .with_user_intent(UserIntent::Other("heatmaps".into()), None);
    let mut h = EditorHarness::with_config(config, Vec::new());
    let start = tokio::time::Instant::now();

    h.editor.actions_loaded();
    assert!(h.editor.state().show_actions_tooltip);
    assert!(h.toolbar.calls().is_empty());

    let done = h.editor.next_completion().await;
    assert!(matches!(done, Some(EditorAction::TooltipDidExpire { .. })));
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert!(!h.editor.state().show_actions_tooltip);
}

#[tokio::test(start_paused = true)]
async fn test_tooltip_delay_is_configurable() {
    let mut config = EditorHarness::default_config();
    config.tooltip_dismiss_ms = 250;
    let mut h = EditorHarness::with_config(config, Vec::new());
    let start = tokio::time::Instant::now();

    h.editor.set_show_actions_tooltip(true);
    h.editor.next_completion().await;

    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(250) && waited < Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_hiding_button_cancels_tooltip() {
    let mut h = EditorHarness::new();
    h.editor.show_button_actions();
    h.editor.set_show_actions_tooltip(true);
    h.editor.hide_button_actions();

    assert!(!h.editor.state().show_actions_tooltip);
    let fired = tokio::time::timeout(Duration::from_secs(5), h.editor.next_completion()).await;
    assert!(fired.is_err());
}
