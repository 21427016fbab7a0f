//! Terminal stand-ins for the browser toolbar

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use toolbar_actions::{Notifier, Telemetry, ToastButton, ToolbarHost};

/// Toolbar chrome that only logs what it would show.
#[derive(Debug, Default)]
pub struct HeadlessToolbar {
    button_visible: AtomicBool,
}

impl ToolbarHost for HeadlessToolbar {
    fn button_visible(&self) -> bool {
        self.button_visible.load(Ordering::Relaxed)
    }

    fn show_button(&self) {
        self.button_visible.store(true, Ordering::Relaxed);
        tracing::debug!("Toolbar button shown");
    }

    fn set_visible_menu(&self, menu: &str) {
        tracing::debug!(menu, "Toolbar menu opened");
    }

    fn clear_user_intent(&self) {
        tracing::debug!("User intent cleared");
    }
}

/// Telemetry that goes to the log instead of the backend.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn capture(&self, event: &str, properties: Value) {
        tracing::info!(event, %properties, "Telemetry");
    }
}

/// Toasts printed to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str, button: Option<ToastButton>) {
        match button {
            Some(button) => println!("{message} ({}: {})", button.label, button.url),
            None => println!("{message}"),
        }
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
