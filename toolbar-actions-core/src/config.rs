//! Toolbar configuration consumed by the editor
//!
//! The toolbar receives its parameters as a JSON blob from the host page
//! (`apiURL`, `temporaryToken`, `dataAttributes`, `userIntent`, `actionId`).
//! The editor only reads it.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::form::FormOptions;
use crate::model::ActionId;

/// Delay before the actions tooltip hides itself
pub const DEFAULT_TOOLTIP_DISMISS_MS: u64 = 1000;

/// Why the toolbar was opened.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum UserIntent {
    /// Open the editor on `actionId`
    EditAction,
    /// Open the editor on a blank action
    AddAction,
    Other(String),
}

impl From<String> for UserIntent {
    fn from(value: String) -> Self {
        match value.as_str() {
            "edit-action" => UserIntent::EditAction,
            "add-action" => UserIntent::AddAction,
            _ => UserIntent::Other(value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolbarConfig {
    #[serde(rename = "apiURL")]
    pub api_url: String,
    pub temporary_token: Option<String>,
    /// Data attributes preferred for selectors; `data-*` matches by prefix
    pub data_attributes: Vec<String>,
    pub user_intent: Option<UserIntent>,
    pub action_id: Option<ActionId>,
    pub form: FormOptions,
    pub tooltip_dismiss_ms: u64,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            temporary_token: None,
            data_attributes: Vec::new(),
            user_intent: None,
            action_id: None,
            form: FormOptions::default(),
            tooltip_dismiss_ms: DEFAULT_TOOLTIP_DISMISS_MS,
        }
    }
}

impl ToolbarConfig {
    pub fn new(api_url: impl Into<String>, temporary_token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            temporary_token: Some(temporary_token.into()),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON toolbar config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::MissingApiUrl);
        }
        url::Url::parse(self.api_url()).map_err(|source| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            source,
        })?;
        Ok(())
    }

    /// API base without a trailing slash
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn tooltip_delay(&self) -> Duration {
        Duration::from_millis(self.tooltip_dismiss_ms)
    }

    pub fn with_data_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user_intent(mut self, intent: UserIntent, action_id: Option<ActionId>) -> Self {
        self.user_intent = Some(intent);
        self.action_id = action_id;
        self
    }

    pub fn with_form_options(mut self, form: FormOptions) -> Self {
        self.form = form;
        self
    }
}
