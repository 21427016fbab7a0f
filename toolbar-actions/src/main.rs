//! toolbar-actions - run the actions editor headlessly
//!
//! Drives the same controller the toolbar uses against the REST API, with
//! elements read from JSON snapshots instead of a live page.
//!
//! # Usage
//!
//! ```sh
//! # List actions
//! toolbar-actions --api-url https://app.posthog.com --token $TOKEN list
//!
//! # Create an action from a captured element
//! toolbar-actions --config toolbar.json create --name "Sign up" --element button.json
//!
//! # Delete one
//! RUST_LOG=toolbar_actions_core=debug toolbar-actions --config toolbar.json delete --id 42
//! ```

mod host;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use toolbar_actions::{
    ActionEditor, ActionId, Collaborators, DebugState, EditorAction, HttpActionStore,
    InMemoryRegistry, RemoteActionStore, SelectorStepCapture, SnapshotElement, ToolbarConfig,
};

use crate::host::{ConsoleNotifier, HeadlessToolbar, LogTelemetry};

/// Manage toolbar actions from the terminal
#[derive(Parser, Debug)]
#[command(name = "toolbar-actions")]
#[command(about = "Create, list and delete actions through the toolbar editor")]
struct Args {
    /// Toolbar config JSON (apiURL, temporaryToken, dataAttributes, ...)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Overrides apiURL from the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides temporaryToken from the config file
    #[arg(long)]
    token: Option<String>,

    /// Print editor state after the command
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved actions
    List,
    /// Create an action with one step captured from an element snapshot
    Create {
        #[arg(long)]
        name: String,
        /// Element snapshot JSON
        #[arg(long)]
        element: PathBuf,
        /// Page URL recorded on the step
        #[arg(long)]
        url: Option<String>,
    },
    /// Delete an action by id
    Delete {
        #[arg(long)]
        id: u64,
    },
}

fn load_config(args: &Args) -> anyhow::Result<ToolbarConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<ToolbarConfig>(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ToolbarConfig::default(),
    };
    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(token) = &args.token {
        config.temporary_token = Some(token.clone());
    }
    config.validate()?;
    Ok(config)
}

struct Session {
    editor: ActionEditor,
    registry: Arc<InMemoryRegistry>,
}

impl Session {
    fn new(config: ToolbarConfig, store: Arc<HttpActionStore>, page_url: Option<String>) -> Self {
        let registry = Arc::new(InMemoryRegistry::default());
        let capture = match page_url {
            Some(url) => SelectorStepCapture::new(url),
            None => SelectorStepCapture::default(),
        };
        let editor = ActionEditor::new(
            config,
            Collaborators {
                registry: registry.clone(),
                toolbar: Arc::new(HeadlessToolbar::default()),
                telemetry: Arc::new(LogTelemetry),
                notifier: Arc::new(ConsoleNotifier),
                store,
                capture: Arc::new(capture),
            },
        );
        Self { editor, registry }
    }

    /// Wait for the pending save or delete.
    async fn finish(&mut self) -> anyhow::Result<EditorAction> {
        if !self.editor.is_busy() {
            let errors = self.editor.visible_errors();
            match errors.name {
                Some(message) => bail!("{message}"),
                None => bail!("nothing to do"),
            }
        }
        match self.editor.next_completion().await {
            Some(EditorAction::SaveDidFail { error, .. } | EditorAction::DeleteDidFail { error, .. }) => {
                bail!(error)
            }
            Some(action) => Ok(action),
            None => bail!("editor stopped before the request finished"),
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let store = Arc::new(HttpActionStore::new(&config));

    match args.command {
        Command::List => {
            for action in store.list().await? {
                println!(
                    "{:>8}  {}",
                    action.id,
                    action.name.as_deref().unwrap_or("(unnamed)")
                );
            }
        }
        Command::Create { name, element, url } => {
            let json = std::fs::read_to_string(&element)
                .with_context(|| format!("reading {}", element.display()))?;
            let snapshot: SnapshotElement =
                serde_json::from_str(&json).context("parsing element snapshot")?;

            let mut session = Session::new(config, store, url);
            session.editor.new_action(Some(snapshot.into_ref()));
            session.editor.set_action_name(name);
            session.editor.submit();
            if let EditorAction::SaveDidSucceed { action, .. } = session.finish().await? {
                tracing::info!(id = %action.id, "Action created");
            }

            if args.debug {
                print_debug(&session.editor);
            }
        }
        Command::Delete { id } => {
            let mut session = Session::new(config, store.clone(), None);
            session.registry.set_actions(store.list().await?);
            session.editor.select_action(Some(ActionId(id)));
            if session.editor.selected_action().is_none() {
                bail!("no action with id {id}");
            }
            session.editor.delete_action();
            session.finish().await?;

            if args.debug {
                print_debug(&session.editor);
            }
        }
    }
    Ok(())
}

fn print_debug(editor: &ActionEditor) {
    for section in editor.state().debug_sections() {
        print!("{section}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    run(Args::parse()).await
}
