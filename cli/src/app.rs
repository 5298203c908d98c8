//! Application context — unified state passed to every command handler.
//!
//! `AppContext` replaces the per-command pattern of constructing loose
//! `OutputContext`, runner, and store instances. Adding a new cross-cutting
//! concern requires only one field change here.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::ProfileStore;
use crate::application::services::associator::StrategyAssociator;
use crate::application::services::bridge::BridgeConnector;
use crate::domain::Settings;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlProfileStore;
use crate::infra::wifi::{SystemWifi, WifiJoin};
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `PUSHER_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Profile and settings persistence.
    pub store: YamlProfileStore,
    /// Fired by Ctrl-C; every retry loop and the build observe it.
    pub cancel: CancellationToken,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `PUSHER_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config path cannot be resolved (home directory not found).
    pub fn new(flags: &AppFlags, cancel: CancellationToken) -> Result<Self> {
        let ci_env = std::env::var_os("CI").is_some() || std::env::var_os("PUSHER_YES").is_some();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            // JSON mode keeps stdout for the final document only.
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            store: YamlProfileStore::from_env()?,
            cancel,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Human renderer over this context's output styles.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Resolve runtime settings from the current config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or holds invalid values.
    pub fn settings(&self) -> Result<Settings> {
        Settings::from_config(&self.store.load()?)
    }

    /// Wi-Fi probe and radio control for the configured interface.
    #[must_use]
    pub fn wifi(&self, settings: &Settings) -> SystemWifi<TokioCommandRunner> {
        SystemWifi::new(TokioCommandRunner::default(), settings.interface.clone())
            .with_cancel(self.cancel.clone())
    }

    /// Associator trying this platform's join strategies in order.
    #[must_use]
    pub fn associator(
        &self,
        wifi: &SystemWifi<TokioCommandRunner>,
    ) -> StrategyAssociator<WifiJoin<TokioCommandRunner>> {
        StrategyAssociator::new(wifi.join_strategies())
    }

    /// Associator for rejoining the previous network. It leaves the radio
    /// alone because `exit` power-cycles as its own fallback.
    #[must_use]
    pub fn restore_associator(
        &self,
        wifi: &SystemWifi<TokioCommandRunner>,
    ) -> StrategyAssociator<WifiJoin<TokioCommandRunner>> {
        StrategyAssociator::new(wifi.restore_strategies())
    }

    /// adb bridge for the configured robot address.
    #[must_use]
    pub fn bridge(&self, settings: &Settings) -> BridgeConnector<TokioCommandRunner> {
        BridgeConnector::new(
            TokioCommandRunner::default(),
            settings.bridge_address.clone(),
            settings.bridge_retry,
        )
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `PUSHER_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    /// Prompt for a line of text. Fails when prompts are disabled.
    ///
    /// # Errors
    ///
    /// Returns an error in non-interactive mode or if the prompt fails.
    pub fn prompt_text(&self, prompt: &str, initial: Option<&str>) -> Result<String> {
        anyhow::ensure!(
            !self.non_interactive,
            "'{prompt}' is required in non-interactive mode; pass it as a flag"
        );
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(initial.is_some());
        if let Some(initial) = initial {
            input = input.with_initial_text(initial);
        }
        Ok(input.interact_text()?)
    }

    /// Prompt for a secret with hidden input. Empty input is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error in non-interactive mode or if the prompt fails.
    pub fn prompt_secret(&self, prompt: &str) -> Result<String> {
        anyhow::ensure!(
            !self.non_interactive,
            "'{prompt}' is required in non-interactive mode; pass it as a flag"
        );
        Ok(dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }
}
