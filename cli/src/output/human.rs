//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::deploy::StatusReport;
use crate::domain::PusherConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("pusher v{version}");
    }

    /// Render Wi-Fi and adb state.
    pub fn render_status(&self, status: &StatusReport) {
        let or_none = |s: &str| {
            if s.is_empty() {
                "(none)".to_string()
            } else {
                s.to_string()
            }
        };
        self.ctx.kv("Interface:", &status.interface);
        self.ctx.kv("Wi-Fi:", &or_none(&status.ssid));
        self.ctx.kv("Address:", &or_none(&status.address));
        if status.on_robot_network {
            self.ctx
                .success(&format!("on robot subnet {}", status.subnet));
        } else {
            self.ctx
                .warn(&format!("not on robot subnet {}", status.subnet));
        }
        if status.bridge_connected {
            self.ctx
                .success(&format!("adb connected to {}", status.bridge_address));
        } else {
            self.ctx
                .warn(&format!("adb not connected to {}", status.bridge_address));
        }
    }

    /// Render the configured robot profiles, marking the default.
    pub fn render_profiles(&self, config: &PusherConfig, path: &Path) {
        if config.profiles.is_empty() {
            if !self.ctx.quiet {
                println!("No robot profiles configured. Add one: pusher profile add");
            }
            return;
        }
        if !self.ctx.quiet {
            println!(
                "  {}",
                format!("Profiles ({})", path.display()).style(self.ctx.styles.header)
            );
            println!();
        }
        for (name, entry) in &config.profiles {
            let padded = format!("{name:<16}");
            if *name == config.default_profile {
                println!(
                    "  {} {} {}",
                    "*".style(self.ctx.styles.success),
                    padded.style(self.ctx.styles.bold),
                    entry.ssid
                );
            } else {
                println!("    {padded} {}", entry.ssid);
            }
        }
    }
}
