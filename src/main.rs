// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! deskpet - desktop pet with a local LLM
//!
//! Entry point for the desktop window and the helper commands.

use clap::Parser;

use deskpet::cli::{Cli, Commands};
use deskpet::config::SettingsStore;
use deskpet::llm::default_loader;
use deskpet::utils;

#[path = "main/cli_commands.rs"]
mod cli_commands;

use cli_commands::{run_ask, run_models_command, run_settings_command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` turns on the crate's own targets; `RUST_LOG` still wins.
    if cli.verbose > 0 {
        for directive in [
            "deskpet.chat=debug",
            "deskpet.llm=debug",
            "deskpet.settings=debug",
            "deskpet.gui=debug",
        ] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let app_root = utils::resolve_app_root(cli.app_root.as_deref());
    let store = match cli.config {
        Some(path) => SettingsStore::with_path(&app_root, path),
        None => SettingsStore::new(&app_root),
    };
    tracing::debug!(target: "deskpet.settings", app_root = %app_root.display(), config = %store.path().display(), "Resolved paths");

    let mut out = std::io::stdout();
    match cli.command {
        None | Some(Commands::Run) => deskpet::gui::run(store)?,
        Some(Commands::Ask(args)) => run_ask(&store, default_loader(), &args.message(), &mut out)?,
        Some(Commands::Models(args)) => run_models_command(&store, args.path.as_deref(), &mut out)?,
        Some(Commands::Settings(args)) => run_settings_command(&store, args.command, &mut out)?,
    }

    Ok(())
}
