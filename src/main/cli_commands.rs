// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use deskpet::cli::SettingsCommands;
use deskpet::config::SettingsStore;
use deskpet::error::Result;
use deskpet::gui::session::adapter_for;
use deskpet::llm::EngineLoader;
use deskpet::models::{scan_custom_path, scan_for_models, DiscoveredModel};

pub(super) fn run_ask(
    store: &SettingsStore,
    loader: Arc<dyn EngineLoader>,
    message: &str,
    out: &mut impl Write,
) -> Result<()> {
    let (settings, _) = store.load_repaired();
    let adapter = adapter_for(store, &settings, loader);

    if !adapter.load() {
        eprintln!(
            "Model could not be loaded ({}). Run with -v for details.",
            adapter.model_path().display()
        );
    }
    writeln!(out, "{}", adapter.chat(message))?;
    Ok(())
}

pub(super) fn run_models_command(
    store: &SettingsStore,
    extra: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let mut models = scan_for_models(store.app_root());
    if let Some(dir) = extra {
        models.extend(scan_custom_path(dir));
    }
    print_models(store, &models, out)
}

pub(super) fn print_models(store: &SettingsStore, models: &[DiscoveredModel], out: &mut impl Write) -> Result<()> {
    if models.is_empty() {
        writeln!(
            out,
            "No GGUF models found. Put a .gguf file in {}",
            store.models_dir().display()
        )?;
        return Ok(());
    }

    for model in models {
        writeln!(out, "{}  {}", model.display_name(), model.size_display())?;
        writeln!(out, "    {}", model.path.display())?;
    }
    Ok(())
}

pub(super) fn run_settings_command(
    store: &SettingsStore,
    command: Option<SettingsCommands>,
    out: &mut impl Write,
) -> Result<()> {
    match command.unwrap_or(SettingsCommands::Show) {
        SettingsCommands::Show => {
            let (settings, _) = store.load_repaired();
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
        }
        SettingsCommands::Path => {
            writeln!(out, "{}", store.path().display())?;
        }
        SettingsCommands::Reset => {
            store.reset()?;
            writeln!(out, "Settings reset: {}", store.path().display())?;
        }
    }
    Ok(())
}
