// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HaiXiaoTang - a desktop pet you can chat with
#[derive(Parser, Debug)]
#[command(name = "deskpet")]
#[command(version, about = "A desktop pet backed by a local LLM")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Application root holding `image/` and `models/`
    #[arg(long, global = true)]
    pub app_root: Option<PathBuf>,

    /// Config file path (defaults to <app-root>/models/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the desktop pet (default when no command given)
    Run,

    /// Ask the pet one question and print the reply
    Ask(AskArgs),

    /// List GGUF models the pet can find
    Models(ModelsArgs),

    /// Show or reset the configuration
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the ask subcommand
#[derive(clap::Args, Debug, PartialEq)]
pub struct AskArgs {
    /// What to say to the pet
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl AskArgs {
    pub fn message(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for the models subcommand
#[derive(clap::Args, Debug, PartialEq)]
pub struct ModelsArgs {
    /// Also scan this directory
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the settings subcommand
#[derive(clap::Args, Debug, PartialEq)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommands>,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCommands {
    /// Print the settings as loaded (after path repair)
    Show,

    /// Print the config file location
    Path,

    /// Reset configuration to defaults
    Reset,
}
