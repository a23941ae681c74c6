use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, ZeroStepSetting};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (defaults are used when it does not exist)
    #[arg(long, default_value = "motor-ramp.toml")]
    pub config: PathBuf,

    /// Run against simulated outputs even when GPIO is available
    #[arg(long, default_value_t = false)]
    pub simulate: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Accelerate, hold, decelerate and rest, repeatedly
    Cycle {
        /// Stop after this many cycles (default: run until Ctrl-C)
        #[arg(long)]
        cycles: Option<u64>,

        /// Behaviour of ramps whose endpoints are equal (overrides config)
        #[arg(long, value_enum)]
        zero_step: Option<ZeroStepSetting>,
    },

    /// Interactive forward / reverse / stop menu
    Menu {
        /// Do not clear the terminal before drawing the menu
        #[arg(long, default_value_t = false)]
        no_clear: bool,

        /// Behaviour of ramps whose endpoints are equal (overrides config)
        #[arg(long, value_enum)]
        zero_step: Option<ZeroStepSetting>,
    },
}

impl Command {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        match *self {
            Command::Cycle { zero_step, .. } => {
                if let Some(zero_step) = zero_step {
                    cfg.cycle.zero_step = zero_step;
                }
            }
            Command::Menu { no_clear, zero_step } => {
                if no_clear {
                    cfg.menu.clear_screen = false;
                }
                if let Some(zero_step) = zero_step {
                    cfg.menu.zero_step = zero_step;
                }
            }
        }
    }
}
