use std::io;

use anyhow::Context;
use clap::Parser;

use motor_ramp::app::{self, Menu, Outcome, StdinLines};
use motor_ramp::cli::{Args, Command};
use motor_ramp::config::AppConfig;
use motor_ramp::core::{logging, shutdown};
use motor_ramp::libraries::MotorSession;
use motor_ramp::platform::{self, BoardMode};
use motor_ramp::{log_info, log_warn};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut cfg = AppConfig::load_or_default(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    args.command.apply_overrides(&mut cfg);

    let mut signal = shutdown::install_ctrlc_handler().context("installing Ctrl-C handler")?;

    let board = platform::connect(&cfg.pins, &cfg.pwm, args.simulate).context("setting up motor outputs")?;
    let (mode, driver) = board.into_driver();
    if mode == BoardMode::Simulated {
        println!("Running in simulated mode: no motor will move.");
    }

    let mut session = MotorSession::new(driver);
    session.enable().context("enabling the BTS7960")?;
    log_info!("Motor driver ready ({} mode)", mode);

    let outcome = match args.command {
        Command::Cycle { cycles, .. } => {
            println!("Starting motor cycle. Press Ctrl-C to stop.");
            app::run_cycle(&mut *session, &mut signal, &cfg.cycle, cycles)?
        }
        Command::Menu { .. } => {
            let input = StdinLines::spawn(signal.clone()).context("starting stdin reader")?;
            Menu::new(&cfg.menu, input, io::stdout().lock()).run(&mut *session, &mut signal)?
        }
    };

    match outcome {
        Outcome::Interrupted => println!("\nInterrupted by operator (Ctrl-C)."),
        Outcome::InputClosed => log_warn!("Input closed, shutting down"),
        Outcome::Completed | Outcome::Quit => {}
    }
    log_info!("Program ended: {}", outcome);

    println!("Cleaning up GPIO...");
    session.finish().context("releasing motor outputs")?;
    println!("Motor stopped and GPIO released. Goodbye.");
    Ok(())
}
