#![forbid(unsafe_code)]

mod calibration;
mod cli;
mod config;
mod constants;
mod display;
mod error;
mod persistence;
mod platform;
mod script;
mod state;
mod text;
mod types;

#[cfg(test)]
mod test_support;

use clap::Parser;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command};
use config::Settings;
use constants::{env, paths};
use error::{Error, ErrorKind, Result};
use platform::{Host, Platform, PredefinedScript};
use script::{Script, ScriptExecutor};
use state::BootState;
use types::{Display, OperatingSystem, OptionValue};

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = err.kind();
            debug!(error = ?err, kind = ?kind, "Command failed");
            eprintln!("Error: {err}");
            if kind == ErrorKind::Usage {
                eprintln!("Run 'next-boot --help' for usage.");
            }
            ExitCode::from(kind.exit_code())
        }
    }
}

fn init_logging() {
    // Logs go to stderr so stdout stays clean for `show --json`
    let log_level = match std::env::var(env::LOG_LEVEL)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(dir) = cli.state_dir {
        settings.state_dir = Some(dir);
    }
    let dry_run = dry_run_requested(cli.dry_run, |key| std::env::var_os(key));
    let platform = Platform::detect(&settings);
    debug!(platform = ?platform, dry_run, "Starting");

    match cli.command {
        Command::Show { json } => show(&platform, &settings, json),
        Command::Run { tokens } => {
            let script = Script::from_tokens(&tokens)?;
            execute(&platform, &settings, dry_run, &script)
        }
        Command::Apply { json } => {
            let script: Script =
                serde_json::from_str(&json).map_err(|e| Error::InvalidScript(e.to_string()))?;
            execute(&platform, &settings, dry_run, &script)
        }
        Command::Scripts => {
            print!("{}", script_list(&platform));
            Ok(())
        }
        Command::Script { number } => {
            let scripts = platform.predefined_scripts();
            let predefined = predefined_script(&scripts, number)?;
            info!(label = predefined.label, "Running predefined script");
            execute(&platform, &settings, dry_run, &predefined.script)
        }
        Command::Configure {
            display,
            grub_cfg,
            timeout,
        } => configure(&platform, &settings, display, grub_cfg, timeout),
    }
}

/// `--dry-run`, or `NO_REBOOT_ACTION` set to anything
fn dry_run_requested(flag: bool, var: impl Fn(&str) -> Option<OsString>) -> bool {
    flag || var(env::DRY_RUN).is_some()
}

/// Scripts are numbered from 1 as `scripts` lists them
fn predefined_script(scripts: &[PredefinedScript], number: usize) -> Result<&PredefinedScript> {
    number
        .checked_sub(1)
        .and_then(|index| scripts.get(index))
        .ok_or_else(|| {
            Error::InvalidScript(format!(
                "no predefined script {number} (expected 1 to {})",
                scripts.len()
            ))
        })
}

fn boot_state<'a>(platform: &'a Platform, settings: &Settings) -> BootState<'a> {
    BootState::new(
        platform.state_dir(),
        platform.display_switch(),
        settings.switch_timeout_secs,
    )
}

fn show(platform: &Platform, settings: &Settings, json: bool) -> Result<()> {
    let state = boot_state(platform, settings);
    let values = state.values()?;

    if json {
        let out = serde_json::to_string_pretty(&values)
            .map_err(|e| Error::io("<stdout>", e.into()))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "{}: {}",
        text::operating_system::ON_NEXT_BOOT,
        text::value_text(values.next_boot_operating_system, text::operating_system::UNDEFINED)
    );
    println!(
        "{}: {}",
        text::display::ON_NEXT_WINDOWS_BOOT,
        text::value_text(values.next_windows_boot_display, text::display::UNDEFINED)
    );
    if state.supports_display_switch() {
        println!(
            "{}: {}",
            text::display::CURRENT,
            text::value_text(values.current_display, text::display::UNDEFINED)
        );
    }
    Ok(())
}

fn execute(platform: &Platform, settings: &Settings, dry_run: bool, script: &Script) -> Result<()> {
    if script.is_empty() {
        warn!("Script is empty, nothing to do");
        return Ok(());
    }

    let state = boot_state(platform, settings);
    info!(state_dir = %state.state_dir().display(), "Using state directory");
    ScriptExecutor::new(state, platform, dry_run, io::stdout().lock()).execute(script)
}

fn script_list(host: &dyn Host) -> String {
    let mut out = format!("Predefined scripts (icon: {})\n", host.icon());
    for (number, predefined) in host.predefined_scripts().iter().enumerate() {
        out.push_str(&format!("{}. {}\n", number + 1, predefined.label));
        match serde_json::to_string(&predefined.script) {
            Ok(json) => out.push_str(&format!("   {json}\n")),
            Err(e) => warn!(error = %e, "Cannot render script"),
        }
    }
    out
}

fn configure(
    platform: &Platform,
    settings: &Settings,
    display: Option<Display>,
    grub_cfg: Option<PathBuf>,
    timeout: Option<u64>,
) -> Result<()> {
    let state_dir = platform.state_dir();

    match platform {
        Platform::Linux(_) => {
            if display.is_some() || timeout.is_some() {
                warn!("Display arguments are only used on Windows");
            }
            let grub_cfg = grub_cfg.unwrap_or_else(|| PathBuf::from(paths::GRUB_CFG));
            let entries = calibration::configure_grub_entries(&grub_cfg, &state_dir)?;
            for &os in OperatingSystem::ALL {
                if let Some(entry) = entries.get(&os) {
                    println!("{}: {entry}", os.label());
                }
            }
        }
        Platform::Windows(host) => {
            if grub_cfg.is_some() {
                warn!("--grub-cfg is only used on Linux");
            }
            let display = display.ok_or(Error::Usage(text::display::CONFIGURE_NEEDS_CURRENT))?;
            let switch = platform
                .display_switch()
                .ok_or(Error::CapabilityUnavailable(text::display::SWITCH_NOT_SUPPORTED))?;
            let timeout = timeout.unwrap_or(settings.detection_timeout_secs);
            let candidates = host.switch_arg_candidates();

            println!(
                "Detecting displays with {} and {}; this can take up to {} seconds...",
                candidates[0],
                candidates[1],
                timeout * 3
            );
            let calibration =
                calibration::configure_displays(switch, display, &candidates, timeout, &state_dir)?;
            for identity in [&calibration.initial, &calibration.other] {
                println!(
                    "{}: device id {}, switch argument {}",
                    identity.display.label(),
                    identity.device_id,
                    identity.switch_arg
                );
            }
        }
    }

    println!("Configuration saved in {}", state_dir.display());
    Ok(())
}
