use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::io::{self, Write};
use std::num::IntErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod args;
pub mod config;
pub mod error;
pub mod ips;
pub mod lkup;
pub mod probe;
pub mod prompt;
pub mod sweep;

use args::PingsweepArgs;
use error::SweepError;
use lkup::SystemResolver;
use probe::Fping;
use sweep::{Sweep, SweepOptions};

pub const MIN_TIMEOUT_MS: u64 = 50;

pub fn parse_timeout(raw: &str) -> Result<u64, SweepError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SweepError::TimeoutNotInteger(raw.to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(SweepError::TimeoutTooSmall(raw.to_string()));
    }
    let timeout: u64 = match digits.parse() {
        Ok(timeout) => timeout,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            return Err(SweepError::TimeoutTooLarge(raw.to_string()))
        }
        Err(_) => return Err(SweepError::TimeoutNotInteger(raw.to_string())),
    };
    if timeout < MIN_TIMEOUT_MS {
        return Err(SweepError::TimeoutTooSmall(raw.to_string()));
    }
    Ok(timeout)
}

/// "[!] Error: ..." followed by the help hint
pub fn print_err<W: Write, E: fmt::Display>(out: &mut W, err: E) -> io::Result<()> {
    writeln!(out, "{} Error: {}", style("[!]").bold().red(), err)?;
    writeln!(out, "Use '-h' option for help menu")
}

fn progress_bar_setup(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    match ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}") {
        Ok(sty) => pb.with_style(sty.progress_chars("##-")),
        Err(_) => pb,
    }
}

pub fn run(args: &PingsweepArgs) -> anyhow::Result<()> {
    let config = config::read_config(args.config.as_deref())?;
    let timeout_ms = match &args.timeout {
        Some(raw) => parse_timeout(raw)?,
        None if config.timeout < MIN_TIMEOUT_MS => {
            return Err(SweepError::TimeoutTooSmall(config.timeout.to_string()).into())
        }
        None => config.timeout,
    };
    debug!(?config, timeout_ms, "settings");

    // * input stage
    let ip_list = ips::targets(&args.targets, args.ip_file.as_deref())?;

    // * big sweeps need a yes first
    if ip_list.len() > config.confirm_threshold && !args.yes {
        let confirmed = prompt::are_you_sure(ip_list.len(), &mut io::stdin().lock(), &mut io::stdout())?;
        if !confirmed {
            return Ok(());
        }
    }

    let opts = SweepOptions {
        debug: args.debug,
        reverse: args.reverse,
        verbose: args.verbose,
        hostnames: args.hostnames,
        timeout_ms,
    };
    let mut out = io::stdout().lock();
    sweep::print_banner(&mut out, &ip_list, &opts)?;

    let fping = Fping::new(&config.fping, timeout_ms);
    fping.check_requirements()?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)).map_err(SweepError::from)?;

    let mut scan = Sweep {
        opts: &opts,
        prober: fping,
        resolver: SystemResolver,
        interrupted: &interrupted,
        progress: progress_bar_setup(args.progress),
    };
    match scan.run(&ip_list, &mut out) {
        Ok(_) => Ok(()),
        Err(SweepError::Stopped { ip, cause }) => {
            scan.progress.abandon();
            if let Some(cause) = &cause {
                warn!(%ip, error = %cause, "fping failed");
            }
            sweep::print_stopped(&mut out, ip)?;
            Err(SweepError::Stopped { ip, cause }.into())
        }
        Err(e) => Err(e.into()),
    }
}
