// * the scan loop: banner, one probe per address, per-mode reporting, summary
use std::fmt;
use std::io::{self, Write};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use console::style;
use indicatif::ProgressBar;
use tracing::info;

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::{Result, SweepError};
use crate::lkup::HostResolver;
use crate::probe::{ProbeOutcome, Prober};

#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    pub debug: bool,
    pub reverse: bool,
    pub verbose: bool,
    pub hostnames: bool,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub n_success: usize,
    pub n_hosts: usize,
}

impl Counts {
    pub fn percent(&self) -> usize {
        (self.n_success * 100).checked_div(self.n_hosts).unwrap_or(0)
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Successful pings: {} ({}%)",
            style(format!("{}/{}", self.n_success, self.n_hosts)).bold().green(),
            self.percent()
        )
    }
}

pub fn ctime() -> String {
    Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}

fn notice<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}\n", style("[+]").bold().blue(), msg)
}

pub fn print_banner<W: Write>(out: &mut W, ips: &[Ipv4Addr], opts: &SweepOptions) -> io::Result<()> {
    if let (Some(first), Some(last)) = (ips.first(), ips.last()) {
        writeln!(out, "Starting ping sweep on {first} through {last}...\n")?;
    }
    if opts.verbose {
        notice(out, "Verbose option set")?;
    }
    if opts.timeout_ms != DEFAULT_TIMEOUT_MS {
        notice(out, &format!("Timeout set to {} milliseconds", opts.timeout_ms))?;
    }
    if opts.reverse {
        notice(out, "Reverse option set - displaying failed pings")?;
    }
    if opts.hostnames {
        notice(out, "Hostnames option set - resolving hosts")?;
    }
    if opts.debug {
        notice(out, "Debug option set - displaying all pings")?;
    }
    Ok(())
}

pub fn print_stopped<W: Write>(out: &mut W, ip: Ipv4Addr) -> io::Result<()> {
    writeln!(out, "\n{} Exiting...", style("[!]").bold().red())?;
    writeln!(out, "Scan stopped at IP {} on {}", ip, ctime())
}

pub struct Sweep<'a, P, H> {
    pub opts: &'a SweepOptions,
    pub prober: P,
    pub resolver: H,
    pub interrupted: &'a AtomicBool,
    pub progress: ProgressBar,
}

impl<'a, P: Prober, H: HostResolver> Sweep<'a, P, H> {
    // * what (if anything) gets printed for one outcome, and whether it counts
    fn report(&self, outcome: &ProbeOutcome) -> (bool, Option<String>) {
        let shown = |outcome: &ProbeOutcome| {
            if self.opts.verbose {
                outcome.line.clone()
            } else {
                outcome.ip.to_string()
            }
        };

        if self.opts.debug {
            (outcome.alive, Some(outcome.line.clone()))
        } else if self.opts.reverse {
            if outcome.alive {
                (true, None)
            } else {
                (false, Some(shown(outcome)))
            }
        } else if outcome.alive {
            let mut line = shown(outcome);
            if self.opts.hostnames {
                line.push(' ');
                line.push_str(&self.resolver.resolve(outcome.ip));
            }
            (true, Some(line))
        } else {
            (false, None)
        }
    }

    fn emit<W: Write>(&self, out: &mut W, line: &str) -> io::Result<()> {
        self.progress.suspend(|| writeln!(out, "{line}"))
    }

    /// Probe every address in order. Stops at the first interrupt or spawn failure.
    pub fn run<W: Write>(&mut self, ips: &[Ipv4Addr], out: &mut W) -> Result<Counts> {
        let mut counts = Counts {
            n_success: 0,
            n_hosts: ips.len(),
        };
        self.progress.set_length(ips.len() as u64);

        self.emit(out, &format!("Scan start: {}\n......", ctime()))?;
        for &ip in ips {
            if self.interrupted.load(Ordering::SeqCst) {
                return Err(SweepError::Stopped { ip, cause: None });
            }
            self.progress.set_message(ip.to_string());
            let outcome = self.prober.probe(ip).map_err(|e| SweepError::Stopped {
                ip,
                cause: Some(e),
            })?;
            // ! fping shares our process group, so Ctrl-C kills it mid-probe too
            if self.interrupted.load(Ordering::SeqCst) {
                return Err(SweepError::Stopped { ip, cause: None });
            }

            let (success, line) = self.report(&outcome);
            if success {
                counts.n_success += 1;
            }
            if let Some(line) = line {
                self.emit(out, &line)?;
            }
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        info!(success = counts.n_success, hosts = counts.n_hosts, "sweep finished");
        self.emit(out, &format!("......\n{counts}"))?;
        self.emit(out, &format!("Scan finished at: {}", ctime()))?;
        Ok(counts)
    }
}
