// * run fping against one address at a time and read back what it printed
use std::io;
use std::net::Ipv4Addr;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, SweepError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub ip: Ipv4Addr,
    pub alive: bool,
    /// fping's statistics line, or whatever it printed instead
    pub line: String,
}

pub trait Prober {
    fn probe(&mut self, ip: Ipv4Addr) -> io::Result<ProbeOutcome>;
}

#[derive(Debug, Clone)]
pub struct Fping {
    binary: String,
    timeout_ms: u64,
}

impl Fping {
    pub fn new(binary: &str, timeout_ms: u64) -> Fping {
        Fping {
            binary: binary.to_string(),
            timeout_ms,
        }
    }

    /// Make sure the binary can be started at all before the sweep begins
    pub fn check_requirements(&self) -> Result<()> {
        let status = Command::new(&self.binary)
            .arg("-v")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SweepError::FpingMissing),
            Err(e) => Err(SweepError::Fping(e)),
        }
    }
}

impl Prober for Fping {
    fn probe(&mut self, ip: Ipv4Addr) -> io::Result<ProbeOutcome> {
        // * exit status is ignored: fping exits non-zero for unreachable hosts
        let output = Command::new(&self.binary)
            .arg("-a")
            .arg("-c1")
            .arg(format!("-t{}", self.timeout_ms))
            .arg(ip.to_string())
            .stdin(Stdio::null())
            .output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let outcome = parse_output(ip, &stderr, &stdout);
        debug!(%ip, alive = outcome.alive, line = %outcome.line, "probe");
        Ok(outcome)
    }
}

fn stats_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\S+\s*:\s*xmt/rcv/%loss\s*=\s*(?<xmt>\d+)/(?<rcv>\d+)/(?<loss>\d+)%")
            .expect("statistics regex is valid")
    })
}

// * fping -c writes the per-target summary to stderr; look there first
pub fn parse_output(ip: Ipv4Addr, stderr: &str, stdout: &str) -> ProbeOutcome {
    let lines = || stderr.lines().chain(stdout.lines()).map(str::trim_end);

    for line in lines() {
        if let Some(caps) = stats_re().captures(line) {
            let rcv: u32 = caps["rcv"].parse().unwrap_or(0);
            return ProbeOutcome {
                ip,
                alive: rcv > 0,
                line: line.to_string(),
            };
        }
    }

    let line = lines()
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{ip} : no response"));
    ProbeOutcome {
        ip,
        alive: false,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

    #[test]
    fn alive_summary_on_stderr() {
        let stdout = "10.0.0.1 : [0], 84 bytes, 0.52 ms (0.52 avg, 0% loss)\n";
        let stderr = "\n10.0.0.1 : xmt/rcv/%loss = 1/1/0%, min/avg/max = 0.52/0.52/0.52\n";
        let outcome = parse_output(IP, stderr, stdout);
        assert!(outcome.alive);
        assert_eq!(
            outcome.line,
            "10.0.0.1 : xmt/rcv/%loss = 1/1/0%, min/avg/max = 0.52/0.52/0.52"
        );
    }

    #[test]
    fn unreachable_summary() {
        let stderr = "10.0.0.1 : xmt/rcv/%loss = 1/0/100%\n";
        let outcome = parse_output(IP, stderr, "");
        assert!(!outcome.alive);
        assert_eq!(outcome.line, "10.0.0.1 : xmt/rcv/%loss = 1/0/100%");
    }

    #[test]
    fn summary_found_after_icmp_noise() {
        let stderr = "ICMP Host Unreachable from 10.0.0.254 for ICMP Echo sent to 10.0.0.1\n\
                      10.0.0.1     : xmt/rcv/%loss = 1/0/100%\n";
        let outcome = parse_output(IP, stderr, "");
        assert!(!outcome.alive);
        assert!(outcome.line.contains("1/0/100"));
    }

    #[test]
    fn no_summary_falls_back_to_first_line() {
        let outcome = parse_output(IP, "\n10.0.0.1: error while sending ping\n", "");
        assert!(!outcome.alive);
        assert_eq!(outcome.line, "10.0.0.1: error while sending ping");

        let silent = parse_output(IP, "", "");
        assert!(!silent.alive);
        assert_eq!(silent.line, "10.0.0.1 : no response");
    }

    // * stand-in fping: records its argv next to itself, prints stats on stderr, exits 1
    #[cfg(unix)]
    fn fake_fping(dir: &std::path::Path, stats: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fping");
        let script = format!(
            "#!/bin/sh\necho \"$*\" > \"$(dirname \"$0\")/argv\"\n\
             echo \"$4 : [0], 84 bytes, 0.40 ms (0.40 avg, 0% loss)\"\n\
             echo \"$4 : xmt/rcv/%loss = {stats}\" >&2\nexit 1\n"
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn run_fake(stats: &str) -> (io::Result<ProbeOutcome>, String) {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_fping(dir.path(), stats);
        let mut fping = Fping::new(binary.to_str().unwrap(), 75);
        let mut result = fping.probe(IP);
        // ETXTBSY: another test thread forked while the script was still open for writing
        for _ in 0..10 {
            match &result {
                Err(e) if e.raw_os_error() == Some(26) => {
                    std::thread::sleep(std::time::Duration::from_millis(20));
                    result = fping.probe(IP);
                }
                _ => break,
            }
        }
        let argv = std::fs::read_to_string(dir.path().join("argv")).unwrap_or_default();
        (result, argv)
    }

    #[cfg(unix)]
    #[test]
    fn fping_invocation_and_alive_host_despite_exit_status() {
        let (result, argv) = run_fake("1/1/0%, min/avg/max = 0.40/0.40/0.40");
        let outcome = result.unwrap();
        assert_eq!(argv.trim_end(), "-a -c1 -t75 10.0.0.1");
        assert!(outcome.alive);
        assert_eq!(outcome.ip, IP);
        assert_eq!(
            outcome.line,
            "10.0.0.1 : xmt/rcv/%loss = 1/1/0%, min/avg/max = 0.40/0.40/0.40"
        );
    }

    #[cfg(unix)]
    #[test]
    fn fping_unreachable_host() {
        let (result, argv) = run_fake("1/0/100%");
        let outcome = result.unwrap();
        assert_eq!(argv.trim_end(), "-a -c1 -t75 10.0.0.1");
        assert!(!outcome.alive);
        assert_eq!(outcome.line, "10.0.0.1 : xmt/rcv/%loss = 1/0/100%");
    }

    #[test]
    fn missing_binary_is_reported() {
        let fping = Fping::new("/nonexistent/fping-for-tests", 200);
        assert!(matches!(fping.check_requirements(), Err(SweepError::FpingMissing)));
    }
}
