use clap::Parser;

#[derive(Debug, Parser)]
#[clap(
    version = "0.3",
    about = "Ping sweep a range of IPv4 addresses with fping",
    after_help = "Examples:\n  pingsweep 10.0.0.0/24\n  pingsweep 10.0.0.0-255\n  pingsweep 10.0.0.0 10.0.0.255"
)]
pub struct PingsweepArgs {
    /// display all pings, failed and successful
    #[clap(long, short, action)]
    pub debug: bool,
    /// text file of one IP per line to ping
    #[clap(long = "list", short = 'l', value_name = "FILE")]
    pub ip_file: Option<std::path::PathBuf>,
    /// attempt to resolve hostnames for successful pings
    #[clap(long, short = 'n', action)]
    pub hostnames: bool,
    /// display failed pings instead of successful pings
    #[clap(long, short, action)]
    pub reverse: bool,
    /// ping timeout in milliseconds (default is 200)
    #[clap(long, short, value_name = "MS")]
    pub timeout: Option<String>,
    /// include fping statistics for each ping
    #[clap(long, short, action)]
    pub verbose: bool,
    /// don't ask before pinging large ranges
    #[clap(long, short, action)]
    pub yes: bool,
    /// show a progress bar on stderr
    #[clap(long, short, action)]
    pub progress: bool,
    /// config file (default ~/.pingsweep/config.toml)
    #[clap(long, short, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,
    /// CIDR (10.0.0.0/24), dash (10.0.0.0-255) or a begin and end address
    #[clap(value_name = "IP_RANGE")]
    pub targets: Vec<String>,
}
