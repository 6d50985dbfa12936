// * errors surfaced to the user; Display text is what gets printed after "Error:"
use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid timeout '{0}' - must be an integer")]
    TimeoutNotInteger(String),

    #[error("Invalid timeout '{0}' - minimum timeout is 50")]
    TimeoutTooSmall(String),

    #[error("Invalid timeout '{0}' - too large")]
    TimeoutTooLarge(String),

    #[error("Please define IP range to ping")]
    NoTargets,

    #[error("Invalid number of arguments")]
    TooManyArguments,

    #[error("invalid IP format")]
    InvalidFormat,

    #[error("invalid CIDR notation")]
    InvalidCidr,

    #[error("invalid dash notation")]
    InvalidDash,

    #[error("invalid range notation")]
    InvalidRange,

    #[error("The second IP must be greater than or equal to the first IP.")]
    DescendingRange,

    #[error("invalid file '{}'", .0.display())]
    InvalidListFile(PathBuf),

    #[error("Invalid IP list file format -- IP list file must have one valid IPv4 address per line with no leading or trailing spaces.")]
    InvalidListFormat,

    #[error("no addresses to ping")]
    EmptyRange,

    #[error("range of {count} hosts exceeds the limit of {max}")]
    TooManyHosts { count: u64, max: u64 },

    #[error("invalid config file '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("fping is not installed. Please install fping and run again. Exiting...")]
    FpingMissing,

    #[error("could not run fping: {0}")]
    Fping(#[source] io::Error),

    #[error("scan stopped at IP {ip}")]
    Stopped {
        ip: Ipv4Addr,
        #[source]
        cause: Option<io::Error>,
    },

    #[error("could not install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;
