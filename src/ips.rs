// * expand the command line targets into the ordered list of addresses to ping
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

use ipnetwork::Ipv4Network;

use crate::error::{Result, SweepError};

/// Largest sweep we will build a list for (a /8)
pub const MAX_HOSTS: u64 = 1 << 24;

// * checked before collecting so huge ranges fail fast instead of exhausting memory
fn check_size(count: u64) -> Result<()> {
    if count > MAX_HOSTS {
        return Err(SweepError::TooManyHosts {
            count,
            max: MAX_HOSTS,
        });
    }
    Ok(())
}

/// Four dot separated decimal octets, nothing else
pub fn validate_ip(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u32>().map_or(false, |n| n <= 255)
        })
}

fn parse_ip(ip: &str) -> Option<Ipv4Addr> {
    if !validate_ip(ip) {
        return None;
    }
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(ip.split('.')) {
        *octet = part.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// Decide which notation the positional args use and expand them.
/// Positional args take precedence over a list file.
pub fn targets(args: &[String], list: Option<&Path>) -> Result<Vec<Ipv4Addr>> {
    let ips = match args {
        [] => match list {
            Some(path) => from_list_file(path)?,
            None => return Err(SweepError::NoTargets),
        },
        [range] if range.contains('/') => from_cidr(range)?,
        [range] if range.contains('-') => from_dash(range)?,
        [_] => return Err(SweepError::InvalidFormat),
        [begin, end] => from_range(begin, end)?,
        _ => return Err(SweepError::TooManyArguments),
    };
    if ips.is_empty() {
        return Err(SweepError::EmptyRange);
    }
    Ok(ips)
}

pub fn from_list_file(path: &Path) -> Result<Vec<Ipv4Addr>> {
    let text =
        fs::read_to_string(path).map_err(|_| SweepError::InvalidListFile(path.to_path_buf()))?;
    from_list(&text)
}

fn from_list(text: &str) -> Result<Vec<Ipv4Addr>> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| parse_ip(line).ok_or(SweepError::InvalidListFormat))
        .collect()
}

// * every address of the network, network and broadcast included
pub fn from_cidr(cidr: &str) -> Result<Vec<Ipv4Addr>> {
    let network = Ipv4Network::from_str(cidr).map_err(|_| SweepError::InvalidCidr)?;
    check_size(1u64 << (32 - u32::from(network.prefix())))?;
    Ok(network.iter().collect())
}

fn octet_range(chunk: &str) -> Option<(u8, u8)> {
    let bounds: Vec<&str> = chunk.split('-').collect();
    let parse = |s: &str| -> Option<u8> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };
    match bounds.as_slice() {
        [n] => parse(n).map(|n| (n, n)),
        [lo, hi] => {
            let (lo, hi) = (parse(lo)?, parse(hi)?);
            (lo <= hi).then_some((lo, hi))
        }
        _ => None,
    }
}

// * e.g. 10.0.1-2.0-255: cartesian product, leftmost octet most significant
pub fn from_dash(dashed: &str) -> Result<Vec<Ipv4Addr>> {
    let ranges: Vec<(u8, u8)> = dashed
        .split('.')
        .map(octet_range)
        .collect::<Option<_>>()
        .ok_or(SweepError::InvalidDash)?;
    let [a, b, c, d] = ranges[..] else {
        return Err(SweepError::InvalidDash);
    };
    check_size(
        [a, b, c, d]
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .product(),
    )?;

    let mut ips = Vec::new();
    for o1 in a.0..=a.1 {
        for o2 in b.0..=b.1 {
            for o3 in c.0..=c.1 {
                for o4 in d.0..=d.1 {
                    ips.push(Ipv4Addr::new(o1, o2, o3, o4));
                }
            }
        }
    }
    Ok(ips)
}

// * inclusive begin..end; "x.y.z.0 x.y.z.0" means the whole x.y.z.0/24
pub fn from_range(begin: &str, end: &str) -> Result<Vec<Ipv4Addr>> {
    let start = parse_ip(begin).ok_or(SweepError::InvalidRange)?;
    let mut stop = parse_ip(end).ok_or(SweepError::InvalidRange)?;
    if start == stop && start.octets()[3] == 0 {
        let [a, b, c, _] = start.octets();
        stop = Ipv4Addr::new(a, b, c, 255);
    }
    let (start, stop) = (u32::from(start), u32::from(stop));
    if stop < start {
        return Err(SweepError::DescendingRange);
    }
    check_size(u64::from(stop - start) + 1)?;
    Ok((start..=stop).map(Ipv4Addr::from).collect())
}
