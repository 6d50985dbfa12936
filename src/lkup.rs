// * reverse DNS for hosts that answered
use std::net::{IpAddr, Ipv4Addr};

use dns_lookup::lookup_addr;
use tracing::debug;

pub trait HostResolver {
    /// PTR name for ip, empty when there is none
    fn resolve(&self, ip: Ipv4Addr) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, ip: Ipv4Addr) -> String {
        match lookup_addr(&IpAddr::V4(ip)) {
            Ok(hostname) => hostname_or_empty(ip, hostname),
            Err(e) => {
                debug!(%ip, error = %e, "reverse lookup failed");
                String::new()
            }
        }
    }
}

// * getnameinfo hands back the numeric address when no PTR record exists
fn hostname_or_empty(ip: Ipv4Addr, hostname: String) -> String {
    if hostname == ip.to_string() {
        String::new()
    } else {
        hostname
    }
}
