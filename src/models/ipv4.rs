//! IPv4 address and CIDR notation utilities.
//!
//! Provides the [`Ipv4`] struct for representing IPv4 networks in CIDR
//! notation, along with the bit-arithmetic helpers every address tool in this
//! crate is built on.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use ops_toolbox::models::prefix_to_netmask;
/// assert_eq!(prefix_to_netmask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn prefix_to_netmask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Prefix length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Render a prefix length as a dotted-quad netmask, e.g. 24 -> "255.255.255.0".
pub fn netmask_dotted(len: u8) -> Result<String, Box<dyn Error>> {
    Ok(Ipv4Addr::from(prefix_to_netmask(len)?).to_string())
}

/// Render a prefix length as a dotted-quad wildcard mask, e.g. 24 -> "0.0.0.255".
pub fn wildcard_dotted(len: u8) -> Result<String, Box<dyn Error>> {
    Ok(Ipv4Addr::from(!prefix_to_netmask(len)?).to_string())
}

/// Get the network address for a given IP and prefix length.
pub fn network_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Prefix length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let bits = u32::from(addr) as u64;
        let new_bits = (bits >> right_len) << right_len;

        Ok(Ipv4Addr::from(new_bits as u32))
    }
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Prefix length is too long".into())
    } else {
        let mask = prefix_to_netmask(len)?;
        let addr_bits = u32::from(addr);
        let network_bits = addr_bits & mask;
        let broadcast_bits = network_bits | (!mask);
        Ok(Ipv4Addr::from(broadcast_bits))
    }
}

/// Returns the IP address following the given subnet.
///
/// Errors instead of wrapping when the subnet ends at 255.255.255.255.
pub fn ip_after_subnet(addr: Ipv4Addr, cidr: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if cidr > MAX_LENGTH {
        Err("Prefix length is too long".into())
    } else {
        let subnet_size = 1u32 << (MAX_LENGTH - cidr);
        let addr_bits = u32::from(addr);
        let network_bits = addr_bits & prefix_to_netmask(cidr)?;
        let next_subnet_bits = network_bits
            .checked_add(subnet_size)
            .ok_or("Next subnet calculation overflowed")?;
        Ok(Ipv4Addr::from(next_subnet_bits))
    }
}

/// Calculate the subnet following the given [`Ipv4`] subnet.
///
/// If `mask` is provided, the next subnet uses that prefix length.
pub fn next_subnet(ipv4: Ipv4, mask: Option<u8>) -> Result<Ipv4, Box<dyn Error>> {
    let current_mask = ipv4.mask;
    let new_mask = mask.unwrap_or(current_mask);
    if new_mask <= current_mask {
        // eq or larger subnet (smaller mask)
        let next = ip_after_subnet(ipv4.addr, new_mask)?;
        Ok(Ipv4 {
            addr: next,
            mask: new_mask,
        })
    } else {
        // smaller subnet, start right after the current broadcast
        let current_broadcast = broadcast_addr(ipv4.addr, current_mask)?;
        let next = ip_after_subnet(current_broadcast, new_mask)?;
        Ok(Ipv4 {
            addr: next,
            mask: new_mask,
        })
    }
}

/// Total number of addresses in a subnet of the given prefix length.
pub fn total_addresses(len: u8) -> Result<u64, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Prefix length is too long".into())
    } else {
        Ok(1u64 << (MAX_LENGTH - len))
    }
}

/// Number of usable host addresses in a subnet of the given prefix length.
///
/// Classic counting: network and broadcast are reserved. /31 point-to-point
/// links (RFC 3021) get both addresses, /32 is a single host route.
pub fn usable_hosts(len: u8) -> Result<u64, Box<dyn Error>> {
    match len {
        0..=30 => Ok((1u64 << (MAX_LENGTH - len)) - 2),
        31 => Ok(2),
        32 => Ok(1),
        _ => Err("Prefix length is too long".into()),
    }
}

/// Shortest prefix length for which `ip` is a valid network address.
///
/// Based on trailing zero bits: 10.0.0.16 -> 28, 10.0.0.0 -> 0 capped at 32.
pub fn alignment_mask(ip: Ipv4Addr) -> u8 {
    let ip_u32 = u32::from(ip);
    let trailing_zeros = ip_u32.trailing_zeros() as u8;
    assert!(trailing_zeros <= 32, "Trailing zeros exceed 32 bits");
    32 - trailing_zeros.min(32)
}

/// IPv4 network in CIDR notation.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let cidr = format!("{}/{}", self.addr, self.mask);
        serializer.serialize_str(&cidr)
    }
}

impl<'de> Deserialize<'de> for Ipv4 {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 {
            return Err(de::Error::custom(format!("invalid CIDR format: {s}")));
        }

        let addr = Ipv4Addr::from_str(parts[0])
            .map_err(|_| de::Error::custom(format!("invalid IP address: {}", parts[0])))?;
        let mask = u8::from_str(parts[1])
            .map_err(|_| de::Error::custom(format!("invalid prefix length: {}", parts[1])))?;
        if mask > MAX_LENGTH {
            return Err(de::Error::custom(format!("prefix length too long: {mask}")));
        }

        Ok(Ipv4 { addr, mask })
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid address/prefix: {addr_cidr}").into());
        }
        let addr: Ipv4Addr = parts[0]
            .parse()
            .map_err(|_| format!("Invalid address {}", parts[0]))?;
        let mask: u8 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid prefix length {}", parts[1]))?;
        if mask > MAX_LENGTH {
            return Err("Prefix length is too long".into());
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Get the broadcast address of this subnet, keeping the prefix length.
    pub fn broadcast(&self) -> Result<Ipv4, Box<dyn Error>> {
        let broadcast = broadcast_addr(self.addr, self.mask)?;
        Ok(Ipv4 {
            addr: broadcast,
            mask: self.mask,
        })
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask)
            .unwrap_or_else(|e| panic!("Error calculating broadcast address: {e}"))
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        network_addr(self.addr, self.mask)
            .unwrap_or_else(|e| panic!("Error calculating network address for {self}: {e}"))
    }

    /// Check if an IP address is contained within this subnet.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        ip >= self.lo() && ip <= self.hi()
    }

    /// Check if two subnets share any addresses (containment counts).
    pub fn overlaps(&self, other: &Ipv4) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
