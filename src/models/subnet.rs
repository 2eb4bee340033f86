//! Subnet calculator result model.

use super::Ipv4;
use serde::{Deserialize, Serialize};

/// Full description of a single IPv4 subnet, as produced by the subnet tool.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubnetInfo {
    /// The subnet in CIDR notation.
    pub cidr: Ipv4,
    /// Network address.
    pub network: String,
    /// Dotted-quad netmask.
    pub netmask: String,
    /// Dotted-quad wildcard mask.
    pub wildcard: String,
    /// Broadcast address.
    pub broadcast: String,
    /// First usable host address.
    pub first_host: String,
    /// Last usable host address.
    pub last_host: String,
    /// Total addresses in the block.
    pub total_addresses: u64,
    /// Usable host addresses.
    pub usable_hosts: u64,
    /// Classful address class (A-E).
    pub class: AddressClass,
    /// Address scope derived from the network address.
    pub scope: AddressScope,
}

/// Classful network class of an address.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    A,
    B,
    C,
    /// Multicast range.
    D,
    /// Reserved range.
    E,
}

impl std::fmt::Display for AddressClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let c = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
        };
        write!(f, "{c}")
    }
}

/// Address scope of a network address.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddressScope {
    /// RFC 1918 private space.
    Private,
    /// 127.0.0.0/8.
    Loopback,
    /// 169.254.0.0/16.
    LinkLocal,
    /// 224.0.0.0/4.
    Multicast,
    /// Everything else.
    Public,
}

impl std::fmt::Display for AddressScope {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            AddressScope::Private => "private",
            AddressScope::Loopback => "loopback",
            AddressScope::LinkLocal => "link-local",
            AddressScope::Multicast => "multicast",
            AddressScope::Public => "public",
        };
        write!(f, "{s}")
    }
}
