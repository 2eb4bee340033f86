//! Subnet calculator.
//!
//! Turns a CIDR block into a full [`SubnetInfo`] description and splits
//! parent blocks into equal-size children.

use crate::config;
use crate::models::{
    netmask_dotted, next_subnet, total_addresses, usable_hosts, wildcard_dotted, AddressClass,
    AddressScope, Ipv4, SubnetInfo,
};
use std::error::Error;
use std::net::Ipv4Addr;

/// Compute the full description of a subnet.
///
/// # Arguments
/// * `cidr` - The subnet to describe; host bits are allowed and masked off
///
/// # Returns
/// * `Ok(SubnetInfo)` - The subnet description
pub fn subnet_info(cidr: Ipv4) -> Result<SubnetInfo, Box<dyn Error>> {
    let network = cidr.lo();
    let broadcast = cidr.hi();

    let (first_host, last_host) = host_range(network, broadcast, cidr.mask);

    Ok(SubnetInfo {
        cidr: Ipv4 {
            addr: network,
            mask: cidr.mask,
        },
        network: network.to_string(),
        netmask: netmask_dotted(cidr.mask)?,
        wildcard: wildcard_dotted(cidr.mask)?,
        broadcast: broadcast.to_string(),
        first_host: first_host.to_string(),
        last_host: last_host.to_string(),
        total_addresses: total_addresses(cidr.mask)?,
        usable_hosts: usable_hosts(cidr.mask)?,
        class: address_class(network),
        scope: address_scope(network),
    })
}

/// First and last usable host for a block.
///
/// /31 uses both addresses, /32 is the address itself.
fn host_range(network: Ipv4Addr, broadcast: Ipv4Addr, mask: u8) -> (Ipv4Addr, Ipv4Addr) {
    match mask {
        32 => (network, network),
        31 => (network, broadcast),
        _ => (
            Ipv4Addr::from(u32::from(network) + 1),
            Ipv4Addr::from(u32::from(broadcast) - 1),
        ),
    }
}

/// Classful address class from the first octet.
pub fn address_class(addr: Ipv4Addr) -> AddressClass {
    match addr.octets()[0] {
        0..=127 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        240..=255 => AddressClass::E,
    }
}

/// Address scope from the network address.
pub fn address_scope(addr: Ipv4Addr) -> AddressScope {
    if addr.is_loopback() {
        AddressScope::Loopback
    } else if addr.is_link_local() {
        AddressScope::LinkLocal
    } else if addr.is_multicast() {
        AddressScope::Multicast
    } else if addr.is_private() {
        AddressScope::Private
    } else {
        AddressScope::Public
    }
}

/// Split a parent block into equal-size subnets of `new_prefix`.
///
/// # Arguments
/// * `parent` - The block to split
/// * `new_prefix` - Prefix length of the children, must not be shorter than the parent's
///
/// # Returns
/// * `Ok(Vec<Ipv4>)` - The child subnets in address order
pub fn split(parent: Ipv4, new_prefix: u8) -> Result<Vec<Ipv4>, Box<dyn Error>> {
    if new_prefix > 32 {
        return Err("Prefix length is too long".into());
    }
    if new_prefix < parent.mask {
        return Err(format!(
            "Cannot split {parent} into larger /{new_prefix} blocks"
        )
        .into());
    }

    let count = 1usize << (new_prefix - parent.mask).min(63);
    if count > config::SPLIT_LIMIT {
        return Err(format!(
            "Splitting {parent} into /{new_prefix} would produce {count} subnets (limit {})",
            config::SPLIT_LIMIT
        )
        .into());
    }

    let mut subnets = Vec::with_capacity(count);
    let mut current = Ipv4 {
        addr: parent.lo(),
        mask: new_prefix,
    };
    for _ in 0..count {
        subnets.push(current);
        if u32::from(current.hi()) == u32::MAX {
            break;
        }
        current = next_subnet(current, None)?;
    }

    log::debug!("split {parent} -> {} x /{new_prefix}", subnets.len());
    Ok(subnets)
}
