//! VLSM allocation and CIDR collision detection.
//!
//! Packs host-count requests into a base block largest-first and reports
//! overlapping CIDRs across arbitrary subnet sets.

use crate::models::{usable_hosts, Ipv4};
use crate::processing::deaggregate::deaggregate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;

/// A single VLSM request: a name and the hosts it must fit.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VlsmRequest {
    /// Label for the requested subnet.
    pub name: String,
    /// Required usable host count.
    pub hosts: u64,
}

/// One allocated subnet in a VLSM result.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VlsmAllocation {
    /// Label copied from the request.
    pub name: String,
    /// The allocated block.
    pub cidr: Ipv4,
    /// Hosts the request asked for.
    pub requested_hosts: u64,
    /// Hosts the allocated block provides.
    pub usable_hosts: u64,
}

/// Result of a VLSM allocation run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VlsmResult {
    /// The base block requests were packed into.
    pub base: Ipv4,
    /// Allocations in address order.
    pub allocations: Vec<VlsmAllocation>,
    /// Unallocated remainder of the base block as minimal CIDRs.
    pub free: Vec<Ipv4>,
}

/// A named CIDR, the unit collision detection works on.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NamedCidr {
    /// Label for reporting.
    pub name: String,
    /// The subnet.
    pub cidr: Ipv4,
}

/// How two CIDRs collide.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    /// Both sides are the same block.
    Identical,
    /// One block contains the other.
    Nested,
}

/// A pair of overlapping CIDRs.
///
/// Two CIDR blocks can only overlap by one containing the other, so the
/// shared range is always the narrower of the two.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Collision {
    /// The wider (or equal) block.
    pub outer: NamedCidr,
    /// The narrower (or equal) block.
    pub inner: NamedCidr,
    /// Identical or nested.
    pub kind: CollisionKind,
}

/// Smallest prefix length whose subnet fits `hosts` usable hosts.
fn prefix_for_hosts(hosts: u64) -> Result<u8, Box<dyn Error>> {
    if hosts == 0 {
        return Err("Host count must be at least 1".into());
    }
    // usable_hosts is monotonic in the prefix, walk from the smallest block up
    for prefix in (0..=32u8).rev() {
        if usable_hosts(prefix)? >= hosts {
            return Ok(prefix);
        }
    }
    Err(format!("No IPv4 subnet fits {hosts} hosts").into())
}

/// Allocate subnets for the given requests inside a base block.
///
/// Requests are placed largest-first (ties keep input order) so every block
/// lands naturally aligned and no padding gaps appear between allocations.
///
/// # Arguments
/// * `base` - The block to allocate from
/// * `requests` - Named host-count requests
///
/// # Returns
/// * `Ok(VlsmResult)` - Allocations plus the free remainder
/// * `Err` - When a request cannot fit inside `base`
pub fn allocate(base: Ipv4, requests: &[VlsmRequest]) -> Result<VlsmResult, Box<dyn Error>> {
    log::info!(
        "#Start allocate() base={base} with {} requests",
        requests.len()
    );
    if requests.is_empty() {
        return Err("No subnet requests given".into());
    }

    let mut ordered: Vec<&VlsmRequest> = requests.iter().collect();
    ordered.sort_by_key(|r| std::cmp::Reverse(r.hosts));

    let base_end = u32::from(base.hi()) as u64;
    let mut cursor = u32::from(base.lo()) as u64;
    let mut allocations = Vec::with_capacity(ordered.len());

    for request in ordered {
        let prefix = prefix_for_hosts(request.hosts)?;
        let size = 1u64 << (32 - prefix);

        // Align the cursor up to the block size
        let start = cursor.div_ceil(size) * size;
        let end = start + size - 1;
        if end > base_end {
            return Err(format!(
                "Request '{}' ({} hosts, needs /{prefix}) does not fit in {base}",
                request.name, request.hosts
            )
            .into());
        }

        let cidr = Ipv4 {
            addr: Ipv4Addr::from(start as u32),
            mask: prefix,
        };
        log::debug!("allocated {cidr} for '{}'", request.name);
        allocations.push(VlsmAllocation {
            name: request.name.clone(),
            cidr,
            requested_hosts: request.hosts,
            usable_hosts: usable_hosts(prefix)?,
        });
        cursor = end + 1;
    }

    let free = if cursor <= base_end {
        deaggregate(
            Ipv4Addr::from(cursor as u32),
            Ipv4Addr::from(base_end as u32),
        )?
    } else {
        Vec::new()
    };

    log::info!(
        "allocate() placed {} subnets, {} free blocks remain",
        allocations.len(),
        free.len()
    );
    Ok(VlsmResult {
        base,
        allocations,
        free,
    })
}

/// Find every pair of overlapping CIDRs in a set.
///
/// # Arguments
/// * `subnets` - Named subnets to cross-check
///
/// # Returns
/// Collisions sorted by the outer block for stable output
pub fn find_collisions(subnets: &[NamedCidr]) -> Vec<Collision> {
    let mut collisions = Vec::new();

    for (i, a) in subnets.iter().enumerate() {
        for b in subnets.iter().skip(i + 1) {
            if !a.cidr.overlaps(&b.cidr) {
                continue;
            }
            let kind = if a.cidr.lo() == b.cidr.lo() && a.cidr.mask == b.cidr.mask {
                CollisionKind::Identical
            } else {
                CollisionKind::Nested
            };
            // the wider block (shorter mask) is the outer one
            let (outer, inner) = if a.cidr.mask <= b.cidr.mask {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            collisions.push(Collision { outer, inner, kind });
        }
    }

    collisions.sort_by_key(|c| (c.outer.cidr, c.inner.cidr));
    collisions
}

/// Log collisions as warnings, one block per conflict.
pub fn log_collisions(collisions: &[Collision]) {
    if collisions.is_empty() {
        log::info!("No overlapping subnets found.");
        return;
    }

    log::warn!("Found {} overlapping subnet pair(s):", collisions.len());
    for c in collisions {
        log::warn!(
            "  {} '{}' overlaps {} '{}' ({:?})",
            c.outer.cidr,
            c.outer.name,
            c.inner.cidr,
            c.inner.name,
            c.kind
        );
    }
}

/// Cross-check VLSM allocations against already-existing subnets.
pub fn check_against_existing(result: &VlsmResult, existing: &[NamedCidr]) -> Vec<Collision> {
    let mut combined: Vec<NamedCidr> = existing.to_vec();
    combined.extend(result.allocations.iter().map(|a| NamedCidr {
        name: a.name.clone(),
        cidr: a.cidr,
    }));

    // only report pairs that span the two sets
    find_collisions(&combined)
        .into_iter()
        .filter(|c| {
            let outer_existing = existing
                .iter()
                .any(|e| e.cidr == c.outer.cidr && e.name == c.outer.name);
            let inner_existing = existing
                .iter()
                .any(|e| e.cidr == c.inner.cidr && e.name == c.inner.name);
            outer_existing != inner_existing
        })
        .collect()
}
