//! Range deaggregation and CIDR summarization.
//!
//! Converts arbitrary IP ranges into the minimal list of CIDR blocks and
//! merges CIDR lists back into their minimal covering form.

use crate::models::{alignment_mask, Ipv4};
use itertools::Itertools;
use std::error::Error;
use std::net::Ipv4Addr;

/// Deaggregate an inclusive address range into the minimal CIDR list.
///
/// Greedy walk: at every step the largest block that both starts aligned at
/// the cursor and fits inside the remaining span is emitted.
///
/// # Arguments
/// * `first` - First address of the range
/// * `last` - Last address of the range, inclusive
///
/// # Returns
/// * `Ok(Vec<Ipv4>)` - Disjoint, sorted blocks covering exactly the range
pub fn deaggregate(first: Ipv4Addr, last: Ipv4Addr) -> Result<Vec<Ipv4>, Box<dyn Error>> {
    if first > last {
        return Err(format!("Range start {first} is after range end {last}").into());
    }

    let end = u32::from(last) as u64;
    let mut cursor = u32::from(first) as u64;
    let mut blocks = Vec::new();

    while cursor <= end {
        let span = end - cursor + 1;
        // floor(log2(span)) caps the block size by the remaining span
        let span_bits = 63 - span.leading_zeros() as u8;
        let span_mask = 32u8.saturating_sub(span_bits.min(32));
        let align = alignment_mask(Ipv4Addr::from(cursor as u32));

        let mask = span_mask.max(align);
        blocks.push(Ipv4 {
            addr: Ipv4Addr::from(cursor as u32),
            mask,
        });

        cursor += 1u64 << (32 - mask);
    }

    log::debug!("deaggregated {first}-{last} into {} blocks", blocks.len());
    Ok(blocks)
}

/// Merge a CIDR list into its minimal covering form.
///
/// Host bits are masked off, contained blocks are absorbed, and aligned
/// sibling pairs are joined into their parent until nothing changes.
pub fn summarize(cidrs: &[Ipv4]) -> Vec<Ipv4> {
    // Normalize to network addresses, sort widest-first within equal starts
    let mut blocks: Vec<Ipv4> = cidrs
        .iter()
        .map(|c| Ipv4 {
            addr: c.lo(),
            mask: c.mask,
        })
        .sorted_by_key(|c| (c.lo(), c.mask))
        .collect();

    // Drop blocks contained in an earlier, wider one
    let mut kept: Vec<Ipv4> = Vec::with_capacity(blocks.len());
    for block in blocks.drain(..) {
        match kept.last() {
            Some(prev) if block.hi() <= prev.hi() => {
                log::debug!("summarize: {block} absorbed by {prev}");
            }
            _ => kept.push(block),
        }
    }

    // Join aligned sibling pairs until a fixpoint is reached
    loop {
        let before = kept.len();
        kept = kept
            .into_iter()
            .coalesce(|a, b| {
                if a.mask == b.mask && a.mask > 0 && is_sibling_pair(&a, &b) {
                    Ok(Ipv4 {
                        addr: a.lo(),
                        mask: a.mask - 1,
                    })
                } else {
                    Err((a, b))
                }
            })
            .collect();
        if kept.len() == before {
            break;
        }
    }

    kept
}

/// True when `a` and `b` are adjacent halves of a common parent block.
fn is_sibling_pair(a: &Ipv4, b: &Ipv4) -> bool {
    let adjacent = u32::from(a.hi()) as u64 + 1 == u32::from(b.lo()) as u64;
    adjacent && alignment_mask(a.lo()) <= a.mask - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidrs(list: &[&str]) -> Vec<Ipv4> {
        list.iter().map(|s| Ipv4::new(s).unwrap()).collect()
    }

    #[test]
    fn test_deaggregate_exact_block() {
        let blocks = deaggregate(
            Ipv4Addr::new(10, 0, 0, 0),
            Ipv4Addr::new(10, 0, 0, 255),
        )
        .unwrap();
        assert_eq!(blocks, cidrs(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_deaggregate_offset_range() {
        let blocks = deaggregate(
            Ipv4Addr::new(192, 168, 0, 1),
            Ipv4Addr::new(192, 168, 0, 6),
        )
        .unwrap();
        assert_eq!(
            blocks,
            cidrs(&[
                "192.168.0.1/32",
                "192.168.0.2/31",
                "192.168.0.4/31",
                "192.168.0.6/32",
            ])
        );
    }

    #[test]
    fn test_deaggregate_crossing_alignment() {
        let blocks = deaggregate(
            Ipv4Addr::new(10, 0, 0, 128),
            Ipv4Addr::new(10, 0, 1, 127),
        )
        .unwrap();
        assert_eq!(blocks, cidrs(&["10.0.0.128/25", "10.0.1.0/25"]));
    }

    #[test]
    fn test_deaggregate_single_address() {
        let blocks = deaggregate(Ipv4Addr::new(10, 1, 2, 3), Ipv4Addr::new(10, 1, 2, 3)).unwrap();
        assert_eq!(blocks, cidrs(&["10.1.2.3/32"]));
    }

    #[test]
    fn test_deaggregate_whole_space() {
        let blocks = deaggregate(
            Ipv4Addr::new(0, 0, 0, 0),
            Ipv4Addr::new(255, 255, 255, 255),
        )
        .unwrap();
        assert_eq!(blocks, cidrs(&["0.0.0.0/0"]));
    }

    #[test]
    fn test_deaggregate_rejects_reversed_range() {
        assert!(deaggregate(Ipv4Addr::new(10, 0, 1, 0), Ipv4Addr::new(10, 0, 0, 0)).is_err());
    }

    #[test]
    fn test_deaggregate_covers_exactly() {
        let first = Ipv4Addr::new(172, 16, 3, 7);
        let last = Ipv4Addr::new(172, 16, 9, 200);
        let blocks = deaggregate(first, last).unwrap();

        // blocks must be sorted, disjoint, and cover the range exactly
        let mut expected = u32::from(first) as u64;
        for b in &blocks {
            assert_eq!(u32::from(b.lo()) as u64, expected, "gap before {b}");
            expected = u32::from(b.hi()) as u64 + 1;
        }
        assert_eq!(expected, u32::from(last) as u64 + 1, "range not covered");
    }

    #[test]
    fn test_summarize_joins_siblings() {
        let merged = summarize(&cidrs(&["10.0.0.0/25", "10.0.0.128/25"]));
        assert_eq!(merged, cidrs(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_summarize_absorbs_contained() {
        let merged = summarize(&cidrs(&["10.0.0.0/16", "10.0.4.0/24", "10.0.0.0/24"]));
        assert_eq!(merged, cidrs(&["10.0.0.0/16"]));
    }

    #[test]
    fn test_summarize_cascading_merge() {
        let merged = summarize(&cidrs(&[
            "10.0.0.0/26",
            "10.0.0.64/26",
            "10.0.0.128/26",
            "10.0.0.192/26",
        ]));
        assert_eq!(merged, cidrs(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_summarize_keeps_unaligned_neighbors() {
        // adjacent but not siblings of a common parent
        let merged = summarize(&cidrs(&["10.0.0.128/25", "10.0.1.0/25"]));
        assert_eq!(merged, cidrs(&["10.0.0.128/25", "10.0.1.0/25"]));
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_summarize_roundtrip_with_deaggregate() {
        let blocks = deaggregate(
            Ipv4Addr::new(10, 0, 0, 0),
            Ipv4Addr::new(10, 0, 3, 255),
        )
        .unwrap();
        assert_eq!(summarize(&blocks), cidrs(&["10.0.0.0/22"]));
    }
}
