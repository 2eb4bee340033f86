//! CSV output formatting for the address tools.

use crate::models::{netmask_dotted, usable_hosts, Ipv4};
use crate::processing::VlsmResult;
use colored::Colorize;
use std::error::Error;

use super::terminal::format_field;

/// Print a VLSM result as CSV to stdout, free blocks included.
///
/// # Arguments
/// * `result` - The allocation result to print
pub fn print_vlsm_csv(result: &VlsmResult) -> Result<(), Box<dyn Error>> {
    log::info!(
        "#Start print_vlsm_csv() base={} allocations={}",
        result.base,
        result.allocations.len()
    );

    println!(
        r#"  "cnt",             "name",        "subnet_cidr",         "netmask",       "broadcast", "requested", "usable""#
    );

    for (i, alloc) in result.allocations.iter().enumerate() {
        println!(
            "{cnt},{name},{cidr},{netmask},{broadcast},{requested},{usable}",
            cnt = format_field(i + 1, 7),
            name = format_field(&alloc.name, 19),
            cidr = format_field(alloc.cidr, 20),
            netmask = format_field(netmask_dotted(alloc.cidr.mask)?, 18),
            broadcast = format_field(alloc.cidr.hi(), 17),
            requested = format_field(alloc.requested_hosts, 12),
            usable = format_field(alloc.usable_hosts, 9),
        );
    }

    for free in &result.free {
        println!(
            "{cnt},{name},{cidr},{netmask},{broadcast},{requested},{usable}",
            cnt = format_field("---", 7),
            name = format_field("-free-", 19),
            cidr = format_field(free, 20),
            netmask = format_field(netmask_dotted(free.mask)?, 18),
            broadcast = format_field(free.hi(), 17),
            requested = format_field(0, 12),
            usable = format_field(usable_hosts(free.mask)?, 9),
        );
    }

    println!(
        "#{}# base {} fully accounted for",
        "NOTE".on_blue(),
        result.base
    );
    Ok(())
}

/// Print a plain CIDR list as CSV rows with host counts.
///
/// Used by the split, deaggregate and summarize tools.
pub fn print_cidr_list_csv(blocks: &[Ipv4]) -> Result<(), Box<dyn Error>> {
    println!(r#"  "cnt",        "subnet_cidr",       "broadcast", "usable""#);
    for (i, block) in blocks.iter().enumerate() {
        println!(
            "{cnt},{cidr},{broadcast},{usable}",
            cnt = format_field(i + 1, 7),
            cidr = format_field(block, 20),
            broadcast = format_field(block.hi(), 17),
            usable = format_field(usable_hosts(block.mask)?, 9),
        );
    }
    Ok(())
}
