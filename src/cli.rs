//! Command-line shell.
//!
//! One subcommand per tool. Parsing and dispatch only; every computation
//! lives in the processing modules.

use crate::models::Ipv4;
use crate::output;
use crate::processing::{self, NamedCidr, QrStyle, VlsmRequest};
use crate::remote;
use crate::storage;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::error::Error;
use std::net::Ipv4Addr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ops-toolbox", about = "Independent operator utilities: subnet math, env diffs, QR styling, diagrams, invoices")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe a subnet: network, masks, broadcast, host range
    Subnet {
        /// Subnet in CIDR notation, e.g. 192.168.1.0/24
        cidr: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split a block into equal-size subnets
    Split {
        /// Parent block in CIDR notation
        cidr: String,
        /// Prefix length of the children
        new_prefix: u8,
        #[arg(long)]
        json: bool,
    },
    /// Allocate named subnets by host count (VLSM)
    Vlsm {
        /// Base block to allocate from
        base: String,
        /// Requests as name=hosts, e.g. sales=100 eng=50
        #[arg(required = true)]
        requests: Vec<String>,
        /// Existing subnets as name=cidr to cross-check for collisions
        #[arg(long)]
        existing: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Find overlapping subnets in a set
    Collide {
        /// Subnets as name=cidr
        #[arg(required = true)]
        subnets: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Deaggregate an address range into minimal CIDR blocks
    Deaggregate {
        /// First address of the range
        first: String,
        /// Last address of the range, inclusive
        last: String,
        #[arg(long)]
        json: bool,
    },
    /// Merge CIDR blocks into their minimal covering list
    Summarize {
        /// Blocks in CIDR notation
        #[arg(required = true)]
        cidrs: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Diff two dotenv-format files key by key
    Envdiff {
        /// Baseline file
        old_file: PathBuf,
        /// File compared against the baseline
        new_file: PathBuf,
        /// Hide values in the output
        #[arg(long)]
        mask: bool,
        /// Print a raw unified line diff instead
        #[arg(long)]
        unified: bool,
        #[arg(long)]
        json: bool,
    },
    /// Render a styled QR code
    Qr {
        /// Payload to encode
        data: String,
        /// Module color (#rgb, #rrggbb or transparent)
        #[arg(long, default_value = "#000000")]
        dark: String,
        /// Background color
        #[arg(long, default_value = "#ffffff")]
        light: String,
        /// Drop the quiet zone around the code
        #[arg(long)]
        no_quiet_zone: bool,
        /// Minimum SVG edge length in pixels
        #[arg(long, default_value_t = 200)]
        min_size: u32,
        /// Error correction level: L, M, Q or H
        #[arg(long, default_value = "M")]
        ec: String,
        /// Write SVG to this file instead of previewing in the terminal
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Inspect a mermaid diagram source
    Mermaid {
        /// File holding the diagram source
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Render a mermaid diagram through the remote render service
    Render {
        /// File holding the diagram source
        file: PathBuf,
        /// Write the SVG here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compute totals for an invoice JSON document
    Invoice {
        /// Invoice document
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the last saved state of a tool
    Recall {
        /// Tool name, e.g. subnet, vlsm, envdiff
        tool: String,
    },
}

/// Parse "name=value" pairs from the command line.
fn parse_named(raw: &str) -> Result<(&str, &str), Box<dyn Error>> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .ok_or_else(|| format!("Expected name=value, got: {raw}").into())
}

fn parse_requests(raw: &[String]) -> Result<Vec<VlsmRequest>, Box<dyn Error>> {
    raw.iter()
        .map(|r| {
            let (name, hosts) = parse_named(r)?;
            let hosts: u64 = hosts
                .parse()
                .map_err(|_| format!("Invalid host count in: {r}"))?;
            Ok(VlsmRequest {
                name: name.to_string(),
                hosts,
            })
        })
        .collect()
}

fn parse_named_cidrs(raw: &[String]) -> Result<Vec<NamedCidr>, Box<dyn Error>> {
    raw.iter()
        .map(|r| {
            let (name, cidr) = parse_named(r)?;
            Ok(NamedCidr {
                name: name.to_string(),
                cidr: Ipv4::new(cidr)?,
            })
        })
        .collect()
}

fn parse_addr(raw: &str) -> Result<Ipv4Addr, Box<dyn Error>> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid IP address: {raw}").into())
}

/// Save tool state, never failing the command over it.
fn save_tool_state<T: Serialize>(tool: &str, data: &T) {
    if let Err(e) = storage::save_state(tool, data) {
        log::warn!("Could not save {tool} state: {e}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse arguments and run the selected tool.
pub async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Subnet { cidr, json } => {
            let info = processing::subnet_info(Ipv4::new(&cidr)?)?;
            save_tool_state("subnet", &info);
            if json {
                print_json(&info)?;
            } else {
                println!("{} {}", output::pad_label("Network:", 12), info.cidr);
                println!(
                    "{} {} = {}",
                    output::pad_label("Netmask:", 12),
                    info.netmask,
                    info.cidr.mask
                );
                println!("{} {}", output::pad_label("Wildcard:", 12), info.wildcard);
                println!("{} {}", output::pad_label("Broadcast:", 12), info.broadcast);
                println!("{} {}", output::pad_label("HostMin:", 12), info.first_host);
                println!("{} {}", output::pad_label("HostMax:", 12), info.last_host);
                println!(
                    "{} {} usable of {}",
                    output::pad_label("Hosts/Net:", 12),
                    info.usable_hosts,
                    info.total_addresses
                );
                println!(
                    "{} {}, {}",
                    output::pad_label("Class:", 12),
                    info.class,
                    info.scope
                );
            }
        }
        Command::Split {
            cidr,
            new_prefix,
            json,
        } => {
            let children = processing::split(Ipv4::new(&cidr)?, new_prefix)?;
            save_tool_state("split", &children);
            if json {
                print_json(&children)?;
            } else {
                output::print_cidr_list_csv(&children)?;
            }
        }
        Command::Vlsm {
            base,
            requests,
            existing,
            json,
        } => {
            let requests = parse_requests(&requests)?;
            let result = processing::allocate(Ipv4::new(&base)?, &requests)?;

            let existing = parse_named_cidrs(&existing)?;
            let collisions = processing::check_against_existing(&result, &existing);
            processing::log_collisions(&collisions);

            save_tool_state("vlsm", &result);
            if json {
                print_json(&serde_json::json!({
                    "result": result,
                    "collisions": collisions,
                }))?;
            } else {
                output::print_vlsm_csv(&result)?;
                for c in &collisions {
                    println!(
                        "#{}# {} '{}' overlaps {} '{}'",
                        "COLLISION".on_red(),
                        c.outer.cidr,
                        c.outer.name,
                        c.inner.cidr,
                        c.inner.name
                    );
                }
            }
        }
        Command::Collide { subnets, json } => {
            let subnets = parse_named_cidrs(&subnets)?;
            let collisions = processing::find_collisions(&subnets);
            processing::log_collisions(&collisions);
            save_tool_state("collide", &collisions);
            if json {
                print_json(&collisions)?;
            } else if collisions.is_empty() {
                println!("No overlapping subnets.");
            } else {
                for c in &collisions {
                    println!(
                        "{} '{}' overlaps {} '{}' ({:?})",
                        c.outer.cidr, c.outer.name, c.inner.cidr, c.inner.name, c.kind
                    );
                }
            }
        }
        Command::Deaggregate { first, last, json } => {
            let blocks = processing::deaggregate_range(parse_addr(&first)?, parse_addr(&last)?)?;
            save_tool_state("deaggregate", &blocks);
            if json {
                print_json(&blocks)?;
            } else {
                output::print_cidr_list_csv(&blocks)?;
            }
        }
        Command::Summarize { cidrs, json } => {
            let parsed: Vec<Ipv4> = cidrs
                .iter()
                .map(|c| Ipv4::new(c))
                .collect::<Result<_, _>>()?;
            let merged = processing::summarize(&parsed);
            save_tool_state("summarize", &merged);
            if json {
                print_json(&merged)?;
            } else {
                output::print_cidr_list_csv(&merged)?;
            }
        }
        Command::Envdiff {
            old_file,
            new_file,
            mask,
            unified,
            json,
        } => {
            let old_text = std::fs::read_to_string(&old_file)
                .map_err(|e| format!("Error reading {}: {e}", old_file.display()))?;
            let new_text = std::fs::read_to_string(&new_file)
                .map_err(|e| format!("Error reading {}: {e}", new_file.display()))?;

            if unified {
                print!(
                    "{}",
                    processing::unified_text_diff(
                        &old_text,
                        &new_text,
                        &old_file.display().to_string(),
                        &new_file.display().to_string(),
                    )
                );
                return Ok(());
            }

            let diff = crate::diff_env_texts(&old_text, &new_text);
            save_tool_state("envdiff", &diff.stats);
            let rendered = if mask { diff.masked() } else { diff };
            if json {
                print_json(&rendered)?;
            } else {
                output::print_env_diff(&rendered);
            }
        }
        Command::Qr {
            data,
            dark,
            light,
            no_quiet_zone,
            min_size,
            ec,
            output: out_file,
        } => {
            let style = QrStyle {
                dark,
                light,
                quiet_zone: !no_quiet_zone,
                min_size,
                ec_level: ec.parse::<processing::ErrorCorrection>()?,
            };
            save_tool_state("qr", &style);
            match out_file {
                Some(path) => {
                    let svg = processing::render_svg(&data, &style)?;
                    std::fs::write(&path, &svg)
                        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
                    println!("Wrote {} bytes of SVG to {}", svg.len(), path.display());
                }
                None => {
                    println!("{}", processing::render_unicode(&data, &style)?);
                }
            }
        }
        Command::Mermaid { file, json } => {
            let source = std::fs::read_to_string(&file)
                .map_err(|e| format!("Error reading {}: {e}", file.display()))?;
            let report = processing::check_source(&source)?;
            save_tool_state("mermaid", &report);
            if json {
                print_json(&report)?;
            } else {
                println!(
                    "{} {}",
                    output::pad_label("Diagram:", 14),
                    report.diagram_type
                );
                println!(
                    "{} {} ({} significant)",
                    output::pad_label("Lines:", 14),
                    report.line_count,
                    report.significant_lines
                );
                println!("{} {}", output::pad_label("Characters:", 14), report.char_count);
                if let Some(init) = &report.init_directive {
                    println!("{} {init}", output::pad_label("Init:", 14));
                }
            }
        }
        Command::Render { file, output: out_file } => {
            let source = std::fs::read_to_string(&file)
                .map_err(|e| format!("Error reading {}: {e}", file.display()))?;
            let svg = remote::render_mermaid(&source).await?;
            match out_file {
                Some(path) => {
                    std::fs::write(&path, &svg)
                        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
                    println!("Wrote {} bytes of SVG to {}", svg.len(), path.display());
                }
                None => println!("{svg}"),
            }
        }
        Command::Invoice { file, json } => {
            let invoice = crate::load_invoice(&file)?;
            let totals = processing::compute_totals(&invoice)?;
            save_tool_state("invoice", &totals);
            if json {
                print_json(&serde_json::json!({
                    "invoice": invoice,
                    "totals": totals,
                }))?;
            } else {
                print!("{}", output::render_statement(&invoice, &totals));
            }
        }
        Command::Recall { tool } => match storage::load_state_raw(&tool)? {
            Some(state) => print_json(&state)?,
            None => println!("No saved state for '{tool}'."),
        },
    }

    Ok(())
}
