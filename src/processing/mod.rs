//! Tool processing logic.
//!
//! One module per tool, each a pure form-to-result transformation:
//! - [`subnet`] - subnet calculator and block splitting
//! - [`vlsm`] - VLSM allocation and collision detection
//! - [`deaggregate`] - range deaggregation and CIDR summarization
//! - [`envdiff`] - environment-file diffing
//! - [`qr`] - QR code styling
//! - [`mermaid`] - Mermaid source inspection
//! - [`invoice`] - invoice totals

pub mod deaggregate;
pub mod envdiff;
pub mod invoice;
pub mod mermaid;
pub mod qr;
pub mod subnet;
pub mod vlsm;

// Re-export public functions
pub use deaggregate::{deaggregate as deaggregate_range, summarize};
pub use envdiff::{diff_env, unified_text_diff, EnvChangeType, EnvDiff, EnvDiffEntry};
pub use invoice::{compute_totals, InvoiceTotals, TaxLine};
pub use mermaid::{check_source, detect_diagram_type, extract_init_directive, DiagramType};
pub use qr::{render_svg, render_unicode, ErrorCorrection, QrStyle};
pub use subnet::{split, subnet_info};
pub use vlsm::{
    allocate, check_against_existing, find_collisions, log_collisions, Collision, CollisionKind,
    NamedCidr, VlsmAllocation, VlsmRequest, VlsmResult,
};
