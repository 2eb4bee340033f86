//! QR code styling.
//!
//! Styling and rendering around the `qrcode` crate; byte encoding itself is
//! the crate's job. Output is SVG for embedding and a dense unicode form for
//! terminal preview.

use crate::config;
use lazy_static::lazy_static;
use qrcode::render::{svg, unicode};
use qrcode::{EcLevel, QrCode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;

lazy_static! {
    static ref HEX_COLOR_RE: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid Regex?");
}

/// Error correction level, mirrors the encoder's four levels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    #[default]
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(ec: ErrorCorrection) -> EcLevel {
        match ec {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl std::str::FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::L),
            "M" => Ok(ErrorCorrection::M),
            "Q" => Ok(ErrorCorrection::Q),
            "H" => Ok(ErrorCorrection::H),
            other => Err(format!("Unknown error correction level: {other}")),
        }
    }
}

/// Visual style applied to a rendered QR code.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QrStyle {
    /// Module color, `#rgb`/`#rrggbb` hex or `transparent`.
    pub dark: String,
    /// Background color, `#rgb`/`#rrggbb` hex or `transparent`.
    pub light: String,
    /// Render the 4-module quiet zone around the code.
    pub quiet_zone: bool,
    /// Minimum output edge length in pixels (SVG only).
    pub min_size: u32,
    /// Error correction level.
    pub ec_level: ErrorCorrection,
}

impl Default for QrStyle {
    fn default() -> Self {
        QrStyle {
            dark: "#000000".to_string(),
            light: "#ffffff".to_string(),
            quiet_zone: true,
            min_size: 200,
            ec_level: ErrorCorrection::default(),
        }
    }
}

impl QrStyle {
    /// Validate the style before rendering.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        check_color(&self.dark)?;
        check_color(&self.light)?;
        if self.min_size == 0 {
            return Err("Minimum size must be at least 1 pixel".into());
        }
        Ok(())
    }
}

fn check_color(color: &str) -> Result<(), Box<dyn Error>> {
    if color == "transparent" || HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(format!("Invalid color '{color}', expected #rgb, #rrggbb or transparent").into())
    }
}

/// Encode `data` and check payload limits first.
fn encode(data: &str, style: &QrStyle) -> Result<QrCode, Box<dyn Error>> {
    if data.is_empty() {
        return Err("QR payload must not be empty".into());
    }
    if data.len() > config::QR_MAX_BYTES {
        return Err(format!(
            "QR payload of {} bytes exceeds the {} byte limit",
            data.len(),
            config::QR_MAX_BYTES
        )
        .into());
    }
    style.validate()?;
    QrCode::with_error_correction_level(data.as_bytes(), style.ec_level.into())
        .map_err(|e| format!("QR encoding failed: {e}").into())
}

/// Render a styled QR code as an SVG document.
///
/// # Arguments
/// * `data` - The payload to encode
/// * `style` - Colors, quiet zone and sizing
pub fn render_svg(data: &str, style: &QrStyle) -> Result<String, Box<dyn Error>> {
    let code = encode(data, style)?;
    let version = code.version();

    let svg_string = code
        .render()
        .min_dimensions(style.min_size, style.min_size)
        .quiet_zone(style.quiet_zone)
        .dark_color(svg::Color(&style.dark))
        .light_color(svg::Color(&style.light))
        .build();

    log::debug!(
        "rendered QR {version:?} ({} bytes payload) as SVG",
        data.len()
    );
    Ok(svg_string)
}

/// Render a QR code as dense unicode half-blocks for the terminal.
///
/// Colors do not apply here; the quiet zone setting does.
pub fn render_unicode(data: &str, style: &QrStyle) -> Result<String, Box<dyn Error>> {
    let code = encode(data, style)?;

    let rendered = code
        .render::<unicode::Dense1x2>()
        .quiet_zone(style.quiet_zone)
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build();

    Ok(rendered)
}
