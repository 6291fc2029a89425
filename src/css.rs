use lightningcss::properties::Property;
use lightningcss::properties::size::Size as CssSize;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute};
use lightningcss::values::color::{CssColor, SRGB};
use lightningcss::values::length::{LengthPercentage, LengthValue};

use crate::debug::table_debug_enabled;
use crate::length::LengthSpec;
use crate::types::{Color, Pt};

pub(crate) fn parse_length(raw: &str) -> Option<LengthSpec> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("auto") {
        return Some(LengthSpec::Auto);
    }
    if let Ok(value) = trimmed.parse::<f32>() {
        return Some(LengthSpec::pt(value));
    }

    let css = format!("width: {trimmed}");
    let parsed = match StyleAttribute::parse(&css, ParserOptions::default()) {
        Ok(style_attr) => style_attr
            .declarations
            .declarations
            .iter()
            .rev()
            .find_map(|prop| match prop {
                Property::Width(size) => length_spec_from_size(size),
                _ => None,
            }),
        Err(_) => None,
    };
    if parsed.is_none() && table_debug_enabled() {
        eprintln!("[tabula.css] unparseable size expression {:?}", raw);
    }
    parsed
}

fn length_spec_from_size(size: &CssSize) -> Option<LengthSpec> {
    match size {
        CssSize::Auto => Some(LengthSpec::Auto),
        CssSize::LengthPercentage(value) => match value {
            LengthPercentage::Percentage(pct) => Some(LengthSpec::Percent(pct.0)),
            LengthPercentage::Dimension(length) => length_spec_from_value(length),
            _ => None,
        },
        _ => None,
    }
}

fn length_spec_from_value(length: &LengthValue) -> Option<LengthSpec> {
    match length {
        LengthValue::Em(val) => Some(LengthSpec::Em(*val)),
        LengthValue::Rem(val) => Some(LengthSpec::Rem(*val)),
        // Font-relative units without metrics; approximated from the em box.
        LengthValue::Ex(val) => Some(LengthSpec::Em(*val * 0.5)),
        LengthValue::Ch(val) => Some(LengthSpec::Em(*val * 0.6)),
        _ => length.to_px().map(|px| LengthSpec::Absolute(px_to_pt(px))),
    }
}

fn px_to_pt(px: f32) -> Pt {
    Pt::from_f32(px * 0.75)
}

pub(crate) fn parse_color(raw: &str) -> Option<Color> {
    let css = format!("color: {}", raw.trim());
    let style_attr = StyleAttribute::parse(&css, ParserOptions::default()).ok()?;
    style_attr
        .declarations
        .declarations
        .iter()
        .rev()
        .find_map(|prop| match prop {
            Property::Color(color) => css_color_to_color(color),
            _ => None,
        })
}

fn css_color_to_color(color: &CssColor) -> Option<Color> {
    if let CssColor::RGBA(rgba) = color {
        let alpha = rgba.alpha as f32 / 255.0;
        // No alpha fills; blend over white.
        let r = (rgba.red as f32 / 255.0) * alpha + (1.0 - alpha);
        let g = (rgba.green as f32 / 255.0) * alpha + (1.0 - alpha);
        let b = (rgba.blue as f32 / 255.0) * alpha + (1.0 - alpha);
        return Some(Color::rgb(r, g, b));
    }
    if let Ok(srgb) = SRGB::try_from(color) {
        return Some(Color::rgb(srgb.r, srgb.g, srgb.b));
    }
    None
}
