use crate::css;
use crate::debug::table_debug_enabled;
use crate::types::Pt;

/// A declared dimension before it is resolved against the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthSpec {
    Auto,
    Absolute(Pt),
    /// Fraction of the reference length, `0.5` is 50%.
    Percent(f32),
    Em(f32),
    Rem(f32),
}

impl LengthSpec {
    pub fn pt(value: f32) -> Self {
        LengthSpec::Absolute(Pt::from_f32(value))
    }

    /// Parses a size expression: a bare number (points) or a CSS length/percentage.
    /// Anything unparseable becomes `Auto` so the caller's default applies.
    pub fn parse(raw: &str) -> Self {
        match css::parse_length(raw) {
            Some(spec) => spec,
            None => {
                if table_debug_enabled() && !raw.trim().is_empty() {
                    eprintln!("[tabula.table] unparseable size {:?}, using default", raw);
                }
                LengthSpec::Auto
            }
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, LengthSpec::Auto)
    }

    pub fn resolve(self, reference: Pt, font_size: Pt, root_font_size: Pt) -> Option<Pt> {
        match self {
            LengthSpec::Auto => None,
            LengthSpec::Absolute(value) => Some(value),
            LengthSpec::Percent(value) => Some(reference * value),
            LengthSpec::Em(value) => Some(font_size * value),
            LengthSpec::Rem(value) => Some(root_font_size * value),
        }
    }
}

impl Default for LengthSpec {
    fn default() -> Self {
        LengthSpec::Auto
    }
}

impl From<Pt> for LengthSpec {
    fn from(value: Pt) -> Self {
        LengthSpec::Absolute(value)
    }
}

impl From<f32> for LengthSpec {
    fn from(value: f32) -> Self {
        LengthSpec::pt(value)
    }
}

impl From<i32> for LengthSpec {
    fn from(value: i32) -> Self {
        LengthSpec::Absolute(Pt::from_i32(value))
    }
}

// Wideness: `false` draws nothing, `true` is a hairline of one point.
impl From<bool> for LengthSpec {
    fn from(value: bool) -> Self {
        if value {
            LengthSpec::Absolute(Pt::from_i32(1))
        } else {
            LengthSpec::Absolute(Pt::ZERO)
        }
    }
}

impl From<&str> for LengthSpec {
    fn from(value: &str) -> Self {
        LengthSpec::parse(value)
    }
}

impl From<String> for LengthSpec {
    fn from(value: String) -> Self {
        LengthSpec::parse(&value)
    }
}
