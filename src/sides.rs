use crate::length::LengthSpec;
use crate::types::{Color, Pt};

/// Shorthand for a four-sided property (padding, border width, border color).
#[derive(Debug, Clone, PartialEq)]
pub enum SideDefinition<T> {
    /// One value for every side.
    All(T),
    /// `[vertical, horizontal]` or `{vertical, horizontal}`.
    Axes { vertical: T, horizontal: T },
    /// `[top, right, bottom, left]` or `{top, right, bottom, left}`.
    Each {
        top: T,
        right: T,
        bottom: T,
        left: T,
    },
    /// An array of any other length. Its first value is broadcast and the
    /// table reports the original length as a warning.
    Malformed { first: T, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sides<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Clone> Sides<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }
}

impl<T> Sides<T> {
    pub fn map<O>(&self, mut f: impl FnMut(&T) -> O) -> Sides<O> {
        Sides {
            top: f(&self.top),
            right: f(&self.right),
            bottom: f(&self.bottom),
            left: f(&self.left),
        }
    }
}

impl Sides<Pt> {
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }
}

impl<T: Clone> SideDefinition<T> {
    pub fn all(value: T) -> Self {
        SideDefinition::All(value)
    }

    pub fn axes(vertical: T, horizontal: T) -> Self {
        SideDefinition::Axes {
            vertical,
            horizontal,
        }
    }

    pub fn each(top: T, right: T, bottom: T, left: T) -> Self {
        SideDefinition::Each {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Array shorthand. One value broadcasts, two are `[vertical, horizontal]`,
    /// four are `[top, right, bottom, left]`. Any other length is not a valid
    /// shorthand and its first value is broadcast to all sides.
    pub fn from_values(values: &[T]) -> Option<Self> {
        match values {
            [] => None,
            [all] => Some(SideDefinition::All(all.clone())),
            [vertical, horizontal] => Some(SideDefinition::axes(vertical.clone(), horizontal.clone())),
            [top, right, bottom, left] => Some(SideDefinition::each(
                top.clone(),
                right.clone(),
                bottom.clone(),
                left.clone(),
            )),
            [first, ..] => Some(SideDefinition::Malformed {
                first: first.clone(),
                len: values.len(),
            }),
        }
    }

    /// Length of the array a malformed definition was built from.
    pub fn malformed_len(&self) -> Option<usize> {
        match self {
            SideDefinition::Malformed { len, .. } => Some(*len),
            _ => None,
        }
    }

    pub fn expand(&self) -> Sides<T> {
        match self {
            SideDefinition::All(value) | SideDefinition::Malformed { first: value, .. } => {
                Sides::uniform(value.clone())
            }
            SideDefinition::Axes {
                vertical,
                horizontal,
            } => Sides {
                top: vertical.clone(),
                right: horizontal.clone(),
                bottom: vertical.clone(),
                left: horizontal.clone(),
            },
            SideDefinition::Each {
                top,
                right,
                bottom,
                left,
            } => Sides {
                top: top.clone(),
                right: right.clone(),
                bottom: bottom.clone(),
                left: left.clone(),
            },
        }
    }
}

/// Expands a side definition into an explicit four-sided record.
///
/// An absent definition is replaced by `default` before the shape is inspected,
/// so a shorthand default is expanded the same way. `transform` runs once per
/// side on the expanded values.
pub fn normalize_sides<T: Clone, O>(
    sides: Option<&SideDefinition<T>>,
    default: &SideDefinition<T>,
    transform: impl FnMut(&T) -> O,
) -> Sides<O> {
    sides.unwrap_or(default).expand().map(transform)
}

impl From<LengthSpec> for SideDefinition<LengthSpec> {
    fn from(value: LengthSpec) -> Self {
        SideDefinition::All(value)
    }
}

impl From<f32> for SideDefinition<LengthSpec> {
    fn from(value: f32) -> Self {
        SideDefinition::All(LengthSpec::from(value))
    }
}

impl From<i32> for SideDefinition<LengthSpec> {
    fn from(value: i32) -> Self {
        SideDefinition::All(LengthSpec::from(value))
    }
}

impl From<bool> for SideDefinition<LengthSpec> {
    fn from(value: bool) -> Self {
        SideDefinition::All(LengthSpec::from(value))
    }
}

impl From<&str> for SideDefinition<LengthSpec> {
    fn from(value: &str) -> Self {
        SideDefinition::All(LengthSpec::from(value))
    }
}

impl From<[f32; 2]> for SideDefinition<LengthSpec> {
    fn from([vertical, horizontal]: [f32; 2]) -> Self {
        SideDefinition::axes(vertical.into(), horizontal.into())
    }
}

impl From<[f32; 4]> for SideDefinition<LengthSpec> {
    fn from([top, right, bottom, left]: [f32; 4]) -> Self {
        SideDefinition::each(top.into(), right.into(), bottom.into(), left.into())
    }
}

impl From<Color> for SideDefinition<Color> {
    fn from(value: Color) -> Self {
        SideDefinition::All(value)
    }
}
