use std::fmt;
use std::sync::Arc;

use crate::css;
use crate::length::LengthSpec;
use crate::sides::SideDefinition;
use crate::types::{Color, Pt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

impl HAlign {
    /// Share of the free horizontal space placed before the content.
    pub fn offset_scale(self) -> f32 {
        match self {
            HAlign::Right => 1.0,
            HAlign::Center => 0.5,
            HAlign::Left | HAlign::Justify => 0.0,
        }
    }
}

impl VAlign {
    pub fn offset_scale(self) -> f32 {
        match self {
            VAlign::Bottom => 1.0,
            VAlign::Center => 0.5,
            VAlign::Top => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub x: Option<HAlign>,
    pub y: Option<VAlign>,
}

impl Alignment {
    pub fn new(x: HAlign, y: VAlign) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// The single-keyword form that applies to both axes.
    pub fn center() -> Self {
        Self::new(HAlign::Center, VAlign::Center)
    }

    pub fn resolved(self) -> (HAlign, VAlign) {
        (self.x.unwrap_or(HAlign::Left), self.y.unwrap_or(VAlign::Top))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSelection {
    pub src: Option<String>,
    pub family: Option<String>,
    pub size: Option<LengthSpec>,
}

impl FontSelection {
    pub fn named(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Self::default()
        }
    }

    pub fn sized(size: impl Into<LengthSpec>) -> Self {
        Self {
            size: Some(size.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_none() && self.family.is_none() && self.size.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Text to lay out, `None` for an empty cell.
    pub fn content(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(value) => Some(format!("{value}")),
            CellValue::Bool(true) => Some("\u{2713}".to_string()),
            CellValue::Bool(false) => Some("\u{2715}".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Data,
    Header,
}

impl CellKind {
    pub fn role(self) -> &'static str {
        match self {
            CellKind::Data => "TD",
            CellKind::Header => "TH",
        }
    }
}

/// A cell declaration. Every field is optional so declarations can be layered:
/// cell over row default over table default over engine default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellStyle {
    pub value: Option<CellValue>,
    pub row_span: Option<f32>,
    pub col_span: Option<f32>,
    pub padding: Option<SideDefinition<LengthSpec>>,
    pub border: Option<SideDefinition<LengthSpec>>,
    pub border_color: Option<SideDefinition<Color>>,
    pub background_color: Option<Color>,
    pub text_color: Option<Color>,
    pub text_stroke: Option<LengthSpec>,
    pub text_stroke_color: Option<Color>,
    pub align: Option<Alignment>,
    pub font: Option<FontSelection>,
    pub x: Option<LengthSpec>,
    pub y: Option<LengthSpec>,
    pub rotation: Option<f32>,
    pub ellipsis: Option<bool>,
    pub kind: Option<CellKind>,
    pub debug: Option<bool>,
}

fn layer<T: Clone>(over: &Option<T>, under: &Option<T>) -> Option<T> {
    over.clone().or_else(|| under.clone())
}

impl CellStyle {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Field-wise override: any field set on `self` replaces the field in `base`
    /// wholesale. Side definitions are not spliced.
    pub fn over(&self, base: &CellStyle) -> CellStyle {
        CellStyle {
            value: layer(&self.value, &base.value),
            row_span: layer(&self.row_span, &base.row_span),
            col_span: layer(&self.col_span, &base.col_span),
            padding: layer(&self.padding, &base.padding),
            border: layer(&self.border, &base.border),
            border_color: layer(&self.border_color, &base.border_color),
            background_color: layer(&self.background_color, &base.background_color),
            text_color: layer(&self.text_color, &base.text_color),
            text_stroke: layer(&self.text_stroke, &base.text_stroke),
            text_stroke_color: layer(&self.text_stroke_color, &base.text_stroke_color),
            align: layer(&self.align, &base.align),
            font: layer(&self.font, &base.font),
            x: layer(&self.x, &base.x),
            y: layer(&self.y, &base.y),
            rotation: layer(&self.rotation, &base.rotation),
            ellipsis: layer(&self.ellipsis, &base.ellipsis),
            kind: layer(&self.kind, &base.kind),
            debug: layer(&self.debug, &base.debug),
        }
    }

    /// Layers from least to most specific.
    pub fn cascade<'a>(layers: impl IntoIterator<Item = &'a CellStyle>) -> CellStyle {
        layers
            .into_iter()
            .fold(CellStyle::default(), |acc, next| next.over(&acc))
    }

    pub fn with_col_span(mut self, span: impl Into<f32>) -> Self {
        self.col_span = Some(span.into());
        self
    }

    pub fn with_row_span(mut self, span: impl Into<f32>) -> Self {
        self.row_span = Some(span.into());
        self
    }

    pub fn with_padding(mut self, padding: impl Into<SideDefinition<LengthSpec>>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn with_border(mut self, border: impl Into<SideDefinition<LengthSpec>>) -> Self {
        self.border = Some(border.into());
        self
    }

    pub fn with_border_color(mut self, color: impl Into<SideDefinition<Color>>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn with_text_stroke(mut self, width: impl Into<LengthSpec>, color: Option<Color>) -> Self {
        self.text_stroke = Some(width.into());
        self.text_stroke_color = color;
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_font(mut self, font: FontSelection) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_position(mut self, x: Option<LengthSpec>, y: Option<LengthSpec>) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = Some(ellipsis);
        self
    }

    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Largest row or column span a cell can declare.
pub const MAX_SPAN: usize = u16::MAX as usize;

/// Spans are whole cells: truncated toward negative infinity, never below one
/// and never above [`MAX_SPAN`].
pub fn normalize_span(span: Option<f32>) -> usize {
    match span {
        Some(value) if value.is_nan() || value < 1.0 => 1,
        Some(value) if value >= MAX_SPAN as f32 => MAX_SPAN,
        Some(value) => value.floor() as usize,
        None => 1,
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellStyle {
    fn from(value: &str) -> Self {
        CellStyle::new(value)
    }
}

impl From<String> for CellStyle {
    fn from(value: String) -> Self {
        CellStyle::new(value)
    }
}

impl From<bool> for CellStyle {
    fn from(value: bool) -> Self {
        CellStyle::new(value)
    }
}

impl From<f64> for CellStyle {
    fn from(value: f64) -> Self {
        CellStyle::new(value)
    }
}

impl From<i32> for CellStyle {
    fn from(value: i32) -> Self {
        CellStyle::new(value)
    }
}

impl<T: Into<CellStyle>> From<Option<T>> for CellStyle {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => CellStyle::new(CellValue::Empty),
        }
    }
}

impl Color {
    /// Parses any CSS color (`lightgrey`, `#ccc`, `rgb(0 0 0)`).
    pub fn parse(raw: &str) -> Option<Color> {
        css::parse_color(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    Auto,
    Fixed(LengthSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub height: RowHeight,
    pub min_height: LengthSpec,
    /// `Auto` leaves the row unbounded above.
    pub max_height: LengthSpec,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            height: RowHeight::Auto,
            min_height: LengthSpec::Absolute(Pt::ZERO),
            max_height: LengthSpec::Auto,
        }
    }
}

impl RowStyle {
    pub fn fixed(height: impl Into<LengthSpec>) -> Self {
        Self {
            height: RowHeight::Fixed(height.into()),
            ..Self::default()
        }
    }

    pub fn with_min_height(mut self, min_height: impl Into<LengthSpec>) -> Self {
        self.min_height = min_height.into();
        self
    }

    pub fn with_max_height(mut self, max_height: impl Into<LengthSpec>) -> Self {
        self.max_height = max_height.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Shares the width left over by fixed columns.
    Star,
    Fixed(LengthSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStyle {
    pub width: ColumnWidth,
    pub min_width: LengthSpec,
    /// `Auto` (or zero) leaves the column unbounded above.
    pub max_width: LengthSpec,
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            width: ColumnWidth::Star,
            min_width: LengthSpec::Absolute(Pt::ZERO),
            max_width: LengthSpec::Auto,
        }
    }
}

impl ColumnStyle {
    pub fn star() -> Self {
        Self::default()
    }

    pub fn fixed(width: impl Into<LengthSpec>) -> Self {
        Self {
            width: ColumnWidth::Fixed(width.into()),
            ..Self::default()
        }
    }

    pub fn with_min_width(mut self, min_width: impl Into<LengthSpec>) -> Self {
        self.min_width = min_width.into();
        self
    }

    pub fn with_max_width(mut self, max_width: impl Into<LengthSpec>) -> Self {
        self.max_width = max_width.into();
        self
    }
}

/// Per-index style provider for rows or columns.
#[derive(Clone)]
pub enum StyleSource<T> {
    Uniform(T),
    PerIndex(Vec<T>),
    Computed(Arc<dyn Fn(usize) -> Option<T> + Send + Sync>),
}

impl<T: Clone> StyleSource<T> {
    pub fn computed(f: impl Fn(usize) -> Option<T> + Send + Sync + 'static) -> Self {
        StyleSource::Computed(Arc::new(f))
    }

    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            StyleSource::Uniform(value) => Some(value.clone()),
            StyleSource::PerIndex(values) => values.get(index).cloned(),
            StyleSource::Computed(f) => f(index),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StyleSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Uniform(value) => f.debug_tuple("Uniform").field(value).finish(),
            StyleSource::PerIndex(values) => f.debug_tuple("PerIndex").field(values).finish(),
            StyleSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
