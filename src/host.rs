use std::ops::{Deref, DerefMut};

use crate::canvas::{Canvas, Command, Document};
use crate::length::LengthSpec;
use crate::style::{FontSelection, HAlign};
use crate::types::{Margins, Pt, Size};

/// Layout constraints handed to the text oracle for one text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextConstraints {
    /// Wrapping width. `None` lays every paragraph out on one line.
    pub width: Option<Pt>,
    /// Lines beyond this height are dropped.
    pub height: Option<Pt>,
    /// Only `Justify` is meaningful to the oracle; other alignments are
    /// applied by the table when positioning the measured block.
    pub align: Option<HAlign>,
    pub rotation: f32,
    pub ellipsis: bool,
    pub fill: bool,
    pub stroke: bool,
}

impl Default for TextConstraints {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            align: None,
            rotation: 0.0,
            ellipsis: true,
            fill: true,
            stroke: false,
        }
    }
}

/// Rendered extent of a text run placed at the origin. `x`/`y` are non-zero
/// when rotation moves part of the run above or left of the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub size: Size,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn content_width(&self) -> Pt {
        self.size.width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> Pt {
        self.size.height - self.margins.top - self.margins.bottom
    }

    pub fn top(&self) -> Pt {
        self.margins.top
    }

    pub fn left(&self) -> Pt {
        self.margins.left
    }

    pub fn right(&self) -> Pt {
        self.size.width - self.margins.right
    }

    /// Lowest y a row may reach before it has to move to the next page.
    pub fn max_y(&self) -> Pt {
        self.size.height - self.margins.bottom
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontState {
    pub name: String,
    pub family: Option<String>,
    pub size: Pt,
}

/// The document a table is laid out into.
///
/// The table never measures glyphs or paints anything itself: sizes are
/// resolved and text is measured through this trait, and drawing goes to the
/// host's [`Canvas`].
pub trait LayoutHost {
    /// Converts a size expression to points; `Auto` yields `default`.
    fn resolve_size(&self, spec: LengthSpec, default: Pt) -> Pt;

    fn measure_text(&mut self, text: &str, constraints: &TextConstraints) -> TextBounds;

    fn measure_text_height(&mut self, text: &str, constraints: &TextConstraints) -> Pt {
        self.measure_text(text, constraints).height
    }

    fn page(&self) -> PageGeometry;

    fn cursor(&self) -> (Pt, Pt);

    fn set_cursor(&mut self, x: Pt, y: Pt);

    fn new_page(&mut self);

    fn canvas(&mut self) -> &mut Canvas;

    fn font(&self) -> FontState;

    fn set_font(&mut self, font: FontState);
}

/// Applies a cell font for the lifetime of the scope and restores the previous
/// font when dropped.
pub struct FontScope<'a, H: LayoutHost + ?Sized> {
    host: &'a mut H,
    saved: Option<FontState>,
}

impl<'a, H: LayoutHost + ?Sized> FontScope<'a, H> {
    pub fn new(host: &'a mut H, font: Option<&FontSelection>) -> Self {
        let saved = match font {
            Some(selection) if !selection.is_empty() => {
                let previous = host.font();
                let size = selection
                    .size
                    .map(|spec| host.resolve_size(spec, previous.size))
                    .unwrap_or(previous.size);
                let next = FontState {
                    name: selection
                        .src
                        .clone()
                        .unwrap_or_else(|| previous.name.clone()),
                    family: selection.family.clone().or_else(|| previous.family.clone()),
                    size,
                };
                host.set_font(next);
                Some(previous)
            }
            _ => None,
        };
        Self { host, saved }
    }
}

impl<H: LayoutHost + ?Sized> Deref for FontScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: LayoutHost + ?Sized> DerefMut for FontScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: LayoutHost + ?Sized> Drop for FontScope<'_, H> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.host.set_font(saved);
        }
    }
}

/// Paged document backed by the command recorder, using fallback metrics:
/// every glyph advances 0.6em and lines are 1.2em apart.
pub struct PagedCanvas {
    canvas: Canvas,
    geometry: PageGeometry,
    cursor: (Pt, Pt),
    font: FontState,
    root_font_size: Pt,
}

impl PagedCanvas {
    pub fn new(page_size: Size, margins: Margins) -> Self {
        Self {
            canvas: Canvas::new(page_size),
            geometry: PageGeometry {
                size: page_size,
                margins,
            },
            cursor: (margins.left, margins.top),
            font: FontState {
                name: "Helvetica".to_string(),
                family: None,
                size: Pt::from_i32(12),
            },
            root_font_size: Pt::from_i32(12),
        }
    }

    pub fn with_font(mut self, name: impl Into<String>, size: Pt) -> Self {
        self.font = FontState {
            name: name.into(),
            family: None,
            size,
        };
        self.root_font_size = size;
        self
    }

    pub fn page_count(&self) -> usize {
        self.canvas.completed_pages() + 1
    }

    /// Commands recorded on the page currently being drawn.
    pub fn commands(&self) -> &[Command] {
        self.canvas.current_commands()
    }

    pub fn finish(self) -> Document {
        self.canvas.finish()
    }

    fn char_width(&self) -> Pt {
        (self.font.size * 0.6).max(Pt::from_f32(1.0))
    }

    fn line_height(&self) -> Pt {
        self.font.size.mul_ratio(6, 5)
    }

    fn advance(&self, chars: usize) -> Pt {
        self.char_width() * (chars as i32)
    }

    fn wrap_lines(&self, text: &str, max_width: Option<Pt>) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let Some(max_width) = max_width.filter(|width| width.is_positive()) else {
                lines.push(paragraph.to_string());
                continue;
            };
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                if line.is_empty() {
                    line.push_str(word);
                    continue;
                }
                let candidate = line.chars().count() + 1 + word.chars().count();
                if self.advance(candidate) <= max_width {
                    line.push(' ');
                    line.push_str(word);
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                }
            }
            lines.push(line);
        }
        lines
    }

    fn truncate_with_ellipsis(&self, line: &str, max_width: Option<Pt>) -> String {
        let ellipsis = '\u{2026}';
        let mut chars: Vec<char> = line.chars().collect();
        if let Some(max_width) = max_width.filter(|width| width.is_positive()) {
            while !chars.is_empty() && self.advance(chars.len() + 1) > max_width {
                chars.pop();
            }
        }
        let mut out: String = chars.into_iter().collect();
        out.push(ellipsis);
        out
    }
}

impl LayoutHost for PagedCanvas {
    fn resolve_size(&self, spec: LengthSpec, default: Pt) -> Pt {
        spec.resolve(
            self.geometry.content_width(),
            self.font.size,
            self.root_font_size,
        )
        .unwrap_or(default)
    }

    fn measure_text(&mut self, text: &str, constraints: &TextConstraints) -> TextBounds {
        if text.is_empty() {
            return TextBounds::default();
        }
        let line_height = self.line_height();
        let mut lines = self.wrap_lines(text, constraints.width);
        if let Some(height) = constraints.height {
            let max_lines =
                (height.to_milli_i64() / line_height.to_milli_i64().max(1)).max(1) as usize;
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                if constraints.ellipsis {
                    if let Some(last) = lines.last_mut() {
                        *last = self.truncate_with_ellipsis(last, constraints.width);
                    }
                }
            }
        }

        let width = lines
            .iter()
            .map(|line| self.advance(line.chars().count()))
            .fold(Pt::ZERO, Pt::max);
        let height = line_height * (lines.len() as i32);

        let degrees = if constraints.rotation.is_finite() {
            constraints.rotation.rem_euclid(360.0)
        } else {
            0.0
        };
        if degrees == 0.0 {
            return TextBounds {
                x: Pt::ZERO,
                y: Pt::ZERO,
                width,
                height,
            };
        }

        let rad = degrees.to_radians();
        let (sin, cos) = (libm::sinf(rad), libm::cosf(rad));
        let (w, h) = (width.to_f32(), height.to_f32());
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (x, y) in corners {
            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;
            min_x = min_x.min(rx);
            min_y = min_y.min(ry);
            max_x = max_x.max(rx);
            max_y = max_y.max(ry);
        }
        TextBounds {
            x: Pt::from_f32(min_x),
            y: Pt::from_f32(min_y),
            width: Pt::from_f32(max_x - min_x),
            height: Pt::from_f32(max_y - min_y),
        }
    }

    fn page(&self) -> PageGeometry {
        self.geometry
    }

    fn cursor(&self) -> (Pt, Pt) {
        self.cursor
    }

    fn set_cursor(&mut self, x: Pt, y: Pt) {
        self.cursor = (x, y);
    }

    fn new_page(&mut self) {
        self.canvas.show_page();
        self.cursor = (self.geometry.left(), self.geometry.top());
    }

    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn font(&self) -> FontState {
        self.font.clone()
    }

    fn set_font(&mut self, font: FontState) {
        self.canvas.set_font_name(&font.name);
        self.canvas.set_font_size(font.size);
        self.font = font;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> PagedCanvas {
        PagedCanvas::new(Size::new(400.0, 300.0), Margins::all(50.0)).with_font("Helvetica", Pt::from_i32(10))
    }

    #[test]
    fn fallback_metrics() {
        let mut host = host();
        let bounds = host.measure_text("abcd", &TextConstraints::default());
        assert_eq!(bounds.width, Pt::from_i32(24));
        assert_eq!(bounds.height, Pt::from_i32(12));
    }

    #[test]
    fn wraps_greedily_within_width() {
        let mut host = host();
        let constraints = TextConstraints {
            width: Some(Pt::from_i32(30)),
            ..TextConstraints::default()
        };
        // 6pt per glyph: "aa bb" is 30pt wide, "cc" goes to the next line.
        let bounds = host.measure_text("aa bb cc", &constraints);
        assert_eq!(bounds.width, Pt::from_i32(30));
        assert_eq!(bounds.height, Pt::from_i32(24));
        assert_eq!(host.measure_text_height("one\ntwo", &TextConstraints::default()), Pt::from_i32(24));
    }

    #[test]
    fn height_limits_line_count() {
        let mut host = host();
        let constraints = TextConstraints {
            width: Some(Pt::from_i32(12)),
            height: Some(Pt::from_i32(25)),
            ..TextConstraints::default()
        };
        let bounds = host.measure_text("a b c d e", &constraints);
        assert_eq!(bounds.height, Pt::from_i32(24));
    }

    #[test]
    fn rotated_run_reports_offset_bounds() {
        let mut host = host();
        let constraints = TextConstraints {
            rotation: 90.0,
            ..TextConstraints::default()
        };
        let bounds = host.measure_text("abcd", &constraints);
        assert_eq!(bounds.width, Pt::from_i32(12));
        assert_eq!(bounds.height, Pt::from_i32(24));
        assert_eq!(bounds.x, Pt::from_i32(-12));
        assert_eq!(bounds.y, Pt::ZERO);
    }

    #[test]
    fn relative_sizes_follow_the_current_font() {
        let mut host = host();
        assert_eq!(host.resolve_size(LengthSpec::Em(0.25), Pt::ZERO), Pt::from_f32(2.5));
        assert_eq!(host.resolve_size(LengthSpec::Percent(0.5), Pt::ZERO), Pt::from_i32(150));
        assert_eq!(host.resolve_size(LengthSpec::Auto, Pt::from_i32(7)), Pt::from_i32(7));

        let selection = FontSelection::sized(20i32);
        {
            let scope = FontScope::new(&mut host, Some(&selection));
            assert_eq!(scope.font().size, Pt::from_i32(20));
            assert_eq!(scope.resolve_size(LengthSpec::Em(1.0), Pt::ZERO), Pt::from_i32(20));
        }
        assert_eq!(host.font().size, Pt::from_i32(10));
    }

    #[test]
    fn new_page_resets_cursor_to_top_margin() {
        let mut host = host();
        host.set_cursor(Pt::from_i32(80), Pt::from_i32(200));
        host.new_page();
        assert_eq!(host.cursor(), (Pt::from_i32(50), Pt::from_i32(50)));
        assert_eq!(host.page_count(), 2);
        assert_eq!(host.page().max_y(), Pt::from_i32(250));
        assert_eq!(host.page().content_height(), Pt::from_i32(200));
    }
}
