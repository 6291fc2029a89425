use std::collections::BTreeMap;

use crate::bounds::rotated_content_bounds;
use crate::claims::GridCoord;
use crate::columns::ColumnLayout;
use crate::debug::{TableWarning, table_debug_enabled, table_debug_verbose_enabled};
use crate::host::{FontScope, LayoutHost, TextBounds, TextConstraints};
use crate::length::LengthSpec;
use crate::sides::{SideDefinition, Sides, normalize_sides};
use crate::style::{CellStyle, HAlign, VAlign};
use crate::types::{Color, Pt, Rect};

/// Height rules for one row, already resolved to points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    /// `None` sizes the row from the cells concluding on it.
    pub height: Option<Pt>,
    pub min_height: Pt,
    /// `None` or zero leaves the row unbounded above.
    pub max_height: Option<Pt>,
}

impl RowBounds {
    pub fn auto() -> Self {
        Self {
            height: None,
            min_height: Pt::ZERO,
            max_height: None,
        }
    }

    pub fn fixed(height: Pt) -> Self {
        Self {
            height: Some(height),
            ..Self::auto()
        }
    }
}

/// A placed cell waiting for the row its span concludes on.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCell {
    pub style: CellStyle,
    pub anchor: GridCoord,
    pub col_span: usize,
    pub row_span: usize,
}

impl PendingCell {
    pub fn concludes_at(&self) -> usize {
        self.anchor.row.saturating_add(self.row_span.max(1) - 1)
    }
}

/// A cell with every dimension resolved, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct SizedCell {
    pub style: CellStyle,
    pub anchor: GridCoord,
    pub col_span: usize,
    pub row_span: usize,
    pub rect: Rect,
    pub padding: Sides<Pt>,
    pub border: Sides<Pt>,
    pub border_color: Sides<Option<Color>>,
    /// The padding box; content is clipped to it.
    pub content: Rect,
    pub text: Option<String>,
    pub constraints: TextConstraints,
    pub content_bounds: TextBounds,
    pub align: (HAlign, VAlign),
    pub text_stroke: Pt,
}

impl SizedCell {
    /// Content height plus vertical padding.
    pub fn required_height(&self) -> Pt {
        self.content_bounds.height + self.padding.vertical()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub row: usize,
    pub y: Pt,
    pub height: Pt,
    /// The row was moved to the top of a fresh page; break before drawing it.
    pub new_page: bool,
    pub cells: Vec<SizedCell>,
    pub warning: Option<TableWarning>,
}

impl RowOutcome {
    pub fn bottom(&self) -> Pt {
        self.y + self.height
    }
}

/// Row buffer plus the finalized height, y and page of every processed row.
///
/// Cells live in an arena and are indexed by the row their span concludes on,
/// so each row only touches the cells it finishes.
#[derive(Debug, Clone)]
pub struct RowEngine {
    arena: Vec<Option<PendingCell>>,
    free: Vec<usize>,
    by_conclusion: BTreeMap<usize, Vec<usize>>,
    heights: Vec<Pt>,
    y_positions: Vec<Pt>,
    pages: Vec<usize>,
    top: Pt,
    page: usize,
}

impl RowEngine {
    pub fn new(top: Pt) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            by_conclusion: BTreeMap::new(),
            heights: Vec::new(),
            y_positions: Vec::new(),
            pages: Vec::new(),
            top,
            page: 0,
        }
    }

    /// Index of the next row to be processed.
    pub fn row_count(&self) -> usize {
        self.heights.len()
    }

    pub fn in_flight(&self) -> usize {
        self.arena.len() - self.free.len()
    }

    pub fn height(&self, row: usize) -> Option<Pt> {
        self.heights.get(row).copied()
    }

    pub fn y(&self, row: usize) -> Option<Pt> {
        self.y_positions.get(row).copied()
    }

    /// Page index (relative to the table start) a row was placed on.
    pub fn page_of(&self, row: usize) -> Option<usize> {
        self.pages.get(row).copied()
    }

    pub fn bottom(&self) -> Pt {
        match (self.y_positions.last(), self.heights.last()) {
            (Some(y), Some(height)) => *y + *height,
            _ => self.top,
        }
    }

    pub fn admit(&mut self, cell: PendingCell) {
        let conclusion = cell.concludes_at();
        let idx = match self.free.pop() {
            Some(idx) => {
                self.arena[idx] = Some(cell);
                idx
            }
            None => {
                self.arena.push(Some(cell));
                self.arena.len() - 1
            }
        };
        self.by_conclusion.entry(conclusion).or_default().push(idx);
    }

    fn release(&mut self, idx: usize) -> Option<PendingCell> {
        let cell = self.arena.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some(cell)
    }

    /// Sizes the next row: concludes its cells, finalizes and paginates its
    /// height, then measures the concluding cells again against the final row.
    pub fn process_row<H: LayoutHost + ?Sized>(
        &mut self,
        bounds: RowBounds,
        host: &mut H,
        columns: &ColumnLayout,
    ) -> RowOutcome {
        let row = self.heights.len();
        let mut y = self.bottom();

        let concluding: Vec<PendingCell> = self
            .by_conclusion
            .remove(&row)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|idx| self.release(idx))
            .collect();

        // First pass: what each concluding cell needs in total.
        let needs: Vec<(usize, Pt)> = match bounds.height {
            Some(_) => Vec::new(),
            None => concluding
                .iter()
                .map(|cell| {
                    let sized = self.measure(&mut *host, columns, cell, row, y, None, false);
                    (cell.anchor.row, sized.required_height())
                })
                .collect(),
        };
        // Rows of a span already placed on `page` carry part of its height.
        let auto_height = |engine: &RowEngine, page: usize| {
            needs
                .iter()
                .map(|(start, need)| *need - engine.visible_spanned(*start, row, page))
                .fold(Pt::ZERO, Pt::max)
        };
        let clamp = |height: Pt| {
            let height = height.max(bounds.min_height);
            match bounds.max_height.filter(|max| max.is_positive()) {
                Some(max) => height.min(max),
                None => height,
            }
        };
        let mut height = clamp(bounds.height.unwrap_or_else(|| auto_height(&*self, self.page)));

        let page = host.page();
        let mut new_page = false;
        let mut warning = None;
        if height > page.content_height() {
            let clamped = (page.max_y() - y).max(Pt::ZERO);
            warning = Some(TableWarning::RowTooTall {
                row,
                requested: height,
                clamped_to: clamped,
            });
            height = clamped;
        } else if y + height > page.max_y() {
            y = page.top();
            new_page = true;
            self.page += 1;
            // Spanned rows left behind no longer count toward the height.
            if bounds.height.is_none() {
                height = clamp(auto_height(&*self, self.page));
                if height > page.content_height() {
                    warning = Some(TableWarning::RowTooTall {
                        row,
                        requested: height,
                        clamped_to: page.content_height(),
                    });
                    height = page.content_height();
                }
            }
        }

        self.heights.push(height);
        self.y_positions.push(y);
        self.pages.push(self.page);

        if table_debug_enabled() {
            eprintln!(
                "[tabula.table] row {} y={} height={} concluding={} in_flight={} new_page={}",
                row,
                y,
                height,
                concluding.len(),
                self.in_flight(),
                new_page
            );
        }

        // Second pass against the finalized row.
        let cells = concluding
            .iter()
            .map(|cell| self.measure(&mut *host, columns, cell, row, y, Some(height), true))
            .collect();

        RowOutcome {
            row,
            y,
            height,
            new_page,
            cells,
            warning,
        }
    }

    /// Concludes every span still open after the last processed row, truncating
    /// it to end there. Row heights are left as they are.
    pub fn conclude_open_spans<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        columns: &ColumnLayout,
    ) -> (Vec<SizedCell>, Vec<TableWarning>) {
        let open: Vec<usize> = std::mem::take(&mut self.by_conclusion)
            .into_values()
            .flatten()
            .collect();
        let Some(last) = self.heights.len().checked_sub(1) else {
            self.arena.clear();
            self.free.clear();
            return (Vec::new(), Vec::new());
        };

        let mut cells = Vec::new();
        let mut warnings = Vec::new();
        for idx in open {
            let Some(mut cell) = self.release(idx) else {
                continue;
            };
            let concluded_at = last.max(cell.anchor.row);
            warnings.push(TableWarning::OpenSpanAtEnd {
                row: cell.anchor.row,
                col: cell.anchor.col,
                row_span: cell.row_span,
                concluded_at,
            });
            cell.row_span = concluded_at - cell.anchor.row + 1;
            let height = self.heights[concluded_at];
            let y = self.y_positions[concluded_at];
            cells.push(self.measure(&mut *host, columns, &cell, concluded_at, y, Some(height), true));
        }
        (cells, warnings)
    }

    /// Sum of the finalized heights of rows `start..row`.
    fn spanned_height(&self, start: usize, row: usize) -> Pt {
        (start..row)
            .map(|r| self.heights.get(r).copied().unwrap_or(Pt::ZERO))
            .sum()
    }

    /// Sum of the heights of rows `start..row` placed on `page`.
    fn visible_spanned(&self, start: usize, row: usize, page: usize) -> Pt {
        (start..row)
            .filter(|r| self.pages.get(*r) == Some(&page))
            .map(|r| self.heights.get(r).copied().unwrap_or(Pt::ZERO))
            .sum()
    }

    /// First row of `start..=row` placed on the same page as `row`. A span that
    /// crossed a page break is drawn from there.
    fn visible_start(&self, start: usize, row: usize) -> usize {
        match self.pages.get(row) {
            Some(page) => (start..row)
                .find(|r| self.pages.get(*r) == Some(page))
                .unwrap_or(row),
            None => start,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn measure<H: LayoutHost + ?Sized>(
        &self,
        host: &mut H,
        columns: &ColumnLayout,
        cell: &PendingCell,
        row: usize,
        row_y: Pt,
        row_height: Option<Pt>,
        full: bool,
    ) -> SizedCell {
        let mut scope = FontScope::new(host, cell.style.font.as_ref());
        let host = &mut *scope;
        let style = &cell.style;

        let padding = normalize_sides(
            style.padding.as_ref(),
            &SideDefinition::All(LengthSpec::Em(0.25)),
            |side| host.resolve_size(*side, Pt::ZERO),
        );
        let border = normalize_sides(
            style.border.as_ref(),
            &SideDefinition::All(LengthSpec::Absolute(Pt::from_i32(1))),
            |side| host.resolve_size(*side, Pt::ZERO),
        );
        let border_color = match &style.border_color {
            Some(colors) => colors.expand().map(|color| Some(*color)),
            None => Sides::uniform(None),
        };
        let text_stroke = style
            .text_stroke
            .map(|spec| host.resolve_size(spec, Pt::ZERO))
            .unwrap_or(Pt::ZERO);

        let start = self.visible_start(cell.anchor.row, row);
        let width = columns.span_width(cell.anchor.col, cell.col_span);
        let height = match row_height {
            Some(height) => height + self.spanned_height(start, row),
            None => host.page().content_height(),
        };
        let column_x = columns.x(cell.anchor.col);
        let row_start_y = if start < row {
            self.y_positions.get(start).copied().unwrap_or(row_y)
        } else {
            row_y
        };
        let x = style
            .x
            .map(|spec| host.resolve_size(spec, column_x))
            .unwrap_or(column_x);
        let y = style
            .y
            .map(|spec| host.resolve_size(spec, row_start_y))
            .unwrap_or(row_start_y);

        let allocated_width = (width - padding.horizontal()).max(Pt::ZERO);
        let allocated_height = (height - padding.vertical()).max(Pt::ZERO);

        let rotation = style.rotation.unwrap_or(0.0);
        let fit = rotated_content_bounds(
            rotation,
            allocated_width.to_f32(),
            allocated_height.to_f32(),
        );
        let align = style.align.unwrap_or_default().resolved();
        let constraints = TextConstraints {
            width: Some(Pt::from_f32(fit.width)),
            height: Some(Pt::from_f32(fit.height)),
            align: (align.0 == HAlign::Justify).then_some(HAlign::Justify),
            rotation,
            ellipsis: style.ellipsis.unwrap_or(true),
            fill: true,
            stroke: text_stroke.is_positive(),
        };

        let text = style.value.as_ref().and_then(|value| value.content());
        let content_bounds = match text.as_deref() {
            Some(text) if !text.is_empty() => {
                if !full && rotation == 0.0 {
                    TextBounds {
                        height: host.measure_text_height(text, &constraints),
                        ..TextBounds::default()
                    }
                } else {
                    host.measure_text(text, &constraints)
                }
            }
            _ => TextBounds::default(),
        };

        let sized = SizedCell {
            style: style.clone(),
            anchor: cell.anchor,
            col_span: cell.col_span,
            row_span: cell.row_span,
            rect: Rect::new(x, y, width, height),
            padding,
            border,
            border_color,
            content: Rect::new(
                x + padding.left,
                y + padding.top,
                allocated_width,
                allocated_height,
            ),
            text,
            constraints,
            content_bounds,
            align,
            text_stroke,
        };
        if full && table_debug_verbose_enabled() {
            eprintln!(
                "[tabula.table] cell ({}, {}) span {}x{} rect=({}, {}, {}, {}) content=({}, {}) text=({}, {})",
                cell.anchor.col,
                cell.anchor.row,
                cell.col_span,
                cell.row_span,
                x,
                y,
                width,
                height,
                allocated_width,
                allocated_height,
                content_bounds.width,
                content_bounds.height
            );
        }
        sized
    }
}
