use std::sync::atomic::{AtomicU32, Ordering};

use crate::border::{draw_border, plan_border};
use crate::claims::SpanClaims;
use crate::columns::{ColumnLayout, ColumnSizing, solve_column_widths};
use crate::debug::{DebugLogger, TableWarning, report_warning};
use crate::error::TabulaError;
use crate::host::LayoutHost;
use crate::length::LengthSpec;
use crate::render::render_cell;
use crate::rows::{PendingCell, RowBounds, RowEngine, RowOutcome, SizedCell};
use crate::sides::{SideDefinition, Sides, normalize_sides};
use crate::style::{
    CellStyle, ColumnStyle, ColumnWidth, RowHeight, RowStyle, StyleSource, normalize_span,
};
use crate::types::{Color, Pt, Rect};

static NEXT_TABLE_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    pub cols: Option<i64>,
    pub rows: Option<i64>,
    pub cell_width: Option<LengthSpec>,
    pub cell_height: Option<LengthSpec>,
    pub x: Option<LengthSpec>,
    pub y: Option<LengthSpec>,
    pub width: Option<LengthSpec>,
    pub height: Option<LengthSpec>,
    /// Outer frame of the table. No frame unless set.
    pub border: Option<SideDefinition<LengthSpec>>,
    pub border_color: Option<SideDefinition<Color>>,
    pub default_cell: Option<CellStyle>,
    pub column_styles: Option<StyleSource<ColumnStyle>>,
    pub row_styles: Option<StyleSource<RowStyle>>,
    pub debug: bool,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cols(mut self, cols: i64) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn with_rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_cell_width(mut self, width: impl Into<LengthSpec>) -> Self {
        self.cell_width = Some(width.into());
        self
    }

    pub fn with_cell_height(mut self, height: impl Into<LengthSpec>) -> Self {
        self.cell_height = Some(height.into());
        self
    }

    pub fn with_position(mut self, x: impl Into<LengthSpec>, y: impl Into<LengthSpec>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_width(mut self, width: impl Into<LengthSpec>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_height(mut self, height: impl Into<LengthSpec>) -> Self {
        self.height = Some(height.into());
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

    pub fn with_default_cell(mut self, cell: CellStyle) -> Self {
        self.default_cell = Some(cell);
        self
    }

    pub fn with_column_styles(mut self, styles: StyleSource<ColumnStyle>) -> Self {
        self.column_styles = Some(styles);
        self
    }

    pub fn with_row_styles(mut self, styles: StyleSource<RowStyle>) -> Self {
        self.row_styles = Some(styles);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Table configuration resolved against the document at construction.
#[derive(Debug, Clone)]
struct TableSpec {
    x: Pt,
    y: Pt,
    width: Pt,
    height: Pt,
    cell_width: Option<Pt>,
    cell_height: Option<Pt>,
    border: Sides<Pt>,
    border_color: Sides<Option<Color>>,
    default_cell: CellStyle,
    column_styles: Option<StyleSource<ColumnStyle>>,
    row_styles: Option<StyleSource<RowStyle>>,
}

/// A table being laid out into a document, one `row` call at a time.
pub struct Table<'h, H: LayoutHost + ?Sized> {
    host: &'h mut H,
    id: u32,
    spec: TableSpec,
    cols: Option<usize>,
    columns: Option<ColumnLayout>,
    claims: SpanClaims,
    rows: RowEngine,
    page_first_row: usize,
    warnings: Vec<TableWarning>,
    logger: Option<DebugLogger>,
}

impl<'h, H: LayoutHost + ?Sized> Table<'h, H> {
    pub fn new(host: &'h mut H, opts: TableOptions) -> Result<Self, TabulaError> {
        let cols = match opts.cols {
            Some(cols) if cols <= 0 => return Err(TabulaError::InvalidColumnCount(cols)),
            Some(cols) => Some(usize::try_from(cols).map_err(|_| {
                TabulaError::InvalidConfiguration(format!("cols out of range ({cols})"))
            })?),
            None => None,
        };
        let rows = match opts.rows {
            Some(rows) if rows <= 0 => {
                return Err(TabulaError::InvalidConfiguration(format!(
                    "rows must be greater than 0 (got {rows})"
                )));
            }
            other => other,
        };

        let page = host.page();
        let (cursor_x, cursor_y) = host.cursor();
        let x = resolve_or(&*host, opts.x, cursor_x);
        let y = resolve_or(&*host, opts.y, cursor_y);
        let mut width = resolve_or(&*host, opts.width, page.right() - x);
        let height = resolve_or(&*host, opts.height, page.max_y() - y);

        let cell_width = opts.cell_width.map(|spec| {
            let share = match cols {
                Some(cols) => width / (cols as i32),
                None => width,
            };
            host.resolve_size(spec, share)
        });
        if let (None, Some(cols), Some(cell_width)) = (opts.width, cols, cell_width) {
            width = cell_width * (cols as i32);
        }
        let cell_height = match (opts.cell_height, rows, opts.height) {
            (Some(spec), rows, _) => {
                let share = rows.map(|rows| height / (rows as i32)).unwrap_or(Pt::ZERO);
                Some(host.resolve_size(spec, share))
            }
            (None, Some(rows), Some(_)) => Some(height / (rows as i32)),
            _ => None,
        };

        let border = normalize_sides(
            opts.border.as_ref(),
            &SideDefinition::All(LengthSpec::Absolute(Pt::ZERO)),
            |side| host.resolve_size(*side, Pt::ZERO),
        );
        let border_color = match &opts.border_color {
            Some(colors) => colors.expand().map(|color| Some(*color)),
            None => Sides::uniform(None),
        };
        let frame_malformed = [
            opts.border.as_ref().and_then(|sides| sides.malformed_len()),
            opts.border_color.as_ref().and_then(|sides| sides.malformed_len()),
        ];

        let mut default_cell = opts.default_cell.unwrap_or_default();
        if opts.debug && default_cell.debug.is_none() {
            default_cell.debug = Some(true);
        }

        let spec = TableSpec {
            x,
            y,
            width,
            height,
            cell_width,
            cell_height,
            border,
            border_color,
            default_cell,
            column_styles: opts.column_styles,
            row_styles: opts.row_styles,
        };

        let mut table = Self {
            host,
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            spec,
            cols: None,
            columns: None,
            claims: SpanClaims::new(),
            rows: RowEngine::new(y),
            page_first_row: 0,
            warnings: Vec::new(),
            logger: None,
        };
        for len in frame_malformed.into_iter().flatten() {
            table.warn(TableWarning::MalformedSides { len });
        }
        if let Some(cols) = cols {
            table.set_column_count(cols);
        }
        Ok(table)
    }

    pub fn with_debug_logger(mut self, logger: DebugLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn cols(&self) -> Option<usize> {
        self.cols
    }

    pub fn column_widths(&self) -> &[Pt] {
        self.columns
            .as_ref()
            .map(|layout| layout.widths.as_slice())
            .unwrap_or(&[])
    }

    pub fn row_height(&self, row: usize) -> Option<Pt> {
        self.rows.height(row)
    }

    pub fn row_y(&self, row: usize) -> Option<Pt> {
        self.rows.y(row)
    }

    pub fn claimed_count(&self) -> usize {
        self.claims.claimed_count()
    }

    pub fn warnings(&self) -> &[TableWarning] {
        &self.warnings
    }

    /// Lays out and draws one row of cells. Returns the bottom y reached.
    ///
    /// Cells that do not fit in the remaining columns wrap onto further grid
    /// rows, all of which are sized and drawn by this call.
    pub fn row<I, C>(&mut self, cells: I, row_default: Option<&CellStyle>) -> Pt
    where
        I: IntoIterator<Item = C>,
        C: Into<CellStyle>,
    {
        let empty = CellStyle::default();
        let row_default = row_default.unwrap_or(&empty);
        let styles: Vec<CellStyle> = cells
            .into_iter()
            .map(|cell| {
                let cell: CellStyle = cell.into();
                CellStyle::cascade([&self.spec.default_cell, row_default, &cell])
            })
            .collect();

        if self.cols.is_none() {
            let total = styles
                .iter()
                .map(|style| normalize_span(style.col_span))
                .fold(0usize, usize::saturating_add);
            if total > 0 {
                self.set_column_count(total);
            }
        }

        let placed = self.place(styles);
        let last_row = self.claims.cursor().row;
        self.claims.end_row();

        let mut placed = placed.into_iter().peekable();
        let mut bottom = self.rows.bottom();
        for grid_row in self.rows.row_count()..=last_row {
            while let Some(cell) = placed.next_if(|cell| cell.anchor.row == grid_row) {
                self.rows.admit(cell);
            }
            let bounds = self.row_bounds(grid_row);
            let previous_bottom = self.rows.bottom();
            let empty_layout = ColumnLayout::default();
            let columns = self.columns.as_ref().unwrap_or(&empty_layout);
            let outcome = self.rows.process_row(bounds, &mut *self.host, columns);
            self.draw_row(&outcome, previous_bottom);
            bottom = outcome.bottom();
        }

        self.host.set_cursor(self.spec.x, bottom);
        bottom
    }

    /// Concludes any open spans, draws the closing edge of the frame and hands
    /// the document back.
    pub fn end(mut self) -> &'h mut H {
        let empty_layout = ColumnLayout::default();
        let columns = self.columns.as_ref().unwrap_or(&empty_layout);
        let (cells, warnings) = self.rows.conclude_open_spans(&mut *self.host, columns);
        for warning in warnings {
            self.warn(warning);
        }
        self.render_cells(&cells);

        let bottom = self.rows.bottom();
        let closing = Sides {
            top: false,
            right: false,
            bottom: true,
            left: false,
        };
        self.draw_frame(bottom, Pt::ZERO, &closing);

        if let Some(logger) = &self.logger {
            logger.increment("tables", 1);
            logger.emit_summary(&format!("table {}", self.id));
            logger.flush();
        }
        self.host.set_cursor(self.spec.x, bottom);
        self.host
    }

    fn set_column_count(&mut self, cols: usize) {
        self.cols = Some(cols);
        let sizings: Vec<ColumnSizing> = (0..cols).map(|idx| self.column_sizing(idx)).collect();
        let layout = solve_column_widths(&sizings, self.spec.width, self.spec.x);
        if let Some(warning) = layout.warning.clone() {
            self.warn(warning);
        }
        self.columns = Some(layout);
    }

    fn column_sizing(&self, idx: usize) -> ColumnSizing {
        let style = self
            .spec
            .column_styles
            .as_ref()
            .and_then(|styles| styles.get(idx))
            .unwrap_or_else(|| match self.spec.cell_width {
                Some(width) => ColumnStyle::fixed(width),
                None => ColumnStyle::star(),
            });
        match style.width {
            ColumnWidth::Fixed(spec) if !spec.is_auto() => {
                ColumnSizing::Fixed(self.resolve_column_length(spec, Pt::ZERO))
            }
            _ => ColumnSizing::Star {
                min: self.resolve_column_length(style.min_width, Pt::ZERO),
                max: (!style.max_width.is_auto())
                    .then(|| self.resolve_column_length(style.max_width, Pt::ZERO)),
            },
        }
    }

    // Column percentages are shares of the table width.
    fn resolve_column_length(&self, spec: LengthSpec, default: Pt) -> Pt {
        match spec {
            LengthSpec::Percent(share) => self.spec.width * share,
            other => self.host.resolve_size(other, default),
        }
    }

    fn row_bounds(&self, row: usize) -> RowBounds {
        let style = self
            .spec
            .row_styles
            .as_ref()
            .and_then(|styles| styles.get(row))
            .unwrap_or_else(|| match self.spec.cell_height {
                Some(height) => RowStyle::fixed(height),
                None => RowStyle::default(),
            });
        let height = match style.height {
            RowHeight::Fixed(spec) if !spec.is_auto() => {
                Some(self.host.resolve_size(spec, Pt::ZERO))
            }
            _ => None,
        };
        RowBounds {
            height,
            min_height: self.host.resolve_size(style.min_height, Pt::ZERO),
            max_height: (!style.max_height.is_auto())
                .then(|| self.host.resolve_size(style.max_height, Pt::ZERO)),
        }
    }

    fn place(&mut self, styles: Vec<CellStyle>) -> Vec<PendingCell> {
        self.claims.begin_row();
        let mut placed = Vec::with_capacity(styles.len());
        for style in styles {
            let anchor = self.claims.next_free(self.cols);
            let requested = normalize_span(style.col_span);
            let row_span = normalize_span(style.row_span);
            let mut col_span = requested;
            if let Some(cols) = self.cols {
                col_span = col_span.min(cols.saturating_sub(anchor.col).max(1));
            }
            // Stop short of coordinates an earlier span already holds.
            col_span = self.claims.free_run(anchor, col_span, row_span);
            if col_span < requested {
                self.warn(TableWarning::ColSpanClamped {
                    row: anchor.row,
                    col: anchor.col,
                    requested,
                    applied: col_span,
                });
            }
            let malformed = [
                style.padding.as_ref().and_then(|sides| sides.malformed_len()),
                style.border.as_ref().and_then(|sides| sides.malformed_len()),
                style.border_color.as_ref().and_then(|sides| sides.malformed_len()),
            ];
            for len in malformed.into_iter().flatten() {
                self.warn(TableWarning::MalformedSides { len });
            }
            self.claims.claim(anchor, col_span, row_span);
            placed.push(PendingCell {
                style,
                anchor,
                col_span,
                row_span,
            });
        }
        placed
    }

    fn draw_row(&mut self, outcome: &RowOutcome, previous_bottom: Pt) {
        if let Some(warning) = outcome.warning.clone() {
            self.warn(warning);
        }
        if outcome.new_page {
            if outcome.row > 0 {
                let closing = Sides {
                    top: false,
                    right: false,
                    bottom: true,
                    left: false,
                };
                self.draw_frame(previous_bottom, Pt::ZERO, &closing);
            }
            self.host.new_page();
            self.page_first_row = outcome.row;
        }

        self.host.canvas().begin_tag("TR", Some(self.id), None, true);
        self.render_cells(&outcome.cells);
        self.host.canvas().end_tag();

        let band = Sides {
            top: outcome.row == self.page_first_row,
            right: true,
            bottom: false,
            left: true,
        };
        self.draw_frame(outcome.y, outcome.height, &band);

        if let Some(logger) = &self.logger {
            logger.log_json(&format!(
                "{{\"type\":\"table.row\",\"table_id\":{},\"row\":{},\"y\":{:.3},\"height\":{:.3},\"cells\":{},\"new_page\":{}}}",
                self.id,
                outcome.row,
                outcome.y.to_f32(),
                outcome.height.to_f32(),
                outcome.cells.len(),
                outcome.new_page
            ));
            logger.increment("rows", 1);
            logger.increment("cells", outcome.cells.len() as u64);
            if outcome.new_page {
                logger.increment("page_breaks", 1);
            }
        }
    }

    fn render_cells(&mut self, cells: &[SizedCell]) {
        for cell in cells {
            render_cell(&mut *self.host, cell, self.id);
        }
    }

    fn frame_width(&self) -> Pt {
        match &self.columns {
            Some(layout) if !layout.is_empty() => layout.total_width(),
            _ => self.spec.width,
        }
    }

    fn draw_frame(&mut self, y: Pt, height: Pt, mask: &Sides<bool>) {
        let rect = Rect::new(self.spec.x, y, self.frame_width(), height);
        let plan = plan_border(rect, &self.spec.border, &self.spec.border_color, Some(mask));
        draw_border(self.host.canvas(), rect, &plan);
    }

    fn warn(&mut self, warning: TableWarning) {
        report_warning(&warning);
        if let Some(logger) = &self.logger {
            logger.log_json(&warning.to_json(self.id));
            logger.increment(warning.kind(), 1);
        }
        self.warnings.push(warning);
    }
}

fn resolve_or<H: LayoutHost + ?Sized>(host: &H, spec: Option<LengthSpec>, default: Pt) -> Pt {
    spec.map(|spec| host.resolve_size(spec, default))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::host::PagedCanvas;
    use crate::style::MAX_SPAN;
    use crate::types::{Margins, Size};

    fn pt(v: i32) -> Pt {
        Pt::from_i32(v)
    }

    // 400x300 page, 50pt margins: the content area is 300 x 200 starting at
    // (50, 50). A 10pt font gives 12pt lines and 2.5pt default padding.
    fn host() -> PagedCanvas {
        PagedCanvas::new(Size::new(400.0, 300.0), Margins::all(50.0)).with_font("Helvetica", pt(10))
    }

    fn td_columns(commands: &[Command]) -> Vec<u16> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::BeginTag {
                    role,
                    col_index: Some(col),
                    ..
                } if role == "TD" => Some(*col),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn non_positive_column_count_is_rejected() {
        let mut host = host();
        assert!(matches!(
            Table::new(&mut host, TableOptions::new().with_cols(0)),
            Err(TabulaError::InvalidColumnCount(0))
        ));
        assert!(matches!(
            Table::new(&mut host, TableOptions::new().with_cols(-2)),
            Err(TabulaError::InvalidColumnCount(-2))
        ));
        assert!(matches!(
            Table::new(&mut host, TableOptions::new().with_rows(0)),
            Err(TabulaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn fixed_column_leaves_equal_star_shares() {
        let mut host = host();
        let opts = TableOptions::new()
            .with_cols(3)
            .with_width(300i32)
            .with_column_styles(StyleSource::PerIndex(vec![ColumnStyle::fixed(100i32)]));
        let table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.column_widths(), &[pt(100), pt(100), pt(100)]);
        assert!(table.warnings().is_empty());
    }

    #[test]
    fn percent_columns_resolve_against_table_width() {
        let mut host = host();
        let opts = TableOptions::new()
            .with_cols(2)
            .with_width(200i32)
            .with_column_styles(StyleSource::Uniform(ColumnStyle::fixed("25%")));
        let table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.column_widths(), &[pt(50), pt(50)]);
    }

    #[test]
    fn column_count_is_inferred_from_the_first_row() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new()).expect("table");
        assert_eq!(table.cols(), None);
        table.row([CellStyle::new("A").with_col_span(2.0), CellStyle::new("B")], None);
        assert_eq!(table.cols(), Some(3));
        assert_eq!(table.column_widths(), &[pt(100), pt(100), pt(100)]);
    }

    #[test]
    fn spanning_cell_reserves_its_rectangle() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(4)).expect("table");
        table.row(
            [
                CellStyle::new("A").with_col_span(2.0).with_row_span(2.0),
                CellStyle::new("B"),
                CellStyle::new("C"),
            ],
            None,
        );
        assert_eq!(table.claimed_count(), 3);
        table.row(["D"], None);
        let host = table.end();
        // Row 0 concludes B and C; row 1 concludes A and then D at column 2.
        assert_eq!(td_columns(host.commands()), vec![2, 3, 0, 2]);
    }

    #[test]
    fn auto_rows_stack_downwards() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new()).expect("table");
        assert_eq!(table.row(["a", "b"], None), pt(67));
        assert_eq!(table.row(["c", "d\ne"], None), pt(96));
        assert_eq!(table.row_y(1), Some(pt(67)));
        assert_eq!(table.row_height(1), Some(pt(29)));
        let host = table.end();
        assert_eq!(host.cursor(), (pt(50), pt(96)));
    }

    #[test]
    fn row_default_sits_between_table_and_cell() {
        let mut host = host();
        let opts = TableOptions::new().with_default_cell(CellStyle::default().with_padding(10i32));
        let mut table = Table::new(&mut host, opts).expect("table");
        let tight = CellStyle::default().with_padding(0i32);
        assert_eq!(table.row(["a"], Some(&tight)), pt(62));
        assert_eq!(table.row(["a"], None), pt(94));
    }

    #[test]
    fn overflowing_cells_wrap_into_a_new_grid_row() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(2)).expect("table");
        let bottom = table.row(["a", "b", "c"], None);
        assert_eq!(bottom, pt(84));
        assert_eq!(table.row_y(1), Some(pt(67)));
        let next = table.row(["d"], None);
        assert_eq!(table.row_y(2), Some(pt(84)));
        assert_eq!(next, pt(101));
    }

    #[test]
    fn wide_col_span_is_clamped() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(2)).expect("table");
        table.row([CellStyle::new("a"), CellStyle::new("b").with_col_span(3.0)], None);
        assert_eq!(
            table.warnings(),
            &[TableWarning::ColSpanClamped {
                row: 0,
                col: 1,
                requested: 3,
                applied: 1,
            }]
        );
    }

    #[test]
    fn tall_row_moves_to_a_new_page() {
        let mut host = host();
        let opts = TableOptions::new()
            .with_position(50i32, 200i32)
            .with_row_styles(StyleSource::Uniform(RowStyle::fixed(100i32)));
        let mut table = Table::new(&mut host, opts).expect("table");
        let bottom = table.row(["a"], None);
        assert_eq!(bottom, pt(150));
        assert_eq!(table.row_y(0), Some(pt(50)));
        let host = table.end();
        assert_eq!(host.page_count(), 2);
    }

    #[test]
    fn row_taller_than_a_page_is_clamped_with_a_warning() {
        let mut host = host();
        let opts = TableOptions::new().with_row_styles(StyleSource::Uniform(RowStyle::fixed(400i32)));
        let mut table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.row(["a"], None), pt(250));
        assert!(matches!(
            table.warnings(),
            [TableWarning::RowTooTall { row: 0, .. }]
        ));
    }

    #[test]
    fn over_constrained_columns_warn_and_overflow() {
        let mut host = host();
        let opts = TableOptions::new()
            .with_cols(2)
            .with_width(100i32)
            .with_column_styles(StyleSource::Uniform(ColumnStyle::star().with_min_width(80i32)));
        let table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.column_widths(), &[pt(80), pt(80)]);
        assert_eq!(table.warnings().len(), 1);
        assert_eq!(table.warnings()[0].kind(), "over_constrained_columns");
    }

    #[test]
    fn cell_width_and_rows_give_fixed_tracks() {
        let mut host = host();
        let opts = TableOptions::new()
            .with_cols(2)
            .with_cell_width(40i32)
            .with_rows(4)
            .with_height(100i32);
        let mut table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.column_widths(), &[pt(40), pt(40)]);
        assert_eq!(table.row(["a", "b"], None), pt(75));
    }

    #[test]
    fn frame_is_drawn_per_row_and_closed_at_the_end() {
        let mut host = host();
        let opts = TableOptions::new().with_border(1i32);
        let mut table = Table::new(&mut host, opts).expect("table");
        table.row(["a", "b"], None);
        let host = table.end();
        let commands = host.commands();
        // Closing edge runs right to left along the bottom at y = 67.
        assert!(commands.contains(&Command::LineTo { x: pt(50), y: pt(67) }));
        // Left edge of the first band.
        assert!(commands.contains(&Command::LineTo { x: pt(50), y: pt(50) }));
        assert_eq!(host.canvas().state_depth(), 0);
    }

    #[test]
    fn open_span_is_truncated_at_end() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(2)).expect("table");
        table.row([CellStyle::new("A").with_row_span(3.0), CellStyle::new("B")], None);
        table.row(["C"], None);
        let warnings_before = table.warnings().len();
        assert_eq!(warnings_before, 0);
        let host = table.end();
        assert_eq!(td_columns(host.commands()), vec![1, 1, 0]);
    }

    #[test]
    fn debug_logger_records_rows_and_summary() {
        let path = std::env::temp_dir().join(format!(
            "tabula_table_{}_{}.log",
            std::process::id(),
            line!()
        ));
        let logger = DebugLogger::new(&path).expect("log file");
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(1))
            .expect("table")
            .with_debug_logger(logger);
        table.row(["a"], None);
        table.row(["b"], None);
        table.end();
        let contents = std::fs::read_to_string(&path).expect("read log");
        let _ = std::fs::remove_file(&path);
        assert_eq!(contents.matches("\"type\":\"table.row\"").count(), 2);
        assert!(contents.contains("\"type\":\"table.summary\""));
        assert!(contents.contains("\"rows\":2"));
    }

    #[test]
    fn col_span_stops_at_a_span_from_the_row_above() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(2)).expect("table");
        table.row([CellStyle::new("X"), CellStyle::new("Y").with_row_span(2.0)], None);
        table.row([CellStyle::new("Z").with_col_span(2.0)], None);
        assert_eq!(
            table.warnings(),
            &[TableWarning::ColSpanClamped {
                row: 1,
                col: 0,
                requested: 2,
                applied: 1,
            }]
        );
        let host = table.end();
        let commands = host.commands();
        assert_eq!(td_columns(commands), vec![0, 1, 0]);
        assert!(!commands.contains(&Command::Meta {
            key: "Width".to_string(),
            value: "300.000".to_string(),
        }));
    }

    #[test]
    fn huge_col_span_is_capped_when_inferring_columns() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new()).expect("table");
        let bottom = table.row([CellStyle::new("A").with_col_span(1e30f32), CellStyle::new("B")], None);
        assert_eq!(table.cols(), Some(MAX_SPAN + 1));
        assert_eq!(bottom, pt(67));
        assert!(table.warnings().is_empty());
    }

    #[test]
    fn huge_row_span_concludes_at_the_last_row() {
        let mut host = host();
        let mut table = Table::new(&mut host, TableOptions::new().with_cols(2)).expect("table");
        table.row([CellStyle::new("A").with_row_span(1e30f32), CellStyle::new("B")], None);
        table.row(["C"], None);
        assert_eq!(table.row_y(1), Some(pt(67)));
        let host = table.end();
        assert_eq!(td_columns(host.commands()), vec![1, 1, 0]);
    }

    #[test]
    fn malformed_side_arrays_are_reported_on_the_table() {
        let three = [1i32, 2, 3].map(LengthSpec::from);
        let malformed = SideDefinition::from_values(&three).expect("non-empty");
        let mut host = host();
        let opts = TableOptions::new().with_border(malformed.clone());
        let mut table = Table::new(&mut host, opts).expect("table");
        assert_eq!(table.warnings(), &[TableWarning::MalformedSides { len: 3 }]);

        table.row([CellStyle::new("a").with_padding(malformed)], None);
        assert_eq!(
            table.warnings(),
            &[
                TableWarning::MalformedSides { len: 3 },
                TableWarning::MalformedSides { len: 3 },
            ]
        );
    }
}
