mod border;
mod bounds;
mod canvas;
mod claims;
mod columns;
mod css;
mod debug;
mod error;
mod host;
mod length;
mod render;
mod rows;
mod sides;
mod style;
mod table;
mod types;

pub use border::{BorderPlan, BorderSegment, Edge, draw_border, plan_border};
pub use bounds::{ContentBounds, rotated_content_bounds, rotated_footprint};
pub use canvas::{Canvas, Command, Document, Page};
pub use claims::{GridCoord, SpanClaims};
pub use columns::{ColumnLayout, ColumnSizing, solve_column_widths};
pub use debug::{DebugLogger, TableWarning};
pub use error::TabulaError;
pub use host::{
    FontScope, FontState, LayoutHost, PageGeometry, PagedCanvas, TextBounds, TextConstraints,
};
pub use length::LengthSpec;
pub use render::render_cell;
pub use rows::{PendingCell, RowBounds, RowEngine, RowOutcome, SizedCell};
pub use sides::{SideDefinition, Sides, normalize_sides};
pub use style::{
    Alignment, CellKind, CellStyle, CellValue, ColumnStyle, ColumnWidth, FontSelection, HAlign,
    MAX_SPAN, RowHeight, RowStyle, StyleSource, VAlign, normalize_span,
};
pub use table::{Table, TableOptions};
pub use types::{Color, Margins, Pt, Rect, Size};

/// Opens a table at the host's cursor.
pub fn table<H: LayoutHost + ?Sized>(
    host: &mut H,
    opts: TableOptions,
) -> Result<Table<'_, H>, TabulaError> {
    Table::new(host, opts)
}
