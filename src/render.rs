use crate::border::{draw_border, plan_border};
use crate::host::{FontScope, LayoutHost};
use crate::rows::SizedCell;
use crate::style::CellKind;
use crate::types::{Color, Pt};

const DEBUG_CELL: Color = Color {
    r: 0.0,
    g: 0.502,
    b: 0.0,
};
const DEBUG_CONTENT_X: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
};
const DEBUG_CONTENT_Y: Color = DEBUG_CELL;
const DEBUG_ALLOCATED: Color = Color {
    r: 1.0,
    g: 0.647,
    b: 0.0,
};

fn sides_meta(top: Pt, bottom: Pt, left: Pt, right: Pt) -> String {
    format!("[{top}, {bottom}, {left}, {right}]")
}

fn begin_debug_stroke<H: LayoutHost + ?Sized>(host: &mut H) {
    let canvas = host.canvas();
    canvas.save_state();
    canvas.set_dash(vec![Pt::from_i32(1), Pt::from_i32(1)], Pt::ZERO);
    canvas.set_line_width(Pt::from_i32(1));
    canvas.set_opacity(1.0, 0.3);
}

/// Paints one sized cell inside its `TD`/`TH` structure element.
pub fn render_cell<H: LayoutHost + ?Sized>(host: &mut H, cell: &SizedCell, table_id: u32) {
    let kind = cell.style.kind.unwrap_or(CellKind::Data);
    let debug = cell.style.debug.unwrap_or(false);
    let rect = cell.rect;

    let canvas = host.canvas();
    canvas.begin_tag(
        kind.role(),
        Some(table_id),
        u16::try_from(cell.anchor.col).ok(),
        false,
    );
    canvas.meta("Width", rect.width.to_string());
    canvas.meta("Height", rect.height.to_string());
    canvas.meta(
        "Padding",
        sides_meta(
            cell.padding.top,
            cell.padding.bottom,
            cell.padding.left,
            cell.padding.right,
        ),
    );
    canvas.meta("RowSpan", cell.row_span.to_string());
    canvas.meta("ColSpan", cell.col_span.to_string());
    canvas.meta(
        "BorderThickness",
        sides_meta(
            cell.border.top,
            cell.border.bottom,
            cell.border.left,
            cell.border.right,
        ),
    );

    if let Some(background) = cell.style.background_color {
        canvas.save_state();
        canvas.set_fill_color(background);
        canvas.draw_rect(rect.x, rect.y, rect.width, rect.height);
        canvas.fill();
        canvas.restore_state();
    }

    let plan = plan_border(rect, &cell.border, &cell.border_color, None);
    draw_border(canvas, rect, &plan);

    if debug {
        begin_debug_stroke(host);
        let canvas = host.canvas();
        canvas.set_stroke_color(DEBUG_CELL);
        canvas.draw_rect(rect.x, rect.y, rect.width, rect.height);
        canvas.stroke();
        canvas.restore_state();
    }

    if let Some(text) = cell.text.as_deref().filter(|text| !text.is_empty()) {
        render_content(host, cell, text, debug);
    }

    host.canvas().end_tag();
}

fn render_content<H: LayoutHost + ?Sized>(host: &mut H, cell: &SizedCell, text: &str, debug: bool) {
    let mut scope = FontScope::new(host, cell.style.font.as_ref());
    let host = &mut *scope;

    let area = cell.content;
    let bounds = cell.content_bounds;
    let (h_align, v_align) = cell.align;
    let px = (area.width - bounds.width) * h_align.offset_scale();
    let py = (area.height - bounds.height) * v_align.offset_scale();
    let dx = px - bounds.x;
    let dy = py - bounds.y;

    if debug {
        begin_debug_stroke(host);
        let canvas = host.canvas();
        canvas.set_stroke_color(DEBUG_CONTENT_X);
        canvas.move_to(area.x + px, area.y);
        canvas.line_to(area.x + px, area.bottom());
        canvas.move_to(area.x + px + bounds.width, area.y);
        canvas.line_to(area.x + px + bounds.width, area.bottom());
        canvas.stroke();
        canvas.set_stroke_color(DEBUG_CONTENT_Y);
        canvas.move_to(area.x, area.y + py);
        canvas.line_to(area.right(), area.y + py);
        canvas.move_to(area.x, area.y + py + bounds.height);
        canvas.line_to(area.right(), area.y + py + bounds.height);
        canvas.stroke();
        canvas.set_stroke_color(DEBUG_ALLOCATED);
        canvas.draw_rect(area.x, area.y, area.width, area.height);
        canvas.stroke();
        canvas.restore_state();
    }

    // Clip at the padding box, not the cell edge.
    let canvas = host.canvas();
    canvas.save_state();
    canvas.clip_rect(area.x, area.y, area.width, area.height);
    canvas.set_fill_color(cell.style.text_color.unwrap_or(Color::BLACK));
    if let Some(stroke_color) = cell.style.text_stroke_color {
        canvas.set_stroke_color(stroke_color);
    }
    if cell.text_stroke.is_positive() {
        canvas.set_line_width(cell.text_stroke);
    }
    canvas.draw_text(area.x + dx, area.y + dy, text, cell.constraints);
    canvas.restore_state();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::claims::GridCoord;
    use crate::columns::{ColumnSizing, solve_column_widths};
    use crate::host::PagedCanvas;
    use crate::rows::{PendingCell, RowBounds, RowEngine};
    use crate::style::{Alignment, CellStyle, FontSelection};
    use crate::types::{Margins, Size};

    fn pt(v: i32) -> Pt {
        Pt::from_i32(v)
    }

    fn sized(host: &mut PagedCanvas, style: CellStyle, height: Pt) -> SizedCell {
        let columns = solve_column_widths(&[ColumnSizing::star()], pt(300), pt(50));
        let mut engine = RowEngine::new(pt(50));
        engine.admit(PendingCell {
            style,
            anchor: GridCoord::new(0, 0),
            col_span: 1,
            row_span: 1,
        });
        let mut outcome = engine.process_row(RowBounds::fixed(height), host, &columns);
        outcome.cells.remove(0)
    }

    fn host() -> PagedCanvas {
        PagedCanvas::new(Size::new(400.0, 300.0), Margins::all(50.0)).with_font("Helvetica", pt(10))
    }

    #[test]
    fn centered_text_is_offset_by_half_the_free_space() {
        let mut host = host();
        let cell = sized(&mut host, CellStyle::new("a").with_align(Alignment::center()), pt(40));
        render_cell(&mut host, &cell, 1);
        let text = host
            .commands()
            .iter()
            .find_map(|command| match command {
                Command::DrawText { x, y, text, .. } => Some((*x, *y, text.clone())),
                _ => None,
            })
            .expect("text drawn");
        // Content box starts at 52.5 and is 295 x 35, the run is 6 x 12.
        assert_eq!(text, (Pt::from_f32(197.0), Pt::from_f32(64.0), "a".to_string()));
    }

    #[test]
    fn cell_is_tagged_with_geometry() {
        let mut host = host();
        let cell = sized(&mut host, CellStyle::new("a"), pt(40));
        render_cell(&mut host, &cell, 9);
        let commands = host.commands();
        assert!(matches!(
            &commands[0],
            Command::BeginTag { role, table_id: Some(9), col_index: Some(0), .. } if role == "TD"
        ));
        assert!(commands.contains(&Command::Meta {
            key: "Height".to_string(),
            value: "40.000".to_string(),
        }));
        assert!(commands.contains(&Command::Meta {
            key: "Padding".to_string(),
            value: "[2.500, 2.500, 2.500, 2.500]".to_string(),
        }));
        assert_eq!(commands.last(), Some(&Command::EndTag));
    }

    #[test]
    fn content_is_clipped_and_state_restored() {
        let mut host = host();
        let style = CellStyle::new("a").with_background(Color::rgb(0.9, 0.9, 0.9));
        let cell = sized(&mut host, style, pt(40));
        render_cell(&mut host, &cell, 1);
        let commands = host.commands();
        assert!(commands.contains(&Command::ClipRect {
            x: Pt::from_f32(52.5),
            y: Pt::from_f32(52.5),
            width: pt(295),
            height: pt(35),
        }));
        assert!(commands.contains(&Command::Fill));
        assert_eq!(host.canvas().state_depth(), 0);
    }

    #[test]
    fn debug_overlays_are_dashed_and_translucent() {
        let mut host = host();
        let cell = sized(&mut host, CellStyle::new("a").with_debug(true), pt(40));
        render_cell(&mut host, &cell, 1);
        let commands = host.commands();
        assert!(commands.contains(&Command::SetDash {
            pattern: vec![pt(1), pt(1)],
            phase: Pt::ZERO,
        }));
        assert!(commands.contains(&Command::SetOpacity {
            fill: 1.0,
            stroke: 0.3,
        }));
        assert!(commands.contains(&Command::SetStrokeColor(DEBUG_ALLOCATED)));
        assert!(commands.contains(&Command::SetStrokeColor(DEBUG_CELL)));
    }

    #[test]
    fn header_cells_and_fonts() {
        let mut host = host();
        let style = CellStyle::new("h")
            .with_kind(CellKind::Header)
            .with_font(FontSelection::named("Courier"));
        let cell = sized(&mut host, style, pt(40));
        render_cell(&mut host, &cell, 1);
        let commands = host.commands();
        let tag = commands
            .iter()
            .position(|c| matches!(c, Command::BeginTag { role, .. } if role == "TH"))
            .expect("header tag");
        assert!(commands[tag..].contains(&Command::SetFontName("Courier".to_string())));
        assert_eq!(host.font().name, "Helvetica");
    }

    #[test]
    fn empty_cells_draw_no_text() {
        let mut host = host();
        let cell = sized(&mut host, CellStyle::from(None::<&str>), pt(20));
        render_cell(&mut host, &cell, 1);
        assert!(
            !host
                .commands()
                .iter()
                .any(|c| matches!(c, Command::DrawText { .. } | Command::ClipRect { .. }))
        );
    }
}
