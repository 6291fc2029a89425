use crate::canvas::Canvas;
use crate::sides::Sides;
use crate::types::{Color, Pt, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub edge: Edge,
    pub width: Pt,
    pub color: Option<Color>,
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
}

/// Stroke commands needed for one box outline.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderPlan {
    None,
    /// All four sides share one width: a single closed rectangle.
    Rect { width: Pt, color: Option<Color> },
    Segments(Vec<BorderSegment>),
}

impl BorderPlan {
    pub fn stroke_count(&self) -> usize {
        match self {
            BorderPlan::None => 0,
            BorderPlan::Rect { .. } => 1,
            BorderPlan::Segments(segments) => segments.len(),
        }
    }
}

/// Plans the outline of `rect`. Sides masked out count as zero width. Equal
/// widths collapse into one rectangle stroked with the top color; otherwise
/// each non-zero side is its own segment with its own color.
pub fn plan_border(
    rect: Rect,
    widths: &Sides<Pt>,
    colors: &Sides<Option<Color>>,
    mask: Option<&Sides<bool>>,
) -> BorderPlan {
    let effective = match mask {
        Some(mask) => Sides {
            top: if mask.top { widths.top } else { Pt::ZERO },
            right: if mask.right { widths.right } else { Pt::ZERO },
            bottom: if mask.bottom { widths.bottom } else { Pt::ZERO },
            left: if mask.left { widths.left } else { Pt::ZERO },
        },
        None => *widths,
    };

    let uniform = [effective.right, effective.bottom, effective.left]
        .iter()
        .all(|w| *w == effective.top);
    if uniform {
        if effective.top.is_positive() {
            return BorderPlan::Rect {
                width: effective.top,
                color: colors.top,
            };
        }
        return BorderPlan::None;
    }

    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.right(), rect.bottom());
    let sides = [
        (Edge::Top, effective.top, colors.top, (x0, y0), (x1, y0)),
        (Edge::Right, effective.right, colors.right, (x1, y0), (x1, y1)),
        (Edge::Bottom, effective.bottom, colors.bottom, (x1, y1), (x0, y1)),
        (Edge::Left, effective.left, colors.left, (x0, y1), (x0, y0)),
    ];
    let segments: Vec<BorderSegment> = sides
        .into_iter()
        .filter(|(_, width, ..)| width.is_positive())
        .map(|(edge, width, color, from, to)| BorderSegment {
            edge,
            width,
            color,
            from,
            to,
        })
        .collect();
    if segments.is_empty() {
        BorderPlan::None
    } else {
        BorderPlan::Segments(segments)
    }
}

/// Strokes a plan. Each stroke is isolated in its own saved state; a missing
/// color keeps the canvas stroke color.
pub fn draw_border(canvas: &mut Canvas, rect: Rect, plan: &BorderPlan) {
    match plan {
        BorderPlan::None => {}
        BorderPlan::Rect { width, color } => {
            canvas.save_state();
            canvas.set_line_width(*width);
            if let Some(color) = color {
                canvas.set_stroke_color(*color);
            }
            canvas.draw_rect(rect.x, rect.y, rect.width, rect.height);
            canvas.stroke();
            canvas.restore_state();
        }
        BorderPlan::Segments(segments) => {
            for segment in segments {
                canvas.save_state();
                canvas.set_line_width(segment.width);
                if let Some(color) = segment.color {
                    canvas.set_stroke_color(color);
                }
                canvas.move_to(segment.from.0, segment.from.1);
                canvas.line_to(segment.to.0, segment.to.1);
                canvas.stroke();
                canvas.restore_state();
            }
        }
    }
}
