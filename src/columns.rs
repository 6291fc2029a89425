use crate::debug::TableWarning;
use crate::types::Pt;

/// A column declaration after its size expressions were resolved to points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnSizing {
    Fixed(Pt),
    Star { min: Pt, max: Option<Pt> },
}

impl ColumnSizing {
    pub fn star() -> Self {
        ColumnSizing::Star {
            min: Pt::ZERO,
            max: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    pub widths: Vec<Pt>,
    pub x_positions: Vec<Pt>,
    pub warning: Option<TableWarning>,
}

impl ColumnLayout {
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn total_width(&self) -> Pt {
        self.widths.iter().sum()
    }

    /// Width covered by `span` columns starting at `start`; columns past the end count as zero.
    pub fn span_width(&self, start: usize, span: usize) -> Pt {
        let end = start.saturating_add(span).min(self.widths.len());
        self.widths.get(start..end).map_or(Pt::ZERO, |widths| widths.iter().copied().sum())
    }

    pub fn x(&self, col: usize) -> Pt {
        self.x_positions.get(col).copied().unwrap_or_else(|| {
            let last = self.x_positions.len().saturating_sub(1);
            let base = self.x_positions.get(last).copied().unwrap_or(Pt::ZERO);
            base + self.span_width(last, col.saturating_sub(last))
        })
    }
}

/// Computes absolute column widths for a table `table_width` wide starting at `left`.
///
/// Fixed columns take their width first. Star columns share what is left: each
/// in order receives `unclaimed / remaining_stars` clamped to its bounds, and
/// the assigned width is taken out of `unclaimed` so later stars absorb what a
/// clamped column did not use. When the star minimums alone reach the unclaimed
/// width there is no fitting solution; every star gets its minimum and the
/// table overflows.
pub fn solve_column_widths(columns: &[ColumnSizing], table_width: Pt, left: Pt) -> ColumnLayout {
    let mut widths = vec![Pt::ZERO; columns.len()];
    let mut unclaimed = table_width;
    let mut star_min_total = Pt::ZERO;
    let mut star_indexes: Vec<usize> = Vec::new();

    for (idx, column) in columns.iter().enumerate() {
        match *column {
            ColumnSizing::Fixed(width) => {
                widths[idx] = width;
                unclaimed -= width;
            }
            ColumnSizing::Star { min, .. } => {
                star_indexes.push(idx);
                star_min_total += min;
            }
        }
    }

    let mut warning = None;
    if !star_indexes.is_empty() && star_min_total >= unclaimed {
        for &idx in &star_indexes {
            if let ColumnSizing::Star { min, .. } = columns[idx] {
                widths[idx] = min;
            }
        }
        warning = Some(TableWarning::OverConstrainedColumns {
            min_total: star_min_total,
            available: unclaimed,
        });
    } else {
        let mut remaining = star_indexes.len() as i32;
        for &idx in &star_indexes {
            let ColumnSizing::Star { min, max } = columns[idx] else {
                continue;
            };
            let mut width = (unclaimed / remaining).max(min);
            if let Some(max) = max.filter(|max| max.is_positive()) {
                width = width.min(max);
            }
            widths[idx] = width;
            unclaimed -= width;
            remaining -= 1;
        }
    }

    let mut x_positions = Vec::with_capacity(widths.len());
    let mut cursor = left;
    for width in &widths {
        x_positions.push(cursor);
        cursor += *width;
    }

    ColumnLayout {
        widths,
        x_positions,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(v: i32) -> Pt {
        Pt::from_i32(v)
    }

    fn star(min: i32, max: Option<i32>) -> ColumnSizing {
        ColumnSizing::Star {
            min: pt(min),
            max: max.map(pt),
        }
    }

    fn assert_close(a: Pt, b: Pt) {
        assert!(
            (a.to_milli_i64() - b.to_milli_i64()).abs() <= 2,
            "{a} != {b}"
        );
    }

    #[test]
    fn fixed_and_star_share_nominal_width() {
        let layout = solve_column_widths(
            &[ColumnSizing::Fixed(pt(100)), ColumnSizing::star(), ColumnSizing::star()],
            pt(300),
            Pt::ZERO,
        );
        assert_eq!(layout.widths, vec![pt(100), pt(100), pt(100)]);
        assert_eq!(layout.x_positions, vec![pt(0), pt(100), pt(200)]);
        assert!(layout.warning.is_none());
    }

    #[test]
    fn stars_sum_to_table_width() {
        let cases: &[(i32, Vec<ColumnSizing>)] = &[
            (100, vec![ColumnSizing::star(); 3]),
            (
                500,
                vec![
                    star(10, None),
                    ColumnSizing::Fixed(pt(37)),
                    star(50, None),
                    star(0, None),
                ],
            ),
            (7, vec![star(1, None); 6]),
        ];
        for (width, columns) in cases {
            let layout = solve_column_widths(columns, pt(*width), pt(20));
            assert_close(layout.total_width(), pt(*width));
            for (col, sizing) in layout.widths.iter().zip(columns.iter()) {
                if let ColumnSizing::Star { min, .. } = sizing {
                    assert!(*col >= *min);
                }
            }
        }
    }

    #[test]
    fn min_width_floor_redistributes() {
        let layout = solve_column_widths(&[star(150, None), star(0, None)], pt(200), Pt::ZERO);
        assert_eq!(layout.widths, vec![pt(150), pt(50)]);
    }

    #[test]
    fn max_width_caps_and_passes_remainder_on() {
        let layout = solve_column_widths(
            &[star(0, Some(40)), star(0, None), star(0, None)],
            pt(300),
            Pt::ZERO,
        );
        assert_eq!(layout.widths, vec![pt(40), pt(130), pt(130)]);
    }

    #[test]
    fn zero_max_width_is_unbounded() {
        let layout = solve_column_widths(&[star(0, Some(0)), star(0, None)], pt(100), Pt::ZERO);
        assert_eq!(layout.widths, vec![pt(50), pt(50)]);
    }

    #[test]
    fn over_constrained_stars_take_their_minimum() {
        let layout = solve_column_widths(
            &[ColumnSizing::Fixed(pt(100)), star(80, None), star(80, None)],
            pt(200),
            Pt::ZERO,
        );
        assert_eq!(layout.widths, vec![pt(100), pt(80), pt(80)]);
        assert_eq!(layout.total_width(), pt(260));
        assert_eq!(
            layout.warning,
            Some(TableWarning::OverConstrainedColumns {
                min_total: pt(160),
                available: pt(100),
            })
        );
    }

    #[test]
    fn fixed_only_leaves_width_unused() {
        let layout = solve_column_widths(
            &[ColumnSizing::Fixed(pt(50)), ColumnSizing::Fixed(pt(60))],
            pt(300),
            pt(10),
        );
        assert_eq!(layout.total_width(), pt(110));
        assert_eq!(layout.x(1), pt(60));
        assert!(layout.warning.is_none());
    }

    #[test]
    fn span_width_ignores_missing_columns() {
        let layout = solve_column_widths(&[ColumnSizing::Fixed(pt(10)); 2], pt(20), Pt::ZERO);
        assert_eq!(layout.span_width(0, 2), pt(20));
        assert_eq!(layout.span_width(1, 5), pt(10));
        assert_eq!(layout.x(3), pt(20));
    }
}
