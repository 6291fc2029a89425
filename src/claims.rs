#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub col: usize,
    pub row: usize,
}

impl GridCoord {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// A cell's footprint on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    anchor: GridCoord,
    col_span: usize,
    row_span: usize,
}

impl Footprint {
    fn covers(&self, coord: GridCoord) -> bool {
        coord.col >= self.anchor.col
            && coord.col - self.anchor.col < self.col_span
            && coord.row >= self.anchor.row
            && coord.row - self.anchor.row < self.row_span
    }

    fn col_end(&self) -> usize {
        self.anchor.col.saturating_add(self.col_span)
    }

    fn row_end(&self) -> usize {
        self.anchor.row.saturating_add(self.row_span)
    }
}

/// Grid coordinates reserved by spanning cells, plus the placement cursor.
///
/// Claims only grow for the lifetime of a table. An anchor coordinate is never
/// claimed: it is occupied by virtue of being where the cell was placed.
/// Footprints are stored whole rather than one coordinate at a time.
#[derive(Debug, Clone, Default)]
pub struct SpanClaims {
    spans: Vec<Footprint>,
    cursor: GridCoord,
}

impl SpanClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, coord: GridCoord) -> bool {
        self.spans
            .iter()
            .any(|span| span.anchor != coord && span.covers(coord))
    }

    pub fn claimed_count(&self) -> usize {
        self.spans.iter().fold(0usize, |total, span| {
            total.saturating_add(span.col_span.saturating_mul(span.row_span) - 1)
        })
    }

    pub fn cursor(&self) -> GridCoord {
        self.cursor
    }

    /// Rewinds the cursor to the first column of the current grid row.
    pub fn begin_row(&mut self) {
        self.cursor.col = 0;
    }

    /// Advances to the grid row after the last one touched by the current row.
    pub fn end_row(&mut self) {
        self.cursor.col = 0;
        self.cursor.row = self.cursor.row.saturating_add(1);
    }

    /// Finds the next unclaimed coordinate at or after the cursor.
    ///
    /// Scans left to right and wraps to the next grid row once `cols` is
    /// exceeded. Without a known column count the scan never wraps.
    pub fn next_free(&mut self, cols: Option<usize>) -> GridCoord {
        loop {
            if let Some(cols) = cols {
                if self.cursor.col >= cols {
                    self.cursor.col = 0;
                    self.cursor.row = self.cursor.row.saturating_add(1);
                }
            }
            let cursor = self.cursor;
            match self
                .spans
                .iter()
                .find(|span| span.anchor != cursor && span.covers(cursor))
            {
                Some(span) => self.cursor.col = span.col_end(),
                None => return cursor,
            }
        }
    }

    /// Number of leading columns, up to `col_span`, that a cell anchored at
    /// `anchor` and `row_span` rows tall can take without touching a claim.
    /// Never less than one: the anchor itself is free.
    pub fn free_run(&self, anchor: GridCoord, col_span: usize, row_span: usize) -> usize {
        let rows_end = anchor.row.saturating_add(row_span.max(1));
        let blocked = self
            .spans
            .iter()
            .filter(|span| {
                span.anchor.row < rows_end && span.row_end() > anchor.row && span.col_end() > anchor.col
            })
            .map(|span| span.anchor.col.max(anchor.col) - anchor.col)
            .min()
            .unwrap_or(usize::MAX);
        col_span.min(blocked).max(1)
    }

    /// Claims every coordinate of the `col_span x row_span` rectangle anchored at
    /// `anchor` except the anchor itself, then moves the cursor past the anchor.
    pub fn claim(&mut self, anchor: GridCoord, col_span: usize, row_span: usize) {
        let span = Footprint {
            anchor,
            col_span: col_span.max(1),
            row_span: row_span.max(1),
        };
        if span.col_span > 1 || span.row_span > 1 {
            self.spans.push(span);
        }
        self.cursor = GridCoord::new(anchor.col.saturating_add(1), anchor.row);
    }
}
