//! Table grid layout
//!
//! Places declared cells on a fixed row/column grid. Cells that span rows
//! claim coordinates in later rows, so placement tracks an occupied-cell
//! set and skips claimed coordinates before placing the next cell.

use std::collections::HashSet;

/// Split `total` into `cols` integer widths
///
/// The remainder of the division is handed out one unit per column from the
/// left, so the widths always sum to `total`.
pub fn column_widths(total: u32, cols: usize) -> Vec<u32> {
    if cols == 0 {
        return Vec::new();
    }
    let base = total / cols as u32;
    let remainder = (total % cols as u32) as usize;
    (0..cols)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Final position and size of one declared cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// Sum of the widths of the spanned columns
    pub width: u32,
}

/// Occupied-cell bookkeeping for one table
#[derive(Debug, Clone)]
pub struct TableLayout {
    widths: Vec<u32>,
    fallback_width: u32,
    occupied: HashSet<(usize, usize)>,
}

impl TableLayout {
    /// Layout for `cols` columns sharing `total_width`
    pub fn new(total_width: u32, cols: usize) -> Self {
        Self {
            widths: column_widths(total_width, cols),
            fallback_width: if cols == 0 {
                0
            } else {
                total_width / cols as u32
            },
            occupied: HashSet::new(),
        }
    }

    /// Column widths
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Place the cells of one row, given their `(row_span, col_span)`
    ///
    /// Spans below 1 count as 1. Columns past the declared grid (from
    /// over-wide rows) get an even share of the total width.
    pub fn place_row(&mut self, row: usize, spans: &[(usize, usize)]) -> Vec<CellPlacement> {
        let mut placements = Vec::with_capacity(spans.len());
        let mut col = 0usize;
        for &(row_span, col_span) in spans {
            let row_span = row_span.max(1);
            let col_span = col_span.max(1);
            while self.occupied.contains(&(row, col)) {
                col += 1;
            }

            for r in 0..row_span {
                for c in 0..col_span {
                    self.occupied.insert((row + r, col + c));
                }
            }
            let width = (col..col + col_span)
                .map(|i| self.widths.get(i).copied().unwrap_or(self.fallback_width))
                .sum();

            placements.push(CellPlacement {
                row,
                col,
                row_span,
                col_span,
                width,
            });
            col += col_span;
        }
        placements
    }

    /// Whether a coordinate has been claimed
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.occupied.contains(&(row, col))
    }

    /// Number of claimed coordinates
    pub fn occupied_len(&self) -> usize {
        self.occupied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_remainder_from_left() {
        assert_eq!(column_widths(10, 3), vec![4, 3, 3]);
        assert_eq!(column_widths(42520, 3).iter().sum::<u32>(), 42520);
        assert_eq!(column_widths(42520, 7).iter().sum::<u32>(), 42520);
        assert!(column_widths(100, 0).is_empty());
    }

    #[test]
    fn test_colspan_row_then_normal_row() {
        let mut layout = TableLayout::new(42520, 2);
        let first = layout.place_row(0, &[(1, 2)]);
        assert_eq!(first[0].col, 0);
        assert_eq!(first[0].width, 42520);

        let second = layout.place_row(1, &[(1, 1), (1, 1)]);
        assert_eq!(second[0].col, 0);
        assert_eq!(second[1].col, 1);
    }

    #[test]
    fn test_rowspan_shadows_next_row() {
        let mut layout = TableLayout::new(300, 3);
        layout.place_row(0, &[(2, 1), (1, 1), (1, 1)]);
        let second = layout.place_row(1, &[(1, 1), (1, 1)]);
        assert_eq!(second[0].col, 1);
        assert_eq!(second[1].col, 2);
        assert_eq!(layout.occupied_len(), 6);
        for row in 0..2 {
            for col in 0..3 {
                assert!(layout.is_occupied(row, col));
            }
        }
    }

    #[test]
    fn test_over_wide_row_uses_fallback_width() {
        let mut layout = TableLayout::new(1000, 2);
        let cells = layout.place_row(0, &[(1, 1), (1, 1), (1, 1)]);
        assert_eq!(cells[2].col, 2);
        assert_eq!(cells[2].width, 500);
    }

    #[test]
    fn test_zero_spans_count_as_one() {
        let mut layout = TableLayout::new(100, 2);
        let cells = layout.place_row(0, &[(0, 0), (1, 1)]);
        assert_eq!(cells[0].col_span, 1);
        assert_eq!(cells[1].col, 1);
    }
}
