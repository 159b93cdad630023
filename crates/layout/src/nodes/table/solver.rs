//! Column width resolution for tables.
//!
//! Columns come in three flavours: fixed (`Pt`), percentage of the table
//! width, and auto. Fixed and percentage columns claim their share up
//! front; the remainder is split among auto columns in proportion to the
//! widest content sampled in each. The solver itself is pure arithmetic;
//! the table node feeds it measured cell widths via [`ColumnSolver::record`].

use quire_dom::TableColumn;
use quire_style::dimension::Dimension;

pub struct ColumnSolver {
    widths: Vec<f32>,
    auto: Vec<usize>,
    preferred: Vec<f32>,
    /// `None` when the table has no bounded width to fill.
    budget: Option<f32>,
    /// Width left over after fixed and percentage columns.
    remaining: f32,
}

impl ColumnSolver {
    pub fn new(columns: &[TableColumn], table_width: Option<f32>) -> Self {
        let n = columns.len();
        let mut widths = vec![0.0; n];
        let mut auto = Vec::new();
        let budget_value = table_width.unwrap_or(0.0);
        let mut remaining = budget_value;

        for (i, col) in columns.iter().enumerate() {
            match &col.width {
                Some(Dimension::Pt(w)) => {
                    widths[i] = *w;
                    remaining -= *w;
                }
                // A percentage only resolves against a bounded width;
                // otherwise the column degrades to auto.
                Some(Dimension::Percent(p)) if table_width.is_some() => {
                    widths[i] = (p / 100.0) * budget_value;
                    remaining -= widths[i];
                }
                _ => auto.push(i),
            }
        }

        Self {
            preferred: vec![0.0; n],
            widths,
            auto,
            budget: table_width,
            remaining: remaining.max(0.0),
        }
    }

    pub fn has_auto(&self) -> bool {
        !self.auto.is_empty()
    }

    pub fn is_auto(&self, col: usize) -> bool {
        self.auto.contains(&col)
    }

    /// Records the preferred content width of a cell covering
    /// `col_start .. col_start + col_span`. A spanning cell first pays the
    /// fixed columns it covers, then splits the rest evenly across the auto
    /// columns under it.
    pub fn record(&mut self, col_start: usize, col_span: usize, content_width: f32) {
        let end = (col_start + col_span).min(self.widths.len());
        let covered_auto: Vec<usize> = (col_start..end).filter(|c| self.is_auto(*c)).collect();
        if covered_auto.is_empty() {
            return;
        }
        let fixed: f32 = (col_start..end)
            .filter(|c| !self.is_auto(*c))
            .map(|c| self.widths[c])
            .sum();
        let share = ((content_width - fixed) / covered_auto.len() as f32).max(0.0);
        for c in covered_auto {
            self.preferred[c] = self.preferred[c].max(share);
        }
    }

    /// Final column widths. Auto columns get their preferred width when it
    /// fits, grow proportionally when there is surplus, and shrink
    /// proportionally when there is not.
    pub fn finish(mut self) -> Vec<f32> {
        if self.auto.is_empty() {
            return self.widths;
        }

        if self.budget.is_none() {
            for &i in &self.auto {
                self.widths[i] = self.preferred[i];
            }
            return self.widths;
        }

        let wanted: f32 = self.auto.iter().map(|&i| self.preferred[i]).sum();
        if wanted <= 0.0 {
            let even = self.remaining / self.auto.len() as f32;
            for &i in &self.auto {
                self.widths[i] = even;
            }
        } else if self.remaining >= wanted {
            let surplus = self.remaining - wanted;
            for &i in &self.auto {
                self.widths[i] = self.preferred[i] + surplus * (self.preferred[i] / wanted);
            }
        } else {
            let scale = self.remaining / wanted;
            for &i in &self.auto {
                self.widths[i] = self.preferred[i] * scale;
            }
        }
        self.widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(width: Option<Dimension>) -> TableColumn {
        TableColumn { width }
    }

    #[test]
    fn fixed_columns_pass_through() {
        let columns = [col(Some(Dimension::Pt(40.0))), col(Some(Dimension::Pt(60.0)))];
        let solver = ColumnSolver::new(&columns, Some(200.0));
        assert!(!solver.has_auto());
        assert_eq!(solver.finish(), vec![40.0, 60.0]);
    }

    #[test]
    fn auto_columns_share_surplus_in_proportion() {
        let columns = [col(None), col(None)];
        let mut solver = ColumnSolver::new(&columns, Some(300.0));
        solver.record(0, 1, 20.0);
        solver.record(1, 1, 40.0);
        let widths = solver.finish();
        // 240 surplus split 1:2 on top of the preferred widths.
        assert!((widths[0] - 100.0).abs() < 0.01);
        assert!((widths[1] - 200.0).abs() < 0.01);
    }

    #[test]
    fn auto_columns_shrink_to_fit_the_budget() {
        let columns = [col(None), col(None)];
        let mut solver = ColumnSolver::new(&columns, Some(90.0));
        solver.record(0, 1, 60.0);
        solver.record(1, 1, 120.0);
        let widths = solver.finish();
        assert!((widths[0] - 30.0).abs() < 0.01);
        assert!((widths[1] - 60.0).abs() < 0.01);
    }

    #[test]
    fn spanning_cell_width_spreads_over_covered_auto_columns() {
        let columns = [col(None), col(None)];
        let mut solver = ColumnSolver::new(&columns, Some(100.0));
        solver.record(0, 2, 80.0);
        let widths = solver.finish();
        // 40pt each preferred, surplus split evenly.
        assert!((widths[0] - 50.0).abs() < 0.01);
        assert!((widths[1] - 50.0).abs() < 0.01);
    }

    #[test]
    fn spanning_cell_pays_fixed_columns_first() {
        let columns = [col(Some(Dimension::Pt(30.0))), col(None)];
        let mut solver = ColumnSolver::new(&columns, Some(100.0));
        solver.record(0, 2, 50.0);
        let widths = solver.finish();
        assert!((widths[0] - 30.0).abs() < 0.01);
        // 20pt preferred for the auto column, then the 50pt surplus.
        assert!((widths[1] - 70.0).abs() < 0.01);
    }

    #[test]
    fn percentages_degrade_to_auto_without_a_bounded_width() {
        let columns = [col(Some(Dimension::Percent(50.0)))];
        let mut solver = ColumnSolver::new(&columns, None);
        assert!(solver.is_auto(0));
        solver.record(0, 1, 42.0);
        assert_eq!(solver.finish(), vec![42.0]);
    }

    #[test]
    fn empty_auto_columns_split_the_remainder_evenly() {
        let columns = [col(Some(Dimension::Pt(40.0))), col(None), col(None)];
        let solver = ColumnSolver::new(&columns, Some(140.0));
        let widths = solver.finish();
        assert_eq!(widths, vec![40.0, 50.0, 50.0]);
    }
}
