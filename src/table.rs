use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeSet, HashMap};

/// A dense numeric table: ordered, named f64 columns over a shared,
/// strictly increasing trading-date index.
///
/// Construction aligns the input series on the intersection of their dates,
/// so a row exists only where every column has an observation. Columns with
/// no observations at all are dropped before alignment.
#[derive(Debug, Clone)]
pub struct Table {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    /// Build a table from per-column `(date, value)` series, aligned on the
    /// intersection of the columns' dates. Duplicate dates within a column
    /// keep the last observation.
    pub fn from_series(series: Vec<(String, Vec<(NaiveDate, f64)>)>) -> Self {
        let columns: Vec<(String, HashMap<NaiveDate, f64>)> = series
            .into_iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(name, points)| (name, points.into_iter().collect()))
            .collect();

        if columns.is_empty() {
            return Self {
                dates: Vec::new(),
                names: Vec::new(),
                values: Array2::zeros((0, 0)),
            };
        }

        let mut dates: BTreeSet<NaiveDate> = columns[0].1.keys().copied().collect();
        for (_, points) in &columns[1..] {
            dates.retain(|d| points.contains_key(d));
        }
        let dates: Vec<NaiveDate> = dates.into_iter().collect();

        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        let mut values = Array2::zeros((dates.len(), names.len()));
        for (j, (_, points)) in columns.iter().enumerate() {
            for (i, date) in dates.iter().enumerate() {
                values[(i, j)] = points[date];
            }
        }

        Self {
            dates,
            names,
            values,
        }
    }

    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        let j = self.names.iter().position(|n| n == name)?;
        Some(self.values.column(j))
    }

    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(j) = self.names.iter().position(|n| n == from) {
            self.names[j] = to.to_string();
        }
    }

    /// Daily simple returns `r_t = p_t / p_{t-1} - 1` per column; the first
    /// (undefined) row is dropped.
    pub fn daily_returns(&self) -> Self {
        if self.height() < 2 {
            return Self {
                dates: Vec::new(),
                names: self.names.clone(),
                values: Array2::zeros((0, self.width())),
            };
        }

        let rows = self.height() - 1;
        let mut values = Array2::zeros((rows, self.width()));
        for i in 0..rows {
            for j in 0..self.width() {
                values[(i, j)] = self.values[(i + 1, j)] / self.values[(i, j)] - 1.0;
            }
        }

        Self {
            dates: self.dates[1..].to_vec(),
            names: self.names.clone(),
            values,
        }
    }
}
