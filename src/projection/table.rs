//! Year-by-year projection output structures

use serde::{Deserialize, Serialize};

/// A single sampled year of the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    // Timing
    pub year: u32,
    pub age: u32,

    // Production and payout under each schedule
    pub gross_production: i64,
    pub current_payout_value: i64,
    pub new_payout_value: Option<i64>,

    // Incremental payout from moving
    pub additional_payout: Option<i64>,
    pub additional_payout_after_tax: Option<f64>,

    /// Transition bonus, carried on the year-0 row only
    pub bonus_amount: Option<i64>,
}

impl ProjectionRow {
    /// Whether this is the present-day row
    pub fn is_present(&self) -> bool {
        self.year == 0
    }
}

/// Projection rows keyed by year offset, in insertion order.
///
/// Inserting a year that is already present replaces that row in place, so
/// the table always holds at most one row per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    rows: Vec<ProjectionRow>,
}

impl ProjectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning the row it replaced if the year was already present
    pub fn insert(&mut self, row: ProjectionRow) -> Option<ProjectionRow> {
        match self.rows.iter_mut().find(|r| r.year == row.year) {
            Some(existing) => Some(std::mem::replace(existing, row)),
            None => {
                self.rows.push(row);
                None
            }
        }
    }

    pub fn get(&self, year: u32) -> Option<&ProjectionRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    pub fn get_mut(&mut self, year: u32) -> Option<&mut ProjectionRow> {
        self.rows.iter_mut().find(|r| r.year == year)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectionRow> {
        self.rows.iter()
    }

    /// Year offsets in table order
    pub fn years(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for the retirement year (the last one inserted)
    pub fn final_row(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }
}

impl<'a> IntoIterator for &'a ProjectionTable {
    type Item = &'a ProjectionRow;
    type IntoIter = std::slice::Iter<'a, ProjectionRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
