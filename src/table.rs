//! Tabular sensor data model and CSV parsing.
//!
//! A [`Frame`] holds one uploaded table as named, ordered, equal-length
//! columns of [`Cell`]s. Numeric coercion is deliberately two-phased: the
//! normalizer turns unparseable cells into [`Cell::Missing`], and only the
//! final pre-scaling pass collapses missing values to zero. Intermediate
//! consumers can therefore still distinguish "missing" from "zero".

use std::fs;
use std::path::Path;

use crate::Error;

/// One value in a sensor table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A numeric value.
    Num(f32),
    /// Raw text as parsed from the upload.
    Text(String),
    /// Missing value marker (empty cell, or failed numeric coercion).
    Missing,
}

impl Cell {
    /// Build a cell from a raw field. Empty or whitespace-only fields are
    /// missing; everything else is kept as text until coercion.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// First coercion pass: text that parses as a number becomes [`Cell::Num`],
    /// text that does not becomes [`Cell::Missing`]. A NaN parse is a missing
    /// value, not a number.
    pub fn coerce_numeric(&self) -> Cell {
        match self {
            Cell::Num(n) if n.is_nan() => Cell::Missing,
            Cell::Num(n) => Cell::Num(*n),
            Cell::Missing => Cell::Missing,
            Cell::Text(t) => match t.parse::<f32>() {
                Ok(n) if n.is_nan() => Cell::Missing,
                Ok(n) => Cell::Num(n),
                Err(_) => Cell::Missing,
            },
        }
    }

    /// Second coercion pass: collapse to a plain number, substituting 0.0
    /// for anything missing or unparseable. The last step before the matrix
    /// crosses into model territory.
    pub fn unwrap_or_zero(&self) -> f32 {
        match self.coerce_numeric() {
            Cell::Num(n) => n,
            _ => 0.0,
        }
    }
}

/// A parsed sensor table: named columns in upload order, equal lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
}

impl Frame {
    /// Build a frame from named columns. All columns must have the same
    /// number of rows.
    pub fn from_columns(columns: Vec<(&str, Vec<Cell>)>) -> Result<Self, Error> {
        let mut frame = Frame {
            names: Vec::with_capacity(columns.len()),
            columns: Vec::with_capacity(columns.len()),
        };
        for (name, cells) in columns {
            if let Some(first) = frame.columns.first() {
                if cells.len() != first.len() {
                    return Err(Error::Parse(format!(
                        "column '{}' has {} rows, expected {}",
                        name,
                        cells.len(),
                        first.len()
                    )));
                }
            }
            frame.names.push(name.to_string());
            frame.columns.push(cells);
        }
        Ok(frame)
    }

    /// Parse a frame from delimited text. The first line is the header;
    /// every following line must have the same number of fields. Quoted
    /// fields may contain commas and doubled quotes.
    pub fn from_csv_str(text: &str) -> Result<Self, Error> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| Error::Parse("empty upload".to_string()))?;
        let names = split_fields(header)?;
        if names.iter().all(|n| n.trim().is_empty()) {
            return Err(Error::Parse("upload has no header".to_string()));
        }

        let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
        let mut n_rows = 0usize;
        for (line_no, line) in lines {
            let fields = split_fields(line)?;
            if fields.len() != names.len() {
                return Err(Error::Parse(format!(
                    "line {}: expected {} fields, got {}",
                    line_no + 1,
                    names.len(),
                    fields.len()
                )));
            }
            for (column, field) in columns.iter_mut().zip(&fields) {
                column.push(Cell::from_raw(field));
            }
            n_rows += 1;
        }

        if n_rows == 0 {
            return Err(Error::Parse("upload has no data rows".to_string()));
        }

        Ok(Frame {
            names: names.iter().map(|n| n.trim().to_string()).collect(),
            columns,
        })
    }

    /// Parse a frame from a CSV file on disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_csv_str(&text)
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a column by exact name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Cells of the column at `index`.
    pub fn cells(&self, index: usize) -> &[Cell] {
        &self.columns[index]
    }

    /// Mutable cells of the column at `index`.
    pub fn cells_mut(&mut self, index: usize) -> &mut [Cell] {
        &mut self.columns[index]
    }

    /// Drop a column by exact name. Returns whether it was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.names.remove(index);
                self.columns.remove(index);
                true
            }
            None => false,
        }
    }

    /// Set every row of `name` to a fixed numeric value, overwriting the
    /// column if it exists and appending it at the end otherwise.
    pub fn set_scalar(&mut self, name: &str, value: f32) {
        let n_rows = self.n_rows();
        let cells = vec![Cell::Num(value); n_rows];
        match self.position(name) {
            Some(index) => self.columns[index] = cells,
            None => {
                self.names.push(name.to_string());
                self.columns.push(cells);
            }
        }
    }
}

/// Split one CSV line into fields, honoring double-quoted fields with
/// doubled-quote escapes.
fn split_fields(line: &str) -> Result<Vec<String>, Error> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Parse("unterminated quoted field".to_string()));
    }

    fields.push(field);
    Ok(fields)
}
