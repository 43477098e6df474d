//! Table rendering for formatted output.

use console::measure_text_width;

/// A simple table for formatted output.
///
/// Cells may contain ANSI styling; column widths use the visible width.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| measure_text_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row to the table.
    pub fn add_row<S: AsRef<str>>(&mut self, row: Vec<S>) {
        let row: Vec<String> = row.iter().map(|s| s.as_ref().to_string()).collect();

        for (width, cell) in self.column_widths.iter_mut().zip(&row) {
            *width = (*width).max(measure_text_width(cell));
        }

        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let mut output = String::new();

        // Top border
        output.push_str(&self.render_border('┌', '┬', '┐'));
        output.push('\n');

        // Header row
        output.push_str(&self.render_row(&self.headers));
        output.push('\n');

        // Header separator
        output.push_str(&self.render_border('├', '┼', '┤'));
        output.push('\n');

        // Data rows
        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        // Bottom border
        output.push_str(&self.render_border('└', '┴', '┘'));

        output
    }

    fn render_border(&self, left: char, mid: char, right: char) -> String {
        let mut s = String::new();
        s.push(left);

        for (i, width) in self.column_widths.iter().enumerate() {
            s.push_str(&"─".repeat(width + 2));
            if i < self.column_widths.len() - 1 {
                s.push(mid);
            }
        }

        s.push(right);
        s
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut s = String::from("│");

        for (i, width) in self.column_widths.iter().enumerate() {
            let cell = row.get(i).map(|s| s.as_str()).unwrap_or("");
            let padding = width.saturating_sub(measure_text_width(cell));
            s.push_str(&format!(" {}{} │", cell, " ".repeat(padding)));
        }

        s
    }
}
