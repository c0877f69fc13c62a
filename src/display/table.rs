use crate::core::services::types::FeatureTable;
use crate::error::{AppError, DisplayError};
use crate::utils::text::truncate_text_unicode;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use serde_json::Value;

const MAX_CELL_WIDTH: usize = 100;

/// Formatter and utilities for table display
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    /// Create a new TableDisplay instance
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    /// Detect terminal width
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Render a feature table, optionally limited to the first `limit` rows
    pub fn render_feature_table(
        &self,
        table: &FeatureTable,
        limit: Option<usize>,
    ) -> Result<String, AppError> {
        if table.is_empty() {
            return Ok(format!("Layer '{}' returned no records.", table.layer_name));
        }

        let total_rows = table.len();
        let rows_to_display = limit.unwrap_or(total_rows).min(total_rows);

        let mut output_table = Table::new();
        output_table.load_preset(presets::UTF8_FULL);
        output_table.set_content_arrangement(ContentArrangement::Dynamic);
        self.configure_table_width(&mut output_table);

        let headers: Vec<Cell> = table
            .columns
            .iter()
            .map(|name| {
                if self.use_colors {
                    Cell::new(name).add_attribute(Attribute::Bold).fg(Color::Green)
                } else {
                    Cell::new(name).add_attribute(Attribute::Bold)
                }
            })
            .collect();
        output_table.set_header(headers);

        for row in table.rows.iter().take(rows_to_display) {
            let cells: Vec<Cell> = table
                .columns
                .iter()
                .map(|column| {
                    let value = row.get(column).unwrap_or(&Value::Null);
                    let formatted = self.format_cell_value(value);
                    if self.use_colors && value.is_null() {
                        Cell::new(formatted)
                            .fg(Color::DarkGrey)
                            .add_attribute(Attribute::Italic)
                    } else {
                        Cell::new(formatted)
                    }
                })
                .collect();
            output_table.add_row(cells);
        }

        let mut output = format!("📊 {}: {} records\n", table.layer_name, total_rows);
        output.push_str(&output_table.to_string());

        if rows_to_display != total_rows {
            output.push_str(&format!(
                "\nShowing {} of {} rows",
                rows_to_display, total_rows
            ));
        }

        if table.truncated {
            output.push_str(
                "\n⚠️  The server stopped at its record limit; this table is incomplete.",
            );
        }

        Ok(output)
    }

    /// Rows as a pretty JSON array of objects
    pub fn render_json(&self, table: &FeatureTable) -> Result<String, AppError> {
        serde_json::to_string_pretty(&table.rows)
            .map_err(|e| AppError::Display(DisplayError::TableFormat(e.to_string())))
    }

    fn configure_table_width(&self, table: &mut Table) {
        let width = match self.max_width {
            Some(terminal_width) if terminal_width > 20 => terminal_width - 6,
            Some(terminal_width) => terminal_width.max(40),
            None => 80,
        };
        table.set_width(width as u16);
    }

    pub fn format_cell_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "-".to_string(),
            Value::String(s) => truncate_text_unicode(s, MAX_CELL_WIDTH),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(arr) => {
                if arr.is_empty() {
                    "[]".to_string()
                } else {
                    format!("[{} items]", arr.len())
                }
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{{} items}}", obj.len())
                }
            }
        }
    }
}
