//! Shared utilities for CLI commands

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use super::error::CliResult;
use crate::api::{ApiResult, into_envelope};

/// Text to print plus whether the operation succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub success: bool,
}

/// Truncate a string with ellipsis if it exceeds max length
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

/// Apply consistent table styling
pub fn apply_table_style(table: &mut Table) {
    table.with(Style::rounded());
}

/// Print the full envelope as pretty JSON.
pub fn render_json<T: Serialize>(result: ApiResult<T>) -> CliResult<Rendered> {
    let envelope = into_envelope(result);
    Ok(Rendered {
        success: envelope.success,
        text: serde_json::to_string_pretty(&envelope)?,
    })
}

/// Render a list either as JSON or as a table of display rows.
pub fn render_list<T, R, F>(result: ApiResult<Vec<T>>, format: &str, to_row: F) -> CliResult<Rendered>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if format == "json" {
        return render_json(result);
    }

    match result {
        Ok(envelope) => {
            let rows: Vec<R> = envelope.data.unwrap_or_default().iter().map(to_row).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(Rendered {
                text: table.to_string(),
                success: true,
            })
        }
        Err(e) => Ok(Rendered {
            text: format!("Error ({}): {}", e.status, e.message),
            success: false,
        }),
    }
}
