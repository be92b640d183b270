use crate::model::dataset::Dataset;
use crate::model::{Column, Task};

/// Render the board as a dataset document in the same shape as the
/// built-in `templates/board.json`, so an export can replace it.
pub fn export_board(columns: &[Column], tasks: &[Task]) -> Result<String, serde_json::Error> {
    let dataset = Dataset {
        columns: columns.to_vec(),
        tasks: tasks.to_vec(),
    };
    let mut out = serde_json::to_string_pretty(&dataset)?;
    out.push('\n');
    Ok(out)
}

/// Default file name used when exporting from the TUI
pub const EXPORT_FILE_NAME: &str = "board.json";
