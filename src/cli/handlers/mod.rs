use std::path::Path;

use tracing::{debug, info};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::paths;
use crate::io::storage::{FileStorage, atomic_write, clear_tasks, open_store};
use crate::model::dataset::default_dataset;
use crate::model::{ColumnId, NewTask, Task, TaskId, TaskPatch};
use crate::ops::export::export_board;
use crate::ops::projector::{ColumnView, board_view, overall_index};
use crate::ops::store::{StoreError, TaskStore};
use crate::util::logging;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    logging::init_stderr();
    let json = cli.json;
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    let config = config_io::read_config(&data_dir)?;
    let mut store = open_store(&data_dir, config.columns);
    debug!(data_dir = %data_dir.display(), tasks = store.len(), "board loaded");

    let Some(cmd) = cli.command else {
        return Ok(());
    };
    match cmd {
        // Read commands
        Commands::Columns => cmd_columns(&store, json),
        Commands::List(args) => cmd_list(&store, args, json),
        Commands::Export(args) => cmd_export(&store, args),

        // Write commands
        Commands::Add(args) => cmd_add(&mut store, args, json),
        Commands::Edit(args) => cmd_edit(&mut store, args),
        Commands::Toggle(args) => cmd_toggle(&mut store, args),
        Commands::Rm(args) => cmd_rm(&mut store, args),
        Commands::Mv(args) => cmd_mv(&mut store, args),
        Commands::Reset(args) => cmd_reset(&mut store, &data_dir, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trimmed title, or an error when nothing is left
fn require_title(title: &str) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("title must not be blank".into());
    }
    Ok(title.to_string())
}

/// Trimmed description; blank means none
fn normalize_description(description: &str) -> Option<String> {
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

fn require_task<'a>(store: &'a TaskStore, id: &TaskId) -> Result<&'a Task, StoreError> {
    store.get(id).ok_or_else(|| StoreError::NotFound(id.clone()))
}

/// Overall index that lands `id` at `position` of `column` once it has been
/// taken out of its current place.
fn landing_index(store: &TaskStore, id: &TaskId, column: &ColumnId, position: usize) -> usize {
    let rest: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| &t.id != id)
        .cloned()
        .collect();
    overall_index(&rest, column, position)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_columns(store: &TaskStore, json: bool) -> CmdResult {
    let views = board_view(store);
    if json {
        let infos: Vec<_> = views.iter().map(column_info_json).collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for line in format_columns_table(&views) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_list(store: &TaskStore, args: ListArgs, json: bool) -> CmdResult {
    let views: Vec<ColumnView> = match args.column {
        Some(column) => {
            let column = ColumnId::from(column);
            if !store.has_column(&column) {
                return Err(StoreError::UnknownColumn(column).into());
            }
            board_view(store)
                .into_iter()
                .filter(|v| v.column.id == column)
                .collect()
        }
        None => board_view(store),
    };

    if json {
        let results: Vec<_> = views.iter().map(column_tasks_json).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, view) in views.iter().enumerate() {
            if i > 0 {
                println!();
            }
            for line in format_column_listing(view) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn cmd_export(store: &TaskStore, args: ExportArgs) -> CmdResult {
    let text = export_board(store.columns(), store.tasks())?;
    match args.output {
        Some(path) => {
            atomic_write(&path, text.as_bytes())
                .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
            info!(path = %path.display(), tasks = store.len(), "board exported");
            println!("exported {} tasks to {}", store.len(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut TaskStore, args: AddArgs, json: bool) -> CmdResult {
    let fields = NewTask {
        title: require_title(&args.title)?,
        description: args.description.as_deref().and_then(normalize_description),
        color: args.color.unwrap_or_default(),
    };
    let column = ColumnId::from(args.column);
    let task = store.add(&column, fields)?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_edit(store: &mut TaskStore, args: EditArgs) -> CmdResult {
    let id = TaskId::from(args.id);
    let patch = TaskPatch {
        title: args.title.as_deref().map(require_title).transpose()?,
        description: args.description.as_deref().map(normalize_description),
        color: args.color,
    };
    if patch.is_empty() {
        return Err("nothing to change (use --title, --description or --color)".into());
    }
    store.update(&id, patch)?;
    println!("{}", id);
    Ok(())
}

fn cmd_toggle(store: &mut TaskStore, args: IdArg) -> CmdResult {
    let id = TaskId::from(args.id);
    let completed = store.toggle_complete(&id)?;
    println!("{} {}", id, if completed { "done" } else { "not done" });
    Ok(())
}

fn cmd_rm(store: &mut TaskStore, args: IdArg) -> CmdResult {
    let id = TaskId::from(args.id);
    let task = store.remove(&id)?;
    println!("deleted {} \"{}\"", task.id, task.title);
    Ok(())
}

fn cmd_mv(store: &mut TaskStore, args: MvArgs) -> CmdResult {
    let id = TaskId::from(args.id);
    let column = ColumnId::from(args.column);
    require_task(store, &id)?;
    if !store.has_column(&column) {
        return Err(StoreError::UnknownColumn(column).into());
    }
    let position = args.position.unwrap_or(usize::MAX);
    let target = landing_index(store, &id, &column, position);
    store.move_to_column(&id, &column, target)?;
    println!("{} -> {}", id, column);
    Ok(())
}

fn cmd_reset(store: &mut TaskStore, data_dir: &Path, args: ResetArgs) -> CmdResult {
    if !args.yes {
        return Err("reset discards every local change; pass --yes to confirm".into());
    }
    clear_tasks(&mut FileStorage::in_dir(data_dir))?;
    store.replace_all(default_dataset().tasks);
    info!("board reset to defaults");
    println!("board reset ({} tasks)", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::default_columns;
    use crate::ops::projector::column_view;
    use pretty_assertions::assert_eq;

    fn store() -> TaskStore {
        TaskStore::new(default_columns(), default_dataset().tasks)
    }

    fn ids(store: &TaskStore, column: &str) -> Vec<String> {
        column_view(store.tasks(), &column.into())
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    #[test]
    fn titles_are_trimmed_and_blank_rejected() {
        assert_eq!(require_title("  Ship  ").unwrap(), "Ship");
        assert!(require_title(" \t ").is_err());
        assert_eq!(normalize_description("  "), None);
        assert_eq!(normalize_description(" a ").as_deref(), Some("a"));
    }

    #[test]
    fn mv_position_counts_within_destination() {
        let mut store = store();
        for title in ["a", "b"] {
            store.add(&"in-progress".into(), NewTask::titled(title)).unwrap();
        }
        let b = store.tasks()[3].id.clone();
        let target = landing_index(&store, &"1".into(), &"in-progress".into(), 1);
        store
            .move_to_column(&"1".into(), &"in-progress".into(), target)
            .unwrap();
        let view = ids(&store, "in-progress");
        assert_eq!(view[1], "1");
        assert_eq!(view.len(), 4);

        let target = landing_index(&store, &b, &"in-progress".into(), 0);
        store.move_to_column(&b, &"in-progress".into(), target).unwrap();
        assert_eq!(ids(&store, "in-progress")[0], b.to_string());
    }

    #[test]
    fn mv_past_end_lands_last() {
        let mut store = store();
        let target = landing_index(&store, &"2".into(), &"todo".into(), usize::MAX);
        store.move_to_column(&"2".into(), &"todo".into(), target).unwrap();
        assert_eq!(ids(&store, "todo"), vec!["1", "2"]);
        assert!(ids(&store, "in-progress").is_empty());
    }
}
