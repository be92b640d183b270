use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::TaskColor;

#[derive(Parser)]
#[command(name = "postio", about = concat!("\u{25B6} postio v", env!("CARGO_PKG_VERSION"), " - a kanban board for your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep the board in a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the board's columns with task counts
    Columns,
    /// List tasks, grouped by column
    List(ListArgs),
    /// Add a task to the bottom of a column
    Add(AddArgs),
    /// Change a task's title, description or color
    Edit(EditArgs),
    /// Toggle a task between done and not done
    Toggle(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Move a task to a column, optionally at a position
    Mv(MvArgs),
    /// Write the board as JSON
    Export(ExportArgs),
    /// Throw away local changes and restore the default tasks
    Reset(ResetArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Column to list (default: all columns)
    pub column: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Column id (e.g. todo)
    pub column: String,
    /// Task title
    pub title: String,
    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Card color (white, mint, surface, soft-teal, deep-teal)
    #[arg(long)]
    pub color: Option<TaskColor>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description (empty clears it)
    #[arg(short, long)]
    pub description: Option<String>,
    /// New card color
    #[arg(long)]
    pub color: Option<TaskColor>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task id
    pub id: String,
    /// Destination column id
    pub column: String,
    /// Position within the destination column (0-based, default: bottom)
    #[arg(long)]
    pub position: Option<usize>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm the reset
    #[arg(long)]
    pub yes: bool,
}
