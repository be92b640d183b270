use clap::Parser;
use postio::cli::commands::Cli;
use postio::cli::handlers;
use postio::io::paths;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let data_dir = paths::data_dir(cli.data_dir.as_deref());
            if let Err(e) = postio::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
