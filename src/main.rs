use clap::Parser;
use daylist::cli::commands::Cli;
use daylist::cli::handlers;
use daylist::io::logging::init_cli_logging;
use daylist::io::paths::Paths;
use daylist::model::settings::Platform;

fn main() {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.data_dir.as_deref());

    let result = match cli.command {
        // No subcommand → launch TUI
        None => daylist::tui::run(&paths, Platform::current()),
        Some(_) => {
            init_cli_logging();
            handlers::dispatch(cli, &paths)
        }
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
