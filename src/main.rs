use clap::Parser;
use std::process::ExitCode;
use tido::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Login(args)) => cli::login(args).await,
        Some(Commands::Register(args)) => cli::register(args).await,
        Some(Commands::Logout) => cli::logout(),
        Some(Commands::List) => cli::list().await,
        Some(Commands::Add(args)) => cli::add(args).await,
        Some(Commands::Done(args)) => cli::set_done(args, true).await,
        Some(Commands::Undo(args)) => cli::set_done(args, false).await,
        Some(Commands::Rename(args)) => cli::rename(args).await,
        Some(Commands::Rm(args)) => cli::rm(args).await,
        Some(Commands::Config(args)) => cli::config(args),
        None => {
            // Interactive TUI mode
            match tido::tui::run().await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
