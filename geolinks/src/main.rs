use colored::Colorize;
use geolinks::commands::command_argument_builder;
use geolinks::handlers::{handle_info, handle_load};
use tracing::Level;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    let level = match chosen_command.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match chosen_command.subcommand() {
        Some(("load", primary_command)) => handle_load(primary_command).await,
        Some(("info", primary_command)) => handle_info(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "[!]".red().bold(), e);
        std::process::exit(1);
    }
}
