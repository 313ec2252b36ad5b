use clap::Parser;
use hashiup::cli_types::Cli;
use hashiup::commands;
use hashiup::logging;

fn main() {
    // Optional .env in the working directory
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    if let Err(e) = commands::handle_command(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
