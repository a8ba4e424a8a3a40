mod logging;
mod name;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the qualified name of the root element of an XML document.
    Name(name::RootName),
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Name(name) => {
            name.run()?;
        }
    }
    Ok(())
}
