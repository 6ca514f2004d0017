use clap::{Parser, Subcommand};
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Playfair cipher solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for the key of a Playfair ciphertext
    Crack(cmd::crack::CrackArgs),
    /// Encrypt a plaintext file with a keyword square
    Encrypt(cmd::codec::CodecArgs),
    /// Decrypt a ciphertext file with a keyword square
    Decrypt(cmd::codec::CodecArgs),
    /// Build or check a reference n-gram table
    Ngrams(cmd::ngrams::NgramsArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Crack(args) => cmd::crack::run(args),
        Commands::Encrypt(args) => cmd::codec::run(args, cmd::codec::Direction::Encrypt),
        Commands::Decrypt(args) => cmd::codec::run(args, cmd::codec::Direction::Decrypt),
        Commands::Ngrams(args) => cmd::ngrams::run(args),
    };

    if let Err(e) = result {
        error!("{e}");
        process::exit(1);
    }
}
