use clap::Args;
use playcrack_core::config::RuleArgs;
use playcrack_core::key::Key;
use playcrack_core::PfResult;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Input file (plaintext to encrypt, ciphertext to decrypt)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Keyword building the key square
    #[arg(short, long, default_value = "")]
    pub keyword: String,

    #[command(flatten)]
    pub rules: RuleArgs,
}

pub enum Direction {
    Encrypt,
    Decrypt,
}

pub fn run(args: CodecArgs, direction: Direction) -> PfResult<()> {
    let key = Key::with_rules(&args.keyword, args.rules.to_rules());
    let raw = fs::read(&args.input)?;
    let text = key.sanitize(&raw);
    let out = match direction {
        Direction::Encrypt => key.encrypt(&text),
        Direction::Decrypt => key.decrypt(&text),
    };
    println!("{}", String::from_utf8_lossy(&out));
    Ok(())
}
