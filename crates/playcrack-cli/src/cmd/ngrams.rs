use clap::Args;
use playcrack_core::{corpus, ngrams, PfResult};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct NgramsArgs {
    /// Raw corpus text file
    #[arg(short, long, required_unless_present = "check")]
    pub input: Option<PathBuf>,

    /// Reference table to write
    #[arg(short, long, required_unless_present = "check")]
    pub output: Option<PathBuf>,

    /// n-gram window
    #[arg(short = 'n', long, default_value_t = 4)]
    pub ngram: usize,

    /// Strictly validate an existing reference table instead of building one
    #[arg(long, conflicts_with_all = ["input", "output"])]
    pub check: Option<PathBuf>,
}

pub fn run(args: NgramsArgs) -> PfResult<()> {
    if let Some(table) = &args.check {
        ngrams::validate_table_file(table, args.ngram)?;
        info!("✅ {table:?} is a well-formed {}-gram table", args.ngram);
        return Ok(());
    }

    // clap guarantees both are present when --check is absent.
    let input = args.input.expect("required by clap");
    let output = args.output.expect("required by clap");
    let windows = corpus::build_reference(&input, &output, args.ngram)?;
    info!("✅ Wrote {output:?} ({windows} windows)");
    Ok(())
}
