use crate::reports;
use clap::Args;
use playcrack_core::config::{GenerationParams, RuleArgs, StopConditions};
use playcrack_core::core_types::Genome;
use playcrack_core::fitness::EnglishFitness;
use playcrack_core::genetic::{CrackOptions, Cracker, ProgressCallback};
use playcrack_core::{ngrams, PfResult};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    /// Ciphertext file
    #[arg(short, long)]
    pub cipher: PathBuf,

    /// Reference n-gram table
    #[arg(short, long)]
    pub reference: PathBuf,

    /// n-gram window of the reference table
    #[arg(short = 'n', long, default_value_t = 4)]
    pub ngram: usize,

    /// Population size at initialization
    #[arg(short, long, default_value_t = 500)]
    pub population: usize,

    #[command(flatten)]
    pub params: GenerationParams,

    #[command(flatten)]
    pub stop: StopConditions,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// JSON file overriding the generation parameters
    #[arg(long)]
    pub params_file: Option<PathBuf>,

    /// Keyword seeding the initial population
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// RNG seed for reproducible runs
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Generations between progress lines
    #[arg(long, default_value_t = 50)]
    pub report_every: usize,
}

struct CliProgress {
    every: usize,
}

impl ProgressCallback for CliProgress {
    fn on_progress(&mut self, generation: usize, best_score: u64, best: &Genome) -> bool {
        if self.every > 0 && generation % self.every == 0 {
            info!(
                "Gen {:5} | Best: {:>20} | {}",
                generation,
                best_score,
                String::from_utf8_lossy(best)
            );
        }
        true
    }
}

pub fn run(args: CrackArgs) -> PfResult<()> {
    info!("📂 Loading reference table: {:?}", args.reference);
    let reference = ngrams::read_table_file(&args.reference, args.ngram)?;
    let fitness = EnglishFitness::new(reference)?;

    let cipher = fs::read(&args.cipher)?;

    let params = match &args.params_file {
        Some(path) => {
            info!("⚙️  Loading generation parameters from {path:?}");
            GenerationParams::load_from_file(path)?
        }
        None => args.params,
    };

    let options = CrackOptions {
        population: args.population,
        keyword: args.keyword.clone(),
        params,
        stop: args.stop,
        rules: args.rules.to_rules(),
    };

    info!(
        "🚀 Searching: population {}, up to {} generations",
        options.population, options.stop.generations
    );
    let cracker = Cracker::new(fitness, options);
    let report = cracker.run(
        &cipher,
        args.seed,
        &mut CliProgress {
            every: args.report_every,
        },
    )?;

    info!(
        "🏆 Finished after {} generations",
        report.generations
    );
    reports::print_square("BEST KEY", &report.key);

    println!("Key: {}", String::from_utf8_lossy(report.key.letters()));
    println!("Score: {}", report.score);
    println!("{}", String::from_utf8_lossy(&report.plaintext));
    Ok(())
}
