//! Command-line surface of the generator.
//!
//! Discovers `.txt`/`.md` corpus files in the data directory, trains an
//! order-N chain on them, finalizes it and writes three artifacts to the
//! output directory: `stats.txt` (the diagnostic report), `model.bin` (the
//! serialized chain) and `generated.txt` (the composed output text).

use clap::Parser;
use env_logger::Env;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use textgen_core::model::MarkovChain;
use textgen_core::text::compose;
use textgen_core::{corpus, io};

mod report;

#[derive(Parser, Debug)]
#[command(name = "textgen")]
#[command(about = "Markov chain text generator")]
#[command(version)]
struct Args {
    /// Markov chain order (1-5)
    #[arg(short, long, default_value_t = 2)]
    order: usize,

    /// Number of tokens to generate
    #[arg(short, long, default_value_t = 1000)]
    length: usize,

    /// Directory containing the .txt/.md corpus files
    #[arg(long, default_value = "data")]
    data: String,

    /// Directory receiving stats.txt, model.bin and generated.txt
    #[arg(long, default_value = "out")]
    out: String,

    /// Seed for the random source, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Split corpus counting across CPU cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !(1..=5).contains(&args.order) {
        return Err(format!("invalid order {}, supported orders: 1-5", args.order).into());
    }

    let data_dir = io::normalize_folder(&args.data);
    let files = io::list_files(&data_dir, &["txt", "md"])?;
    if files.is_empty() {
        return Err(format!("no .txt or .md files found in {}", data_dir.display()).into());
    }

    let mut chain = match args.seed {
        Some(seed) => MarkovChain::with_seed(args.order, seed)?,
        None => MarkovChain::new(args.order)?,
    };

    if args.parallel {
        log::info!("processing {} files in parallel...", files.len());
        let counts = corpus::build_counts_parallel(args.order, &files)?;
        chain.merge_counts(counts)?;
    } else {
        corpus::train_files(&mut chain, &files)?;
    }

    log::info!("calculating probabilities (order {})...", args.order);
    chain.finalize()?;

    let out_dir = PathBuf::from(&args.out);
    fs::create_dir_all(&out_dir)?;

    let mut stats = File::create(out_dir.join("stats.txt"))?;
    report::write_stats(&mut stats, &chain)?;

    chain.save(out_dir.join("model.bin"))?;

    // A corpus with no full observation surfaces the empty-model error here.
    let mut generator = chain.generator()?;
    generator.seed()?;
    let tokens = generator.generate(args.length)?;
    fs::write(out_dir.join("generated.txt"), compose(tokens))?;

    println!("Done. Output in {}/generated.txt", out_dir.display());
    Ok(())
}
