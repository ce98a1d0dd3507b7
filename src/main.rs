use clap::{Parser, Subcommand};
use toychain::format::{format_timestamp, truncate_hash, DEFAULT_HASH_PREVIEW};
use toychain::hash::compute_hash;
use toychain::session::ChainHandle;
use toychain::ChainConfig;

#[derive(Parser)]
#[command(
    name = "toychain",
    version,
    about = "Toy blockchain: proof-of-work mining and tamper detection"
)]
struct Cli {
    /// Leading zeros required when mining (1-4)
    #[arg(long, global = true, default_value = "2")]
    difficulty: u32,

    /// Print the final snapshot as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a set of block fields
    Hash {
        index: u64,
        previous_hash: String,
        /// Milliseconds since the Unix epoch
        timestamp: i64,
        data: String,
        #[arg(default_value = "0")]
        nonce: u64,
    },
    /// Mine blocks onto a fresh chain and report its validity
    Mine {
        /// Payload of each block, in order
        #[arg(required = true)]
        data: Vec<String>,
        /// Overwrite a block's data without re-hashing (INDEX=DATA)
        #[arg(long, value_parser = parse_tamper)]
        tamper: Vec<(usize, String)>,
        /// Re-mine from this block to the end, after tampering
        #[arg(long)]
        fix: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Hash {
            index,
            previous_hash,
            timestamp,
            data,
            nonce,
        } => cmd_hash(index, &previous_hash, timestamp, &data, nonce),
        Commands::Mine { data, tamper, fix } => {
            cmd_mine(cli.difficulty, cli.json, &data, &tamper, fix)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn parse_tamper(s: &str) -> Result<(usize, String), String> {
    let (index, data) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=DATA, got '{}'", s))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("bad block index '{}': {}", index, e))?;
    Ok((index, data.to_string()))
}

fn cmd_hash(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    data: &str,
    nonce: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", compute_hash(index, previous_hash, timestamp, data, nonce));
    Ok(())
}

fn cmd_mine(
    difficulty: u32,
    json: bool,
    data: &[String],
    tamper: &[(usize, String)],
    fix: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ChainHandle::new(ChainConfig::with_difficulty(difficulty))?;

    for payload in data {
        handle.append(payload)?;
    }
    for (index, new_data) in tamper {
        handle.tamper(*index, new_data)?;
    }
    if let Some(index) = fix {
        handle.fix_forward(index)?;
    }

    let snapshot = handle.snapshot();
    if json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    for (block, status) in snapshot.blocks.iter().zip(&snapshot.per_block_status) {
        let mark = match status.reason {
            None => "ok".to_string(),
            Some(reason) => format!("INVALID: {}", reason),
        };
        println!("Block #{} [{}]", block.index, mark);
        println!("  Timestamp: {}", format_timestamp(block.timestamp));
        println!("  Data:      {}", block.data);
        println!(
            "  Previous:  {}",
            truncate_hash(&block.previous_hash, DEFAULT_HASH_PREVIEW)
        );
        println!(
            "  Hash:      {}",
            truncate_hash(&block.hash, DEFAULT_HASH_PREVIEW)
        );
        println!("  Nonce:     {}", block.nonce);
    }
    println!();
    println!("{}", handle.validate_detailed());
    print!("{}", handle.stats()?);
    Ok(())
}
