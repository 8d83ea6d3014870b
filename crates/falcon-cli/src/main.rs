use anyhow::Result;
use clap::Parser;
use falcon_core::{chain::Chain, Block};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "falcon-cli")]
#[command(about = "Mine a few demonstration blocks and check chain validity")]
struct Args {
    /// Leading zero hex digits required of each mined block hash
    #[arg(long, default_value_t = 4)]
    difficulty: u32,

    /// Search nonces on all cores instead of a single thread
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut chain = Chain::with_difficulty(args.difficulty);

    let candidates = [
        Block::new(1, "01/01/2018", json!({ "amount": 4 })),
        Block::new(2, "10/01/2018", json!({ "amount": 10 })),
    ];

    for candidate in candidates {
        info!("mining block {} . . .", candidate.index);
        let mined = if args.parallel {
            chain.append_parallel(candidate)
        } else {
            chain.append(candidate)
        };
        println!(
            "block {}: nonce={} hash={}",
            mined.index, mined.nonce, mined.hash
        );
    }

    println!("chain length: {}", chain.len());
    println!("chain valid : {}", chain.is_valid());
    println!("{}", serde_json::to_string_pretty(chain.blocks())?);

    Ok(())
}
