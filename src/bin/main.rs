use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use replay_verifier::commitment::{combine_seeds, hash_seed};
use replay_verifier::error::VerificationError;
use replay_verifier::orchestrator::verify_session;
use replay_verifier::report::render_text;
use replay_verifier::schema::VerificationInput;

#[derive(Parser)]
#[command(name = "replay-verifier", about = "Verifier for a provably-fair trading-game replay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a revealed session and certify it against its commitments.
    Verify {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the SHA-256 commitment hash for a seed.
    HashSeed { seed: u32 },
    /// Print the XOR combination of two seeds.
    CombineSeeds { a: u32, b: u32 },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Verify { input, json } => verify_cmd(&input, json),
        Commands::HashSeed { seed } => {
            println!("{}", hash_seed(seed));
            Ok(ExitCode::SUCCESS)
        }
        Commands::CombineSeeds { a, b } => {
            println!("{}", combine_seeds(a, b));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn verify_cmd(input_path: &PathBuf, json: bool) -> Result<ExitCode> {
    if !input_path.exists() {
        bail!("input file not found: {}", input_path.display());
    }

    let raw = fs::read_to_string(input_path)
        .with_context(|| format!("failed to read {}", input_path.display()))?;
    let input: VerificationInput = serde_json::from_str(&raw).map_err(|e| {
        anyhow::anyhow!(VerificationError::InputMalformed(format!(
            "{}: {e}",
            input_path.display()
        )))
    })?;

    let result = verify_session(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_text(&result));
    }

    Ok(if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
