use std::path::PathBuf;

use calc_skill::SkillReactor;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "calc_skill")]
#[command(about = "Division and multiplication voice skill (Hermes JSON lines on stdin/stdout)")]
struct Args {
    /// INI file with a [global] section
    #[arg(short = 'c', long, default_value = calc_skill::config::CONFIG_INI)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr, stdout carries the session actions
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Calculator skill booting...");

    let reactor = SkillReactor::new(args.config);
    reactor
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
