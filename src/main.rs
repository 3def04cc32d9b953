use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tmt_data_wizard::config::{WizardConfig, DEFAULT_DROPDOWN_FILE, DEFAULT_REFERENCE_FILE};
use tmt_data_wizard::llm::LlmClient;
use tmt_data_wizard::loader::Datasets;
use tmt_data_wizard::shell::{Shell, ShellControl, HELP};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tmt-data-wizard")]
#[command(about = "Chat with an LLM about a filtered slice of the TMT reference data")]
struct Args {
    /// Directory holding the data files (default: current directory)
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Country/company lookup file name
    #[arg(long, default_value = DEFAULT_DROPDOWN_FILE)]
    dropdown: String,

    /// Reference data file name
    #[arg(long, default_value = DEFAULT_REFERENCE_FILE)]
    reference: String,

    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Model name (or set OPENAI_MODEL env var)
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = WizardConfig::resolve(args.data_dir, args.dropdown, args.reference, args.api_key, args.model)?;

    let datasets = Datasets::load(&config);
    if !datasets.is_usable() {
        warn!("Data files are empty or failed to load.");
        return Ok(());
    }

    let llm = LlmClient::from_config(&config);
    info!("TMT Data Wizard ready (model {})", llm.model());

    let mut shell = Shell::new(&datasets, &llm)?;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "TMT Data Wizard\n{}", HELP)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        if shell.handle_line(&line, &mut stdout).await? == ShellControl::Exit {
            break;
        }
    }

    Ok(())
}
