use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sales_screen::data::loader::load_file;
use sales_screen::report::{summarize, write_predictions_csv};
use sales_screen::{Pipeline, PipelineConfig};

/// Train on the labeled sales transactions and flag suspicious rows in the
/// test set.
#[derive(Parser)]
#[command(name = "sales-screen", version, about)]
struct Cli {
    /// Training dataset (.csv, .json or .parquet) with the label column.
    #[arg(long)]
    train: PathBuf,

    /// Test dataset to score; needs only the feature columns.
    #[arg(long)]
    test: PathBuf,

    /// TOML pipeline config. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the test rows with predicted labels and scores to this CSV.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let label_column = config.label_column.clone();

    let training = load_file(&cli.train).context("loading training dataset")?;
    let test = load_file(&cli.test).context("loading test dataset")?;

    let mut pipeline = Pipeline::new(config);
    let predictions = pipeline.run(training, test.clone())?;

    print!("{}", summarize(&predictions));

    if let Some(path) = &cli.output {
        write_predictions_csv(path, &test, &predictions, &label_column)?;
    }
    Ok(())
}
