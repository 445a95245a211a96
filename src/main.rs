mod archiver;
mod cli;
mod command;
mod commands;
mod destination;
mod error;
mod page_range;
mod pdf;
mod settings;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use command::ShellRunner;
use commands::split::Splitter;
use error::Error;
use settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match cli::usage_error(e) {
            Ok(err) => exit_with(err.into()),
            Err(e) => e.exit(),
        },
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        exit_with(e);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    let options = cli.into_options()?;

    let runner = ShellRunner;
    let splitter = Splitter::new(&settings, &runner, archiver::from_settings(&settings));
    let plan = splitter.run(&options).await?;

    println!(
        "Split {} into {} files in {}",
        options.source.display(),
        plan.commands.len(),
        plan.destdir.display()
    );

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) if !path.is_file() => Err(Error::ConfigLoad {
            path: path.clone(),
            reason: "file not found".to_string(),
        }
        .into()),
        Some(path) => Ok(Settings::load(path)?),
        None => match Settings::default_path() {
            Some(path) => Ok(Settings::load(path)?),
            None => Ok(Settings::default()),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pdfsp=debug" } else { "pdfsp=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_with(err: anyhow::Error) -> ! {
    match err.downcast_ref::<Error>() {
        Some(e) => {
            for line in e.report() {
                eprintln!("{}", line);
            }
            std::process::exit(e.exit_code())
        }
        None => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1)
        }
    }
}
