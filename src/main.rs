use clap::Parser;
use sketch_filter::cli::{Args, Commands};
use sketch_filter::commands;
use sketch_filter::commands::filter_min_samples::FilterMinSamplesArgs;
use sketch_filter::config::Config;
use tracing_subscriber::EnvFilter;

fn main() {
    let log_level = std::env::var("SKETCH_FILTER_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    match args.command {
        Commands::FilterMinSamples {
            sigfiles,
            output,
            ksize,
            molecule,
            min_samples,
            max_samples,
            threads,
            report,
        } => commands::filter_min_samples::run(
            FilterMinSamplesArgs {
                sigfiles,
                output,
                ksize,
                molecule,
                min_samples,
                max_samples,
                threads,
                report,
            },
            &config,
        ),
        Commands::Occurrence {
            sigfiles,
            ksize,
            molecule,
            threads,
            output,
        } => commands::occurrence::run(sigfiles, ksize, molecule, threads, output, &config),
    }
}
