use browscapy::core::convert::convert;
use browscapy::domain::ports::ConfigProvider;
use browscapy::utils::error::ErrorSeverity;
use browscapy::utils::logger;
use browscapy::{
    BenchRunner, Browscapy, CliConfig, Command, Detector, FetchOutcome, Fetcher, HttpSource,
    Result, Settings,
};
use clap::Parser;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config.command, &settings).await {
        tracing::error!(
            "browscapy failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: Command, settings: &Settings) -> Result<()> {
    let storage = settings.storage();

    match command {
        Command::Fetch { force } => {
            storage.ensure_folder()?;
            let source = HttpSource::new(settings.source_url(), settings.request_timeout())?;
            match Fetcher::new(&storage, &source).force(force).update().await? {
                FetchOutcome::Downloaded { path, bytes, .. } => {
                    println!("Downloaded {} ({} bytes)", path, bytes);
                }
                FetchOutcome::UpToDate => println!("browscap.csv is up to date"),
            }
        }
        Command::Convert => {
            storage.ensure_folder()?;
            let summary = convert(&storage).await?;
            println!(
                "Converted {} patterns ({} duplicates skipped)",
                summary.patterns, summary.duplicates
            );
        }
        Command::Search { user_agents } => {
            let searcher = Browscapy::open(&storage)
                .await?
                .with_case_insensitive_fallback(settings.case_insensitive_fallback());
            for user_agent in &user_agents {
                let result = searcher.lookup(user_agent)?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Command::Bench { .. } => {
            let monitor_enabled = settings.monitoring_enabled();
            if monitor_enabled {
                tracing::info!("System monitoring enabled");
            }
            let searcher = Browscapy::open(&storage)
                .await?
                .with_case_insensitive_fallback(settings.case_insensitive_fallback());
            let report = BenchRunner::new_with_monitoring(searcher, monitor_enabled).run_stdio()?;
            tracing::info!("{} lines, {} matched", report.lines, report.matched);
        }
        Command::Stats => {
            let searcher = Browscapy::open(&storage).await?;
            let database = searcher.database();
            let stats = database.tree.stats();
            if let Some(version) = &database.version {
                println!("Browscap version {} ({})", version.version, version.released);
            }
            println!("{} nodes in total:", stats.nodes);
            println!("{} browscap patterns.", stats.full);
            println!(" {} partial nodes created.", stats.partial);
            println!(" {} levels deep.", stats.max_depth);
        }
    }

    Ok(())
}
