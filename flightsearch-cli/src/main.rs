use flightsearch_cli::{run, Config};
use flightsearch_core::FlightSearch;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Verdicts go to stdout, so logs must not.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightsearch_cli=info,flightsearch_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::load()?;
    let engine = config.rule_engine()?;
    tracing::info!(
        airports = engine.airports().len(),
        today = %engine.today(),
        "Flight search validator ready"
    );

    let mut search = FlightSearch::with_engine(engine);
    let summary = run(&mut search, io::stdin().lock(), io::stdout().lock())?;
    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        malformed = summary.malformed,
        "Finished"
    );

    Ok(())
}
