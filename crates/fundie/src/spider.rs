use crate::cli::{FetchArgs, MetricArgs};
use colored::Colorize;
use fundie_spider as spider;
use fundie_spider::extract::{Extract, LabelCell};
use fundie_spider::fan_out::Runner;
use fundie_spider::metrics::{self, Matching, Metric};
use fundie_spider::registry::Registry;
use fundie_spider::source::{DirSource, HttpSource, PageSource};
use fundie_spider::tui::Progress;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Load the tickers, fetch every page, then export the merged table.
pub(crate) async fn run(args: FetchArgs, tui: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();
    let metrics = metric_list(&args.metrics);
    let output = args.output.unwrap_or_else(default_output);

    // 1. ticker registry
    let mut registry = Registry::load(&args.input).map_err(|err| {
        error!("failed to load tickers from {:?}, error({err})", &args.input);
        err
    })?;
    info!("{} tickers loaded from {:?}", registry.len(), &args.input);

    // 2. fan out over the tickers
    let extractor: Arc<dyn Extract> = Arc::new(LabelCell::new(&metrics).map_err(|err| {
        error!("failed to compile metric patterns, error({err})");
        err
    })?);
    let source: Arc<dyn PageSource> = match &args.pages {
        Some(dir) => {
            debug!("reading saved pages from {dir:?}");
            Arc::new(DirSource::new(dir))
        }
        None => {
            let client = spider::std_client_build(args.timeout.map(Duration::from_secs))?;
            Arc::new(HttpSource::new(client, args.url.as_str()))
        }
    };
    let progress = if tui {
        Progress::multi(registry.len())?
    } else {
        Progress::hidden()
    };

    let runner = Runner::new(source, extractor, metrics, args.partition).with_progress(progress);
    let summary = runner.run(&mut registry).await?;
    trace!("run summary: {summary:?}");

    // 3. export
    let names = metrics::names(runner.metrics());
    let exported = spider::export::export(&args.input, &output, &names, &registry)
        .map_err(|err| {
            error!("failed to export to {output:?}, error({err})");
            err
        })?;

    let path = std::env::current_dir()
        .map(|dir| dir.join(&output))
        .unwrap_or(output);
    info!(
        "CSV file created, check {}. {}",
        path.display(),
        spider::time_elapsed(time)
    );

    if tui {
        println!(
            "\n{} rows written to {}",
            exported.rows.to_string().green(),
            path.display().to_string().bold()
        );
        if summary.failures > 0 {
            println!(
                "{} of {} tickers could not be retrieved",
                summary.failures.to_string().red(),
                summary.tickers
            );
        }
        if exported.dropped > 0 {
            println!(
                "{} rows matched no ticker and were dropped",
                exported.dropped.to_string().yellow()
            );
        }
    }

    Ok(())
}

/// Print the metrics that `fetch` would collect, in column order.
pub(crate) fn list(args: &MetricArgs) {
    for (i, metric) in metric_list(args).iter().enumerate() {
        match metric.matching {
            Matching::Exact => println!("{:>3}  {} {}", i + 1, metric.name, "(exact)".dimmed()),
            Matching::Pattern => println!("{:>3}  {}", i + 1, metric.name),
        }
    }
}

fn metric_list(args: &MetricArgs) -> Vec<Metric> {
    let exact: Vec<String> = match &args.exact {
        Some(exact) => exact.clone(),
        None => metrics::EXACT_MATCH.iter().map(|e| e.to_string()).collect(),
    };
    match &args.metrics {
        Some(names) => metrics::build(names.as_slice(), exact.as_slice()),
        None => metrics::build(&metrics::DATA_TO_COLLECT, exact.as_slice()),
    }
}

/// `Fundamentals_yahoo <MM-DD HH_MM_SS>.csv`, stamped with the local time.
fn default_output() -> PathBuf {
    let now = chrono::Local::now().format("%m-%d %H_%M_%S");
    PathBuf::from(format!("Fundamentals_yahoo {now}.csv"))
}
