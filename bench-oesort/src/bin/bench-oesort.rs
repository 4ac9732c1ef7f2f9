// Main file for the odd-even sort benchmark.
// One sub-command per engine:
// - seq      (reference, single thread)
// - static   (persistent pool, fixed blocks)
// - dynamic  (persistent pool, chunk dispenser)
// - rayon    (parallel map-reduce, block / cyclic / dynamic tasks)
use bench_oesort::common::{cli, generators, utils};
use chrono::Utc;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{error, info};
use oesort::is_sorted;
use serde_json::{json, Map};

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

// malformed invocations exit with -1 after printing the usage
fn usage_exit() -> ! {
    let _ = cli::BenchmarkCli::command().print_help();
    std::process::exit(-1);
}

fn parse_args() -> cli::BenchmarkCli {
    match cli::BenchmarkCli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(-1);
        }
    }
}

fn main() {
    utils::init_logging("info");
    let args = parse_args();
    let engine = match args.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            usage_exit();
        }
    };
    let metrics_recorder = if args.output.is_empty() {
        None
    } else {
        match utils::MetricsRecorder::new() {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                error!("Failed to install metrics recorder: {}", e);
                std::process::exit(1);
            }
        }
    };

    let mut generator = generators::from_args(args.seed, args.niter);
    let mut data = generator.generate(args.elements);
    info!(
        "Sorting {} elements ({}) with the {} engine",
        args.elements,
        generator.get_name(),
        engine.name()
    );

    let run_start_ts = Utc::now();
    let report = match engine.sort(&mut data) {
        Ok(report) => report,
        Err(e) => {
            error!("Sort failed: {}", e);
            std::process::exit(1);
        }
    };
    let run_end_ts = Utc::now();

    println!(
        "Total time with {} workers: {:.3} msecs",
        report.workers,
        report.elapsed.as_secs_f64() * 1000.0
    );
    println!(
        "Iterations: {} ({:.3} usecs per iteration)",
        report.iterations,
        report.usecs_per_iteration()
    );
    if args.stats {
        report.log_summary();
    }

    // Just to make sure it works for larger inputs
    if !is_sorted(&data) {
        error!("Output of the {} engine is not sorted", engine.name());
        std::process::exit(1);
    }

    if let Some(recorder) = metrics_recorder {
        report.record_metrics();
        let mut header = Map::new();
        header.insert("cli".to_string(), json!(args));
        header.insert("generator".to_string(), json!(generator.get_name()));
        header.insert(
            "command".to_string(),
            json!(std::env::args().collect::<Vec<_>>().join(" ")),
        );
        header.insert(
            "timestamps".to_string(),
            json!({
                "start": run_start_ts.to_rfc3339(),
                "end": run_end_ts.to_rfc3339(),
            }),
        );
        header.insert("iterations".to_string(), json!(report.iterations));
        info!("Dumping metrics to {}", args.output);
        if let Err(e) = recorder.dump(&args.output, header) {
            error!("Failed to write metrics to {}: {}", args.output, e);
            std::process::exit(1);
        }
    }
}
