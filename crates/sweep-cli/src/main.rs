use clap::{Parser, Subcommand};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use sweep_harness::config::HarnessConfig;
use sweep_harness::{
    probe_corpus, sweep_corpus, FilterSet, ProbeOptions, ProcessInvoker, SweepOptions, SweepStatus,
    DEFAULT_IMAGES,
};

#[derive(Parser, Debug)]
#[command(about = "Drive the cache extractor across a corpus of shared caches", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the extractor over every cache, stopping at the first failure
    Sweep(SweepArgs),
    /// Extract one known image from every cache, best-effort
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Path to the extractor, falls back to TESTING_DYLDEX_ALL_MULTIPROCESS_PATH
    #[arg(long)]
    executable_path: Option<PathBuf>,
    /// Folder containing the caches to test, falls back to TESTING_CACHES_PATH
    #[arg(long)]
    caches_path: Option<PathBuf>,
    /// Keywords that filter out caches that should not be processed
    #[arg(long, num_args = 1..)]
    cache_filters: Vec<String>,
    /// Pause for confirmation before running each cache
    #[arg(long)]
    pause: bool,
    /// Optional TOML file with default filters and images
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Path to the extractor, falls back to TESTING_DYLDEX_PATH
    #[arg(long)]
    executable_path: Option<PathBuf>,
    /// Folder containing the caches to test, falls back to TESTING_CACHES_PATH
    #[arg(long)]
    caches_path: Option<PathBuf>,
    /// Directory extracted images are written to, falls back to TESTING_OUTPUT_DIR
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Images to try against each cache, in order
    #[arg(long, num_args = 1..)]
    images: Vec<String>,
    /// Optional TOML file with default filters and images
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    match args.command {
        Command::Sweep(sweep) => run_sweep(sweep),
        Command::Probe(probe) => run_probe(probe),
    }
}

fn run_sweep(args: SweepArgs) {
    let executable = resolve_required(
        args.executable_path,
        "--executable-path",
        "TESTING_DYLDEX_ALL_MULTIPROCESS_PATH",
    );
    let caches_path = resolve_required(args.caches_path, "--caches-path", "TESTING_CACHES_PATH");
    let config = load_config(args.config.as_deref());

    let filters = if args.cache_filters.is_empty() {
        config.cache_filters
    } else {
        args.cache_filters
    };
    let options = SweepOptions {
        executable,
        retry_jobs: default_retry_jobs(),
        pause: args.pause,
    };

    let invoker = ProcessInvoker;
    match sweep_corpus(&invoker, &options, &caches_path, FilterSet::new(filters)) {
        Ok(SweepStatus::Completed) => {}
        Ok(SweepStatus::Stopped { cache }) => {
            eprintln!("sweep stopped after failure on {}", cache.display());
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Sweep error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_probe(args: ProbeArgs) {
    let executable = resolve_required(
        args.executable_path,
        "--executable-path",
        "TESTING_DYLDEX_PATH",
    );
    let caches_path = resolve_required(args.caches_path, "--caches-path", "TESTING_CACHES_PATH");
    let output_dir = resolve_required(args.output_dir, "--output-dir", "TESTING_OUTPUT_DIR");
    let config = load_config(args.config.as_deref());

    let images = if !args.images.is_empty() {
        args.images
    } else if !config.images.is_empty() {
        config.images
    } else {
        DEFAULT_IMAGES.iter().map(|image| image.to_string()).collect()
    };

    if let Err(err) = fs::create_dir_all(&output_dir) {
        eprintln!("create output dir {}: {err}", output_dir.display());
        std::process::exit(1);
    }

    let options = ProbeOptions {
        executable,
        output_dir,
        images,
    };
    let invoker = ProcessInvoker;
    if let Err(err) = probe_corpus(&invoker, &options, &caches_path) {
        eprintln!("Probe error: {err}");
        std::process::exit(1);
    }
}

fn resolve_required(flag: Option<PathBuf>, flag_name: &str, env_key: &str) -> PathBuf {
    match flag.or_else(|| env::var_os(env_key).map(PathBuf::from)) {
        Some(path) => path,
        None => {
            eprintln!("{flag_name} or {env_key} needs to be set.");
            eprintln!("see --help for usage.");
            std::process::exit(2);
        }
    }
}

fn load_config(path: Option<&Path>) -> HarnessConfig {
    let Some(path) = path else {
        return HarnessConfig::default();
    };
    match HarnessConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

fn default_retry_jobs() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|cores| cores.get())
        .unwrap_or(2);
    (cores / 2).max(1)
}
