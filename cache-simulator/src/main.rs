use cache_simulator::generator::{self, Distribution, TraceConfig};
use cache_simulator::input::{open_trace, KeyReader};
use cache_simulator::replay::Replayer;
use cache_simulator::stats::{self, CacheShape, CsvResultRow};
use clap::{Parser, Subcommand};
use s3fifo_cache::config::S3FifoCacheConfig;
use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// S3-FIFO trace simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a key trace through the cache and report the hit ratio
    Replay {
        /// Trace file of whitespace-separated keys, or `-` for stdin
        #[arg(short, long, value_name = "FILE", default_value = "-")]
        input: PathBuf,

        /// Number of objects in the backing store; trace keys must be below it
        #[arg(long, default_value = "1000000")]
        objects: u32,

        /// Total cache slots, split by --small-percent (default: objects / 10)
        #[arg(short, long)]
        capacity: Option<usize>,

        /// Share of the slots given to the small queue
        #[arg(long, default_value = "10")]
        small_percent: u8,

        /// Small queue capacity; overrides --capacity together with --main
        #[arg(long, requires = "main")]
        small: Option<usize>,

        /// Main queue capacity; overrides --capacity together with --small
        #[arg(long, requires = "small")]
        main: Option<usize>,

        /// Ghost queue capacity (default: main capacity)
        #[arg(long)]
        ghost: Option<usize>,

        /// Frequency above which a small-queue key is promoted
        #[arg(long, default_value = "1")]
        hot_threshold: u8,

        /// Decrement frequency on promotion from small to main
        #[arg(long)]
        decrement_on_promotion: bool,

        /// Export results to CSV file
        #[arg(long, value_name = "PATH")]
        output_csv: Option<PathBuf>,
    },

    /// Generate a synthetic key trace
    Generate {
        /// Number of distinct objects
        #[arg(short = 'm', long, default_value = "1000000")]
        objects: u32,

        /// Number of requests
        #[arg(short = 'n', long, default_value = "100000000")]
        requests: u64,

        /// Zipf skew parameter
        #[arg(long, default_value = "1.0")]
        alpha: f64,

        /// Key popularity distribution
        #[arg(long, value_enum, default_value = "zipf")]
        distribution: Distribution,

        /// RNG seed for reproducible traces
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            objects,
            requests,
            alpha,
            distribution,
            seed,
            output,
        } => {
            if objects == 0 {
                return Err("--objects must be at least 1".into());
            }
            let config = TraceConfig {
                objects,
                requests,
                alpha,
                distribution,
                seed,
            };
            match output {
                Some(path) => generator::generate_trace(&config, File::create(path)?)?,
                None => generator::generate_trace(&config, io::stdout().lock())?,
            }
            Ok(())
        }

        Commands::Replay {
            input,
            objects,
            capacity,
            small_percent,
            small,
            main,
            ghost,
            hot_threshold,
            decrement_on_promotion,
            output_csv,
        } => {
            let mut config = match (small, main) {
                (Some(small), Some(main)) => S3FifoCacheConfig::new(
                    NonZeroUsize::new(small).ok_or("--small must be at least 1")?,
                    NonZeroUsize::new(main).ok_or("--main must be at least 1")?,
                ),
                _ => {
                    let total = capacity.unwrap_or(objects as usize / 10);
                    if total < 2 {
                        return Err("the cache needs at least two slots".into());
                    }
                    if small_percent > 100 {
                        return Err("--small-percent must be at most 100".into());
                    }
                    let total = NonZeroUsize::new(total).ok_or("capacity must be positive")?;
                    S3FifoCacheConfig::with_ratio(total, small_percent)
                }
            };
            if let Some(ghost) = ghost {
                config.ghost_capacity =
                    NonZeroUsize::new(ghost).ok_or("--ghost must be at least 1")?;
            }
            if hot_threshold >= s3fifo_cache::config::s3fifo::MAX_FREQUENCY {
                return Err(format!(
                    "--hot-threshold must be below {}",
                    s3fifo_cache::config::s3fifo::MAX_FREQUENCY
                )
                .into());
            }
            config.hot_threshold = hot_threshold;
            config.decrement_on_promotion = decrement_on_promotion;

            eprintln!("S3-FIFO Replay");
            eprintln!("==============");
            eprintln!("Input: {}", input.display());
            eprintln!("Store objects: {objects}");
            eprintln!(
                "Queues: small={} main={} ghost={}",
                config.small_capacity, config.main_capacity, config.ghost_capacity
            );
            eprintln!(
                "Policy: hot_threshold={} decrement_on_promotion={}",
                config.hot_threshold, config.decrement_on_promotion
            );

            let mut replayer = Replayer::new(config, objects);
            for key in KeyReader::new(open_trace(&input)?) {
                replayer.access(key?)?;
            }

            let result = replayer.result();
            stats::print_summary(&result);

            if let Some(csv_path) = output_csv {
                let shape = CacheShape {
                    small_capacity: config.small_capacity.get(),
                    main_capacity: config.main_capacity.get(),
                    ghost_capacity: config.ghost_capacity.get(),
                    hot_threshold: config.hot_threshold,
                    decrement_on_promotion: config.decrement_on_promotion,
                };
                match stats::export_csv(&csv_path, &CsvResultRow::new(shape, &result)) {
                    Ok(()) => println!("\nResults exported to: {}", csv_path.display()),
                    Err(e) => eprintln!("Failed to export CSV: {e}"),
                }
            }

            Ok(())
        }
    }
}
