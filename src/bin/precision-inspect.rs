use clap::{Parser, Subcommand};
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use precision::bits::{bits_of, write_bits, FloatBits, FloatLayout};
use precision::codec::PriceCodec;
use precision::range::PriceRange;
use precision::tracing::start_precision_tracing_subscriber;
use rand::Rng;
use rayon::prelude::*;
use std::io;
use tracing::{debug, error, info, warn};

/// Encodes bounded prices as fixed-point integers and inspects float bit patterns.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    #[arg(long, default_value_t = 240.0, allow_negative_numbers = true)]
    /// Lower bound of the price range
    min: f64,

    #[arg(long, default_value_t = 60000.0, allow_negative_numbers = true)]
    /// Upper bound of the price range
    max: f64,

    #[arg(short, long, default_value_t = 24)]
    /// Number of fraction bits in the fixed-point encoding
    scale: u32,

    #[arg(short, long, default_value_t = 32)]
    /// Width in bits of the signed fixed-point container
    width: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a price, show its single-precision bits, and round-trip it through fixed point
    Price {
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },
    /// Show the sign, exponent and mantissa of a value
    Bits {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        #[arg(long)]
        /// Narrow the value to single precision first
        single: bool,
    },
    /// Turn a 32- or 64-digit binary string back into a float
    Parse { bits: String },
    /// Round-trip random prices from the range and report the worst error
    Sweep {
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        samples: usize,
    },
}

fn main() {
    // Initialize the tracing subscriber to handle debug, info, warn, and error macro calls
    start_precision_tracing_subscriber();

    // Parse arguments from the command line
    let args = Args::parse();

    if let Err(err) = run(args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> precision::Result<()> {
    let range = PriceRange::new(args.min, args.max)?;
    let codec = PriceCodec::new(range, args.scale, args.width)?;
    debug!("using {:?}", codec);

    match args.command {
        Command::Price { price } => inspect_price(&codec, price)?,
        Command::Bits { value, single } => {
            if single {
                print_fields(&bits_of(value as f32));
            } else {
                print_fields(&bits_of(value));
            }
        }
        Command::Parse { bits } => {
            let bits = FloatBits::parse(&bits)?;
            print_fields(&bits);
            match bits.layout() {
                FloatLayout::Binary32 => println!("value:      {:?}", bits.to_float::<f32>()),
                FloatLayout::Binary64 => println!("value:      {:?}", bits.to_float::<f64>()),
            }
        }
        Command::Sweep { samples } => sweep(&codec, samples)?,
    }
    Ok(())
}

fn inspect_price(codec: &PriceCodec, price: f64) -> precision::Result<()> {
    let normalized = codec.range.normalize(price);
    println!("normalized: {:.32}", normalized);

    let narrowed = normalized as f32;
    let bits = bits_of(narrowed);
    println!("f32 fields: {}", bits);
    write_bits(io::stdout().lock(), bits.raw(), bits.width())?;

    let fixed = codec.encode(price)?;
    let decoded = codec.decode(fixed);
    println!("fixed:      {}", fixed.raw());
    println!("decoded:    {:.32}", decoded);
    println!("error:      {:e}", (decoded - price).abs());
    Ok(())
}

fn print_fields(bits: &FloatBits) {
    let fields = [
        format!("sign={}", bits.sign()),
        format!("exponent={}", bits.exponent()),
        format!("mantissa={:#x}", bits.mantissa()),
        format!("unbiased={}", bits.unbiased_exponent()),
        format!("{:?}", bits.category()),
    ];
    println!("fields:     {}", fields.iter().join(" "));
    println!("grouped:    {}", bits);
    println!("bits:       {}", bits.render());
}

fn sweep(codec: &PriceCodec, samples: usize) -> precision::Result<()> {
    let range = codec.range;
    info!(
        "round-tripping {} prices from [{}, {}]...",
        samples,
        range.min(),
        range.max()
    );
    let max_error = (0..samples)
        .into_par_iter()
        .progress_count(samples as u64)
        .map(|_| {
            let price = rand::rng().random_range(range.min()..=range.max());
            codec.round_trip_error(price)
        })
        .try_reduce(|| 0.0, |a, b| Ok(a.max(b)))?;

    let bound = codec.error_bound();
    if max_error <= bound {
        info!("max error {:e} is within the bound {:e}", max_error, bound);
    } else {
        warn!("max error {:e} exceeds the bound {:e}", max_error, bound);
    }
    Ok(())
}
