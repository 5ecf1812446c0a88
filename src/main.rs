mod config;
mod error;
mod framerate;
mod locator;
mod processor;
mod rescaler;
mod serialiser;
mod timestamp;

use crate::config::{Config, DEFAULT_FRAME_RATE, DEFAULT_OUTPUT};
use crate::framerate::{FrameRate, COMMON_FRAME_RATES};

use std::ffi::OsString;
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

fn main() {
    let cli = Cli::parse_from(normalise_args(std::env::args_os()));
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            process::exit(1);
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Retime SRT subtitles from one frame rate to another")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The subtitle file to read from. Use '-' to read from standard input.",
        required_unless_present = "list_rates",
        allow_hyphen_values = true
    )]
    input: Option<String>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. Use '-' to write to standard output.",
        default_value = DEFAULT_OUTPUT,
        allow_hyphen_values = true
    )]
    output: String,
    #[arg(
        long = "if",
        visible_alias = "from-fps",
        value_name = "RATE",
        help = "Frame rate the subtitles were timed for, e.g. 23.976 or 24000/1001. Also accepted as -if.",
        default_value = DEFAULT_FRAME_RATE
    )]
    source_rate: FrameRate,
    #[arg(
        long = "of",
        visible_alias = "to-fps",
        value_name = "RATE",
        help = "Frame rate of the video the subtitles should match. Also accepted as -of.",
        default_value = DEFAULT_FRAME_RATE
    )]
    target_rate: FrameRate,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Log more details to stderr. Repeat for more."
    )]
    verbose: u8,
    #[arg(long, help = "List common video frame rates and exit.")]
    list_rates: bool,
}

/// Options whose value is the following argument.
const VALUE_FLAGS: &[&str] = &[
    "-i", "--input", "-o", "--output", "--if", "--of", "--from-fps", "--to-fps",
];

/// Turns the single-dash `-if` and `-of` spellings (also `-if=25` and
/// `-if25`) into `--if` and `--of`, which clap would otherwise read as
/// `-i f` and `-o f`. Values of other options and anything after `--` are
/// left alone.
fn normalise_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut next_is_value = false;
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            if next_is_value || after_separator {
                next_is_value = false;
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                after_separator = true;
                return arg;
            }
            let (normalised, takes_value) = normalise_arg(s);
            next_is_value = takes_value;
            normalised.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

/// The rewritten argument, if any, and whether the next argument is its value.
fn normalise_arg(arg: &str) -> (Option<String>, bool) {
    for flag in ["-if", "-of"] {
        let Some(rest) = arg.strip_prefix(flag) else {
            continue;
        };
        if rest.is_empty() {
            return (Some(format!("-{}", flag)), true);
        }
        if let Some(value) = rest.strip_prefix('=') {
            return (Some(format!("-{}={}", flag, value)), false);
        }
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return (Some(format!("-{}={}", flag, rest)), false);
        }
    }
    (None, VALUE_FLAGS.contains(&arg))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_rates {
        print_frame_rates();
        return Ok(());
    }

    let input = cli.input.ok_or_else(|| anyhow!("No input file given"))?;
    let config = Config {
        output: cli.output,
        source_rate: cli.source_rate,
        target_rate: cli.target_rate,
        ..Config::new(input)
    };
    retime(&config)
}

fn retime(config: &Config) -> Result<()> {
    let rescaler = config.rescaler();
    info!(
        "Retiming '{}' from {} fps to {} fps (ratio {:.6})",
        config.input,
        rescaler.source(),
        rescaler.target(),
        rescaler.ratio()
    );
    if rescaler.is_identity() {
        info!("Source and target frame rates are equal; timestamps will not change");
    }

    let data = serialiser::read_document(&config.input)?;
    let retimed = processor::process(&data, &rescaler)
        .context(format!("Failed to retime subtitles: '{}'", config.input))?;
    serialiser::write_document(&config.output, &retimed.text)?;

    info!(
        "Rescaled {} timestamps into '{}'",
        retimed.count, config.output
    );
    if retimed.out_of_range > 0 {
        info!(
            "{} timestamps had minutes or seconds above 59",
            retimed.out_of_range
        );
    }
    Ok(())
}

fn print_frame_rates() {
    println!("Common video frame rates:");
    for (rate, description) in COMMON_FRAME_RATES {
        println!("  {:>7} fps - {}", rate, description);
    }
    println!();
    println!("Exact NTSC rates can be given as fractions, e.g. 24000/1001 or 30000/1001.");
}
