// tapehost: Runtime Harness for Brainfuck Programs

use log::{LevelFilter, Log, Metadata, Record};
use std::time::Instant;

use tapehost::runtime::config::{Addressing, EofPolicy, HarnessConfig, IoMode};
use tapehost::runtime::harness::Harness;

/// Command-line options
#[derive(Debug, Default)]
struct Options {
    config: HarnessConfig,
    verbose: bool,
    profile: bool,
    time: bool,
    help: bool,
    source_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "-v" | "--verbose" => options.verbose = true,
            "-p" | "--profile" => options.profile = true,
            "-t" | "--time" => options.time = true,
            "--checked" => {
                options.config = options.config.with_addressing(Addressing::Checked);
            }
            "--raw-tty" => {
                options.config = options.config.with_io_mode(IoMode::RawTerminal);
            }
            "--eof-limit" => {
                // Optional limit: a following number is taken as N
                let policy = match iter.next_if(|next| parse_count(next).is_ok()) {
                    Some(value) => EofPolicy::AbortAfter(parse_limit(value)?),
                    None => EofPolicy::abort_default(),
                };
                options.config = options.config.with_eof_policy(policy);
            }
            "--tape-size" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--tape-size requires a value".to_string())?;
                let size = parse_count(value)?;
                options.config = options.config.with_tape_size(size);
            }
            other => {
                if let Some(value) = other.strip_prefix("--eof-limit=") {
                    let limit = parse_limit(value)?;
                    options.config = options
                        .config
                        .with_eof_policy(EofPolicy::AbortAfter(limit));
                } else if other.starts_with('-') {
                    return Err(format!("Unknown option '{}'", other));
                } else if options.source_path.is_none() {
                    options.source_path = Some(other.to_string());
                } else {
                    return Err(format!("Unexpected argument '{}'", other));
                }
            }
        }
    }

    Ok(options)
}

fn parse_count(value: &str) -> Result<usize, String> {
    value
        .replace('_', "")
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", value))
}

fn parse_limit(value: &str) -> Result<u32, String> {
    u32::try_from(parse_count(value)?).map_err(|_| format!("EOF limit '{}' is too large", value))
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [options] <file.bf>", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tape-size N     Tape size in bytes (default 4000000)");
    eprintln!("  --checked         Stop the program when it moves off the tape");
    eprintln!("  --raw-tty         Put an interactive terminal into raw mode");
    eprintln!("  --eof-limit [N]   Exit after more than N consecutive reads at end of input (default 50)");
    eprintln!("  -p, --profile     Print per-operation execution counts (interpreter only)");
    eprintln!("  -t, --time        Print execution time");
    eprintln!("  -v, --verbose     Log harness lifecycle to stderr");
    eprintln!("  -h, --help        Show this message");
}

/// Minimal stderr logger installed by `--verbose`
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("tapehost");

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_usage(program_name);
        return Ok(());
    }

    if options.verbose {
        log::set_logger(&LOGGER)?;
        log::set_max_level(LevelFilter::Debug);
    }

    let harness = Harness::new(options.config);
    let start = Instant::now();
    run(&harness, &options, program_name)?;

    if options.time {
        eprintln!("Execution time: {:.6}s", start.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Host the compiled `bf_main` linked into this binary
#[cfg(feature = "linked-entry")]
fn run(
    harness: &Harness,
    options: &Options,
    _program_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if options.profile {
        log::warn!("Profiling is only available for the interpreter");
    }
    let mut entry = tapehost::runtime::ffi::linked_entry();
    if let Err(e) = harness.run_stdio(&mut entry) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

/// Host the reference interpreter on a Brainfuck source file
#[cfg(not(feature = "linked-entry"))]
fn run(
    harness: &Harness,
    options: &Options,
    program_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::fs;
    use std::io;
    use std::path::Path;
    use tapehost::program::{interp::Interpreter, Program};

    let Some(source_path) = options.source_path.as_deref() else {
        eprintln!("Error: No input file provided");
        eprintln!();
        print_usage(program_name);
        std::process::exit(1);
    };

    if !Path::new(source_path).exists() {
        eprintln!("Error: File '{}' not found", source_path);
        std::process::exit(1);
    }

    let source = fs::read(source_path)?;
    let program = match Program::new(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new(program);
    if let Err(e) = harness.run_stdio(&mut interpreter) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if options.profile {
        interpreter.write_profile(&mut io::stderr())?;
    }

    if let Some(fault) = interpreter.fault() {
        eprintln!("Runtime error: {}", fault);
        std::process::exit(1);
    }

    Ok(())
}
