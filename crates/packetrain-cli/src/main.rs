use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use packetrain_core::{
    CaptureFile, CaptureOrigin, DEFAULT_EXAMPLE_PATH, DEFAULT_SYNTH_PACKETS, IdGenerator,
    LoadedCapture, Packet, RandomIds, SourceError, load_capture, load_capture_limited,
    load_example, summarize, synthesize,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PACKETRAIN_BUILD_COMMIT"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "packetrain")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode classic libpcap captures into structured JSON packet lists.",
    long_about = None,
    after_help = "Examples:\n  packetrain pcap decode capture.pcap -o packets.json\n  packetrain pcap decode --stdout --pretty\n  packetrain pcap summary capture.pcap\n  packetrain synth --count 50 --seed 7"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on classic .pcap inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Emit synthetic packets as JSON on stdout.
    Synth {
        /// Number of packets to generate
        #[arg(long, default_value_t = DEFAULT_SYNTH_PACKETS)]
        count: usize,

        /// Seed for reproducible packets and ids
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode a capture into a packet list (falls back to the example capture,
    /// then to synthetic packets, when no input is given).
    #[command(
        after_help = "Examples:\n  packetrain pcap decode capture.pcap -o packets.json\n  packetrain pcap decode 'captures/*.pcap' --stdout\n  packetrain pcap decode --stdout --example-path pcaps/sample.pcap"
    )]
    Decode {
        /// Path (or glob matching exactly one file) to a .pcap capture
        input: Option<PathBuf>,

        /// Output path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Override the packet cap for this run
        #[arg(long)]
        max_packets: Option<usize>,

        /// Seed for reproducible packet ids (and synthetic packets)
        #[arg(long)]
        seed: Option<u64>,

        /// Example capture tried when no input is given
        #[arg(long, default_value = DEFAULT_EXAMPLE_PATH)]
        example_path: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print protocol counts and time bounds of a capture.
    Summary {
        /// Path (or glob matching exactly one file) to a .pcap capture
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

struct DecodeArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    max_packets: Option<usize>,
    seed: Option<u64>,
    example_path: PathBuf,
    quiet: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Decode {
                input,
                output,
                stdout,
                pretty,
                compact: _,
                max_packets,
                seed,
                example_path,
                quiet,
            } => cmd_pcap_decode(DecodeArgs {
                input,
                output,
                stdout,
                pretty,
                max_packets,
                seed,
                example_path,
                quiet,
            }),
            PcapCommands::Summary { input, pretty } => cmd_pcap_summary(input, pretty),
        },
        Commands::Synth {
            count,
            seed,
            pretty,
        } => cmd_synth(count, seed, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

/// JSON document written by `pcap decode`.
#[derive(Debug, Serialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
enum DecodeOutput {
    Example { capture: CaptureFile },
    Upload { capture: CaptureFile },
    Synthetic { packets: Vec<Packet> },
}

impl From<LoadedCapture> for DecodeOutput {
    fn from(loaded: LoadedCapture) -> Self {
        match loaded.origin {
            CaptureOrigin::Example => DecodeOutput::Example {
                capture: loaded.capture,
            },
            CaptureOrigin::Upload => DecodeOutput::Upload {
                capture: loaded.capture,
            },
        }
    }
}

impl DecodeOutput {
    fn packet_count(&self) -> usize {
        match self {
            DecodeOutput::Example { capture } | DecodeOutput::Upload { capture } => {
                capture.packets.len()
            }
            DecodeOutput::Synthetic { packets } => packets.len(),
        }
    }

    fn origin_label(&self) -> &'static str {
        match self {
            DecodeOutput::Example { .. } => "example",
            DecodeOutput::Upload { .. } => "upload",
            DecodeOutput::Synthetic { .. } => "synthetic",
        }
    }
}

fn cmd_pcap_decode(args: DecodeArgs) -> Result<(), CliError> {
    let output_path = if args.stdout {
        None
    } else {
        Some(args.output.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    let mut ids = id_generator(args.seed);
    let document = match args.input.as_deref() {
        Some(input) => {
            let resolved = resolve_input_path(input)?;
            validate_input_file(&resolved)?;
            if let Some(output) = output_path.as_deref() {
                ensure_distinct_paths(&resolved, output)?;
            }
            let loaded = read_upload(&resolved, args.max_packets, &mut *ids)?;
            DecodeOutput::from(loaded)
        }
        None => decode_without_input(&args, &mut *ids),
    };
    info!(
        origin = document.origin_label(),
        packets = document.packet_count(),
        "decode finished"
    );

    let json = serialize_json(&document, args.pretty)?;
    let Some(output) = output_path else {
        print!("{}", json);
        return Ok(());
    };

    write_output(&output, &json)?;
    if !args.quiet {
        eprintln!(
            "OK: {} packets ({}) written -> {}",
            document.packet_count(),
            document.origin_label(),
            output.display()
        );
    }
    Ok(())
}

fn decode_without_input(args: &DecodeArgs, ids: &mut dyn IdGenerator) -> DecodeOutput {
    let example = match args.max_packets {
        Some(limit) => {
            load_capture_limited(&args.example_path, CaptureOrigin::Example, limit, &mut *ids)
                .map_err(|err| debug!(error = %err, "example capture unavailable"))
                .ok()
        }
        None => load_example(&args.example_path, &mut *ids),
    };
    if let Some(loaded) = example {
        return DecodeOutput::from(loaded);
    }

    let count = args.max_packets.unwrap_or(DEFAULT_SYNTH_PACKETS);
    debug!(count, "no capture available, synthesizing packets");
    DecodeOutput::Synthetic {
        packets: synthesize_packets(count, args.seed, ids),
    }
}

fn read_upload(
    path: &Path,
    max_packets: Option<usize>,
    ids: &mut dyn IdGenerator,
) -> Result<LoadedCapture, CliError> {
    let loaded = match max_packets {
        Some(limit) => load_capture_limited(path, CaptureOrigin::Upload, limit, ids),
        None => load_capture(path, CaptureOrigin::Upload, ids),
    };
    loaded.map_err(|err| source_error(path, err))
}

fn source_error(path: &Path, err: SourceError) -> CliError {
    match err {
        SourceError::Io(err) => CliError::new(
            format!("failed to read input file {}: {}", path.display(), err),
            Some("check the path and file permissions".to_string()),
        ),
        SourceError::Format(err) => CliError::new(
            format!("cannot decode {}: {}", path.display(), err),
            Some("expected a classic libpcap capture (pcapng is not supported)".to_string()),
        ),
    }
}

fn cmd_pcap_summary(input: PathBuf, pretty: bool) -> Result<(), CliError> {
    let resolved = resolve_input_path(&input)?;
    validate_input_file(&resolved)?;
    let mut ids = id_generator(None);
    let loaded = read_upload(&resolved, None, &mut *ids)?;
    let summary = summarize(&loaded.capture);
    let json = serialize_json(&summary, pretty)?;
    println!("{}", json);
    Ok(())
}

fn cmd_synth(count: usize, seed: Option<u64>, pretty: bool) -> Result<(), CliError> {
    let mut ids = id_generator(seed);
    let packets = synthesize_packets(count, seed, &mut *ids);
    let json = serialize_json(&packets, pretty)?;
    println!("{}", json);
    Ok(())
}

fn id_generator(seed: Option<u64>) -> Box<dyn IdGenerator> {
    match seed {
        Some(seed) => Box::new(RandomIds::seeded(seed)),
        None => Box::new(RandomIds::new()),
    }
}

fn synthesize_packets(count: usize, seed: Option<u64>, ids: &mut dyn IdGenerator) -> Vec<Packet> {
    let now = now_millis();
    match seed {
        // Packet content and ids draw from separate streams.
        Some(seed) => synthesize(count, now, &mut StdRng::seed_from_u64(seed ^ 0x5eed), ids),
        None => synthesize(count, now, &mut rand::thread_rng(), ids),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

fn serialize_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn write_output(path: &Path, json: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write output: {}", path.display()))?;
    Ok(())
}

fn ensure_distinct_paths(input: &Path, output: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(parent_abs) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let Some(file_name) = output.file_name() else {
        return Err(CliError::new(
            format!("invalid output path: {}", output.display()),
            Some("name a file, not a directory".to_string()),
        ));
    };
    if parent_abs.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("output path must differ from input: {}", output.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass an existing .pcap file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass an existing .pcap file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a classic .pcap file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        total => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if total > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, total, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
