mod report;

use clap::{Parser, Subcommand};
use pocsag_core::{BaudRate, DecodedMessage, Decoder, Encoder, FunctionCode, Message, ModemConfig};
use report::{BurstEntry, DecodeReport, EncodeReport, MessageKind};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Build metadata, fixed at compile time
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
    git_commit: &'static str,
    build_time: &'static str,
}

const BUILD_INFO: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    description: env!("CARGO_PKG_DESCRIPTION"),
    git_commit: match option_env!("POCSAG_GIT_COMMIT") {
        Some(commit) => commit,
        None => "unknown",
    },
    build_time: match option_env!("POCSAG_BUILD_TIME") {
        Some(time) => time,
        None => "unknown",
    },
};

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} v{}", self.name, self.version)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "Build Time: {}", self.build_time)?;
        write!(f, "Git Commit: {}", self.git_commit)
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("burst entry {index}: {source}")]
    BurstEntry {
        index: usize,
        source: pocsag_core::PocsagError,
    },

    #[error("burst file {0} contains no messages")]
    EmptyBurst(PathBuf),
}

#[derive(Parser)]
#[command(name = "pocsag")]
#[command(version, about = "POCSAG pager encoder/decoder (WAV audio)")]
struct Cli {
    /// Log codec internals (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one page to a WAV file
    Encode {
        /// Pager address (RIC), a multiple of 8
        #[arg(short, long)]
        address: u32,

        /// Message text
        #[arg(short, long)]
        message: String,

        /// Message type: 0 = numeric, 3 = alphanumeric
        #[arg(short, long, default_value = "3", value_parser = parse_function)]
        function: FunctionCode,

        /// Baud rate: 512, 1200 or 2400
        #[arg(short, long, default_value = "1200", value_parser = parse_baud)]
        baud: BaudRate,

        /// Output WAV file
        #[arg(short, long, default_value = "output.wav")]
        output: PathBuf,

        /// Print the result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Encode several pages from a JSON list into one WAV file
    Burst {
        /// JSON file: [{"address": 123456, "message": "HI", "function": 3}, ...]
        #[arg(short, long, value_name = "MESSAGES.JSON")]
        json_input: PathBuf,

        /// Baud rate: 512, 1200 or 2400
        #[arg(short, long, default_value = "1200", value_parser = parse_baud)]
        baud: BaudRate,

        /// Output WAV file
        #[arg(short, long, default_value = "burst.wav")]
        output: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode pages from a WAV file
    Decode {
        /// Input WAV file
        #[arg(short, long, value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Baud rate: 512, 1200 or 2400
        #[arg(short, long, default_value = "1200", value_parser = parse_baud)]
        baud: BaudRate,

        /// Print the result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show build information
    Version,
}

fn parse_baud(value: &str) -> Result<BaudRate, String> {
    let rate: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    BaudRate::try_from(rate).map_err(|e| e.to_string())
}

fn parse_function(value: &str) -> Result<FunctionCode, String> {
    let code: u8 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    match FunctionCode::try_from(code).map_err(|e| e.to_string())? {
        function if function.is_tone_only() => Err(format!(
            "function {} is tone-only and not supported (use 0 or 3)",
            code
        )),
        function => Ok(function),
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Encode {
            address,
            message,
            function,
            baud,
            output,
            json,
        } => {
            let messages = [Message::new(address, message, function)];
            encode_command(&messages, baud, &output, json)
        }
        Commands::Burst {
            json_input,
            baud,
            output,
            json,
        } => {
            let messages = read_burst(&json_input)?;
            encode_command(&messages, baud, &output, json)
        }
        Commands::Decode { input, baud, json } => decode_command(&input, baud, json),
        Commands::Version => {
            println!("{}", BUILD_INFO);
            Ok(())
        }
    }
}

fn read_burst(path: &Path) -> Result<Vec<Message>, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)?;
    let entries: Vec<BurstEntry> = serde_json::from_str(&data)?;
    if entries.is_empty() {
        return Err(CliError::EmptyBurst(path.to_path_buf()).into());
    }

    let messages = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let function = FunctionCode::try_from(entry.function)
                .map_err(|source| CliError::BurstEntry { index, source })?;
            Ok(Message::new(entry.address, entry.message, function))
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    log::debug!("read {} messages from {}", messages.len(), path.display());
    Ok(messages)
}

fn encode_command(
    messages: &[Message],
    baud: BaudRate,
    output_path: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let encoder = Encoder::new(ModemConfig::with_baud_rate(baud));
    let wav = encoder.encode(messages)?;
    std::fs::write(output_path, &wav)?;
    let baud = encoder.config().baud_rate;

    if json {
        let report = EncodeReport::new(output_path.display().to_string(), baud, wav.len(), messages);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Encoded {} message(s) at {} baud to {} ({} bytes)",
        messages.len(),
        baud,
        output_path.display(),
        wav.len()
    );
    for (i, message) in messages.iter().enumerate() {
        let kind = MessageKind::from_numeric(message.encoding().is_numeric());
        println!(
            "   {}. Address: {}, Function: {}, Type: {}, Message: {}",
            i + 1,
            message.address,
            message.function.as_u8(),
            kind.label(),
            message.text
        );
    }
    println!(
        "\nTest with: multimon-ng -t wav -a {} {}",
        baud.multimon_mode(),
        output_path.display()
    );

    Ok(())
}

fn decode_command(input_path: &Path, baud: BaudRate, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input_path)?;
    let decoder = Decoder::new(ModemConfig::with_baud_rate(baud));
    let messages = decode_wav(&decoder, &data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&DecodeReport::new(baud, &messages))?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("No messages found (tried {} baud)", baud);
        return Ok(());
    }

    println!("{}: Decoded {} message(s):", baud.multimon_mode(), messages.len());
    for message in &messages {
        println!("{}", message);
    }
    Ok(())
}

/// Canonical 48 kHz mono 16-bit files (and anything hound can't parse) go
/// straight to the fixed-header decoder; other layouts are read with hound and
/// brought onto the 48 kHz carrier first.
fn decode_wav(decoder: &Decoder, data: &[u8]) -> Result<Vec<DecodedMessage>, Box<dyn std::error::Error>> {
    let reader = match hound::WavReader::new(Cursor::new(data)) {
        Ok(reader) => reader,
        Err(e) => {
            log::debug!("hound could not parse the header ({}), using fixed 44-byte layout", e);
            return Ok(decoder.decode(data)?);
        }
    };

    let spec = reader.spec();
    log::debug!(
        "WAV: {} Hz, {} channels, {} bits {:?}",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let canonical = spec.sample_rate == pocsag_core::SAMPLE_RATE
        && spec.channels == 1
        && spec.bits_per_sample == 16
        && spec.sample_format == hound::SampleFormat::Int;
    if canonical && data.len() >= pocsag_core::WAV_HEADER_SIZE && &data[36..40] == b"data" {
        return Ok(decoder.decode(data)?);
    }

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let shift = spec.bits_per_sample.saturating_sub(16);
            let widen = 16u16.saturating_sub(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| ((v >> shift) << widen) as i16))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()?,
    };

    Ok(decoder.decode_pcm(&samples, spec.sample_rate, spec.channels)?)
}
