use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use codec::{Codec, CodecConfig, MapOrder, TrailingBytes};
use compak_tools::{
    format_hex, format_pretty, format_schema_report, json_to_value, schema_report, value_to_json,
};
use glob::Pattern;
use log::{debug, info, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use schema::Registry;

#[derive(Parser)]
#[command(
    name = "compak-tools",
    version,
    about = "compak schema, encoding and decoding tools"
)]
struct Cli {
    /// Log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(flatten)]
    codec: CodecArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CodecArgs {
    /// Maximum nesting depth accepted while encoding or decoding.
    #[arg(long, global = true)]
    max_depth: Option<usize>,
    /// Sort map entries by encoded key bytes when encoding.
    #[arg(long, global = true)]
    canonical_maps: bool,
    /// Accept input with bytes left after the decoded value.
    #[arg(long, global = true)]
    allow_trailing: bool,
}

impl CodecArgs {
    fn config(&self) -> CodecConfig {
        let mut config = CodecConfig::default();
        if let Some(max_depth) = self.max_depth {
            config.limits.max_depth = max_depth;
        }
        if self.canonical_maps {
            config = config.with_map_order(MapOrder::Canonical);
        }
        if self.allow_trailing {
            config = config.with_trailing_bytes(TrailingBytes::Allow);
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON value into bytes.
    Encode {
        /// Schema JSON describing the registry.
        #[arg(long)]
        schema: PathBuf,
        /// Registered type to encode as.
        #[arg(long = "type")]
        type_name: String,
        /// JSON input file (stdin when omitted).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output file (stdout when omitted).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write hex text instead of raw bytes.
        #[arg(long)]
        hex: bool,
    },
    /// Decode bytes into JSON or a readable tree.
    Decode {
        /// File of encoded bytes, or a directory of them.
        path: PathBuf,
        /// Schema JSON describing the registry.
        #[arg(long)]
        schema: PathBuf,
        /// Registered type to decode as.
        #[arg(long = "type")]
        type_name: String,
        /// Optional glob filter when decoding a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
    },
    /// Check a JSON value against a type without writing anything.
    Check {
        /// JSON value file.
        value: PathBuf,
        /// Schema JSON describing the registry.
        #[arg(long)]
        schema: PathBuf,
        /// Registered type to check against.
        #[arg(long = "type")]
        type_name: String,
    },
    /// Summarize a schema: types, variant ordinals and fingerprint.
    Schema {
        /// Schema JSON describing the registry.
        schema: PathBuf,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let config = cli.codec.config();
    match cli.command {
        Command::Encode {
            schema,
            type_name,
            input,
            output,
            hex,
        } => {
            let registry = load_registry(&schema).context("load schema")?;
            let json = read_json(input.as_deref())?;
            let value = json_to_value(&registry, &type_name, &json)?;
            let bytes = Codec::with_config(&registry, config)
                .encode(&type_name, &value)
                .with_context(|| format!("encode {type_name}"))?;
            info!("encoded {type_name} into {} bytes", bytes.len());
            let data = if hex {
                format!("{}\n", format_hex(&bytes)).into_bytes()
            } else {
                bytes
            };
            match output {
                Some(path) => {
                    fs::write(&path, data).with_context(|| format!("write {}", path.display()))?;
                }
                None => io::stdout().write_all(&data).context("write stdout")?,
            }
        }
        Command::Decode {
            path,
            schema,
            type_name,
            glob,
            format,
        } => {
            let registry = load_registry(&schema).context("load schema")?;
            let codec = Codec::with_config(&registry, config);
            if path.is_dir() {
                let entries = collect_input_entries(&path, glob.as_deref())?;
                info!("decoding {} files from {}", entries.len(), path.display());
                for entry in entries {
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    decode_file(&codec, &type_name, &entry.path, format)?;
                }
            } else {
                decode_file(&codec, &type_name, &path, format)?;
            }
        }
        Command::Check {
            value,
            schema,
            type_name,
        } => {
            let registry = load_registry(&schema).context("load schema")?;
            let json = read_json(Some(value.as_path()))?;
            let value = json_to_value(&registry, &type_name, &json)?;
            let codec = Codec::with_config(&registry, config);
            codec
                .check(&type_name, &value)
                .with_context(|| format!("check {type_name}"))?;
            let bytes = codec.encode(&type_name, &value)?;
            println!("ok: {type_name} ({} bytes encoded)", bytes.len());
        }
        Command::Schema { schema, json } => {
            let registry = load_registry(&schema).context("load schema")?;
            let report = schema_report(&registry);
            if json {
                let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                println!("{json}");
            } else {
                print!("{}", format_schema_report(&report));
            }
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn load_registry(path: &Path) -> Result<Registry> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    // Deserializing a registry validates it.
    let registry: Registry = serde_json::from_str(&contents).context("parse schema json")?;
    debug!("loaded {} types from {}", registry.len(), path.display());
    Ok(registry)
}

fn read_json(path: Option<&Path>) -> Result<serde_json::Value> {
    let contents = match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read value {}", path.display()))?
        }
        None => {
            let mut contents = String::new();
            io::stdin()
                .read_to_string(&mut contents)
                .context("read stdin")?;
            contents
        }
    };
    serde_json::from_str(&contents).context("parse value json")
}

fn decode_file(
    codec: &Codec<'_>,
    type_name: &str,
    path: &Path,
    format: DecodeFormat,
) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read input {}", path.display()))?;
    let value = codec
        .decode(type_name, &bytes)
        .map_err(|err| anyhow!("decode {type_name} from {}: {err}", path.display()))?;
    match format {
        DecodeFormat::Json => {
            let json =
                serde_json::to_string_pretty(&value_to_json(&value)).context("serialize json")?;
            println!("{json}");
        }
        DecodeFormat::Pretty => println!("{}", format_pretty(&value)),
    }
    Ok(())
}

struct InputEntry {
    path: PathBuf,
    size: u64,
}

fn collect_input_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<InputEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(InputEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
