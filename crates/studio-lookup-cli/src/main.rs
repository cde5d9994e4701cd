//! studio-lookup CLI - latest Android Studio download metadata

mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::time::Duration;
use studio_lookup::{
    ExtractionRequest, ExtractionResult, TargetOs, Tool, Utility, DEFAULT_SOURCE_URL, TOOL_LLMTXT,
};
use tracing_subscriber::EnvFilter;

/// Output format for lookup subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// JSON object
    #[default]
    Json,
    /// `key: value` lines
    Text,
    /// version, url, filename, checksum joined by --delimiter
    Delimited,
}

/// Target operating system
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OsArg {
    Chromeos,
    #[default]
    Linux,
    Mac,
    #[value(name = "mac_arm")]
    MacArm,
    Windows,
}

impl From<OsArg> for TargetOs {
    fn from(os: OsArg) -> Self {
        match os {
            OsArg::Chromeos => TargetOs::ChromeOs,
            OsArg::Linux => TargetOs::Linux,
            OsArg::Mac => TargetOs::Mac,
            OsArg::MacArm => TargetOs::MacArm,
            OsArg::Windows => TargetOs::Windows,
        }
    }
}

/// Full studio suite or command line tools
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum UtilityArg {
    #[default]
    Studio,
    Cli,
}

impl From<UtilityArg> for Utility {
    fn from(utility: UtilityArg) -> Self {
        match utility {
            UtilityArg::Studio => Utility::Studio,
            UtilityArg::Cli => Utility::Cli,
        }
    }
}

/// Get download URL, version, and checksum from the Android developer site
#[derive(Parser, Debug)]
#[command(name = "studio-lookup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    /// Log progress to stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Look up the latest download for one OS and utility
    Lookup {
        /// Operating system to filter on
        #[arg(long = "os", short = 'o', value_enum, default_value_t = OsArg::Linux)]
        os: OsArg,

        /// Command line utilities or full studio suite
        #[arg(long, short, value_enum, default_value_t = UtilityArg::Studio)]
        utility: UtilityArg,

        /// Page to scan
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Total time allowed for reading the page body, in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Time allowed to connect and receive the first byte, in seconds
        #[arg(long, default_value_t = 10)]
        connect_timeout: u64,

        /// Report checksum as "Unavailable" instead of failing when missing
        #[arg(long)]
        allow_missing_checksum: bool,

        /// Output format
        #[arg(long, default_value = "json")]
        output: OutputFormat,

        /// Field separator for delimited output
        #[arg(long, default_value = ",")]
        delimiter: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Mcp) => {
            mcp::run_server().await;
        }
        Some(Commands::Lookup {
            os,
            utility,
            source_url,
            user_agent,
            timeout,
            connect_timeout,
            allow_missing_checksum,
            output,
            delimiter,
        }) => {
            let mut builder = Tool::builder()
                .source_url(source_url)
                .body_timeout(Duration::from_secs(timeout))
                .connect_timeout(Duration::from_secs(connect_timeout))
                .allow_missing_checksum(allow_missing_checksum);

            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }

            let request = ExtractionRequest::new(os.into(), utility.into());
            run_lookup(&builder.build(), request, output, &delimiter).await;
        }
        None => {
            eprintln!("Usage: studio-lookup lookup [--os <OS>] [--utility <UTILITY>]");
            eprintln!("   or: studio-lookup mcp");
            eprintln!("   or: studio-lookup --help");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run_lookup(tool: &Tool, request: ExtractionRequest, output: OutputFormat, delimiter: &str) {
    match tool.execute(request).await {
        Ok(result) => writeln_safe(&format_result(&result, output, delimiter)),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn format_result(result: &ExtractionResult, output: OutputFormat, delimiter: &str) -> String {
    match output {
        OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_else(|e| {
            eprintln!("Error serializing result: {}", e);
            std::process::exit(1);
        }),
        OutputFormat::Text => format_text(result),
        OutputFormat::Delimited => result.to_delimited(delimiter),
    }
}

/// Format result as `key: value` lines
fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("version: {}\n", result.version));
    output.push_str(&format!("url: {}\n", result.url));
    output.push_str(&format!("filename: {}\n", result.filename));
    output.push_str(&format!("checksum: {}", result.checksum_or_unavailable()));
    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
