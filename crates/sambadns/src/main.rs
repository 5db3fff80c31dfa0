// # sambadns - Samba AD DNS record CLI
//
// A thin front end over `sambadns-core`: parses arguments, builds a
// `samba-tool` executor, runs one resource operation and prints the
// resulting state as JSON on stdout.
//
// ## Configuration
//
// Credentials come from the environment only:
// - `SAMBADNS_USERNAME`: samba-tool username (e.g. `admin@example.com`)
// - `SAMBADNS_PASSWORD`: samba-tool password
//
// Optional:
// - `SAMBADNS_TOOL_PATH`: program to run (default `samba-tool`)
// - `SAMBADNS_TIMEOUT_SECS`: per-invocation deadline
// - `SAMBADNS_LOG_LEVEL`: trace, debug, info, warn, error (default `info`)
//
// `--tool-path` and `--timeout-secs` override the environment.
//
// ## Example
//
// ```bash
// export SAMBADNS_USERNAME=admin@example.com
// export SAMBADNS_PASSWORD=secret
//
// sambadns create --server dc1.example.com --zone example.com --name www --type A --value 10.0.0.1
// sambadns update dc1.example.com/example.com/www/A --value 10.0.0.2
// sambadns delete dc1.example.com/example.com/www/A
// ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use sambadns_core::{
    RecordId, RecordResource, RecordSpec, RecordSynchronizer, RecordType, ResourceState,
    SambaDnsConfig,
};
use sambadns_tool::SambaToolExecutor;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the possible outcomes
///
/// - 0: Operation succeeded
/// - 1: Configuration error
/// - 2: Operation failed
#[derive(Debug, Clone, Copy)]
enum SambaDnsExitCode {
    /// Operation succeeded
    Success = 0,
    /// Missing or invalid configuration
    ConfigError = 1,
    /// The record operation failed
    OperationError = 2,
}

impl From<SambaDnsExitCode> for ExitCode {
    fn from(code: SambaDnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "sambadns")]
#[command(version, about = "Manage Samba AD DNS records through samba-tool", long_about = None)]
struct Cli {
    /// Program to execute instead of `samba-tool`
    #[arg(long, global = true)]
    tool_path: Option<String>,

    /// Kill samba-tool if it runs longer than this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a record and print its stored state
    Create {
        /// DNS server hostname
        #[arg(long)]
        server: String,
        /// Zone name
        #[arg(long)]
        zone: String,
        /// Record name (`@` for the apex, `*.app` for wildcards)
        #[arg(long)]
        name: String,
        /// Record type
        #[arg(long = "type", value_parser = parse_record_type)]
        record_type: RecordType,
        /// Record value (MX: `host priority`)
        #[arg(long)]
        value: String,
    },

    /// Print the state of a record, or `null` when it is absent
    Read {
        /// Record ID (`server/zone/name/TYPE`)
        id: String,
    },

    /// Set the value of a record, recreating it if it vanished
    Update {
        /// Record ID (`server/zone/name/TYPE`)
        id: String,
        /// New record value
        #[arg(long)]
        value: String,
    },

    /// Delete a record; succeeds when it is already absent
    Delete {
        /// Record ID (`server/zone/name/TYPE`)
        id: String,
    },

    /// Print the state of an existing record for adoption
    Import {
        /// Record ID (`server/zone/name/TYPE`)
        id: String,
    },

    /// Look up a record that must exist
    Lookup {
        /// DNS server hostname
        #[arg(long)]
        server: String,
        /// Zone name
        #[arg(long)]
        zone: String,
        /// Record name
        #[arg(long)]
        name: String,
        /// Record type
        #[arg(long = "type", value_parser = parse_record_type)]
        record_type: RecordType,
    },
}

fn parse_record_type(s: &str) -> std::result::Result<RecordType, String> {
    s.parse().map_err(|e: sambadns_core::Error| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match env::var("SAMBADNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON result only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SambaDnsExitCode::ConfigError.into();
    }

    let executor = match load_config(&cli).and_then(|config| {
        debug!("Configuration loaded: {:?}", config);
        Ok(SambaToolExecutor::from_config(&config)?)
    }) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SambaDnsExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SambaDnsExitCode::OperationError.into();
        }
    };

    let sync = RecordSynchronizer::new(Box::new(executor));
    match rt.block_on(run(&RecordResource::new(&sync), cli.command)) {
        Ok(output) => {
            println!("{output}");
            SambaDnsExitCode::Success.into()
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            SambaDnsExitCode::OperationError.into()
        }
    }
}

/// Environment first, then command-line overrides
fn load_config(cli: &Cli) -> Result<SambaDnsConfig> {
    let mut config = SambaDnsConfig::from_env()?;

    if let Some(ref tool_path) = cli.tool_path {
        config.tool_path = tool_path.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = Some(timeout_secs);
    }

    config.validate()?;
    Ok(config)
}

/// Run one operation and render its result as JSON
async fn run(resource: &RecordResource<'_>, command: Command) -> Result<String> {
    let state: Option<ResourceState> = match command {
        Command::Create {
            server,
            zone,
            name,
            record_type,
            value,
        } => {
            let spec = RecordSpec {
                dns_server: server,
                zone,
                name,
                record_type,
                value,
            };
            Some(resource.create(&spec).await?)
        }
        Command::Read { id } => resource.read(&id.parse::<RecordId>()?).await?,
        Command::Update { id, value } => {
            // Update re-queries the stored value and recreates a vanished record
            let id: RecordId = id.parse()?;
            let state = ResourceState::from(id.record(String::new()));
            Some(resource.update(&state, &value).await?)
        }
        Command::Delete { id } => {
            // Delete re-queries the stored value itself
            let id: RecordId = id.parse()?;
            resource
                .delete(&ResourceState::from(id.record(String::new())))
                .await?;
            None
        }
        Command::Import { id } => Some(resource.import(&id).await?),
        Command::Lookup {
            server,
            zone,
            name,
            record_type,
        } => Some(resource.lookup(&server, &zone, &name, record_type).await?),
    };

    Ok(serde_json::to_string_pretty(&state)?)
}
