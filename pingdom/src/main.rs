//! Pingdom CLI — send authenticated requests to the Pingdom API from the terminal.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use pingdom_lib::{Client, ClientConfig, Params};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pingdom")]
#[command(about = "Pingdom CLI — send authenticated requests to the Pingdom API", long_about = None)]
struct Cli {
    /// Account user name (Basic Auth).
    #[arg(long, env = "PINGDOM_USER", default_value = "")]
    user: String,

    /// Account password (Basic Auth).
    #[arg(long, env = "PINGDOM_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Application key, sent as the App-Key header.
    #[arg(long, env = "PINGDOM_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Act on behalf of this sub-account (multi-user authentication).
    #[arg(long, env = "PINGDOM_ACCOUNT_EMAIL")]
    account_email: Option<String>,

    /// API base URL. Defaults to https://api.pingdom.com/api/2.1.
    #[arg(long, env = "PINGDOM_BASE_URL")]
    base_url: Option<String>,

    /// Output format: plain (path: value lines), json (pretty-printed).
    #[arg(short, long, default_value = "plain", value_enum)]
    output: OutputFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the JSON response
    Request {
        /// HTTP method: GET, POST, PUT, DELETE
        method: String,
        /// Resource path, e.g. /checks or /checks/123
        resource: String,
        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Show version
    Version,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    if matches!(cli.command, Commands::Version) {
        println!("pingdom {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let mut config = ClientConfig::new(cli.user, cli.password, cli.api_key);
    config.account_email = cli.account_email;
    config.base_url = cli.base_url;
    let client = match Client::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let format = match cli.output {
        OutputFormatArg::Plain => output::OutputFormat::Plain,
        OutputFormatArg::Json => output::OutputFormat::Json,
    };

    match run(&client, cli.command, format).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &Client, cmd: Commands, format: output::OutputFormat) -> Result<(), String> {
    match cmd {
        Commands::Request {
            method,
            resource,
            params,
        } => {
            tracing::debug!(%method, %resource, params = params.len(), "sending request");
            let params: Option<Params> = (!params.is_empty()).then(|| params.into_iter().collect());
            let req = client
                .new_request(&method.to_uppercase(), &resource, params.as_ref())
                .map_err(|e| e.to_string())?;
            let mut body = serde_json::Value::Null;
            client
                .execute(req, Some(&mut body))
                .await
                .map_err(|e| e.to_string())?;
            println!("{}", output::render(&body, format).map_err(|e| e.to_string())?);
        }
        Commands::Version => {}
    }
    Ok(())
}
