use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "env-cli")]
#[command(about = "Client for a remote env service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "https://localhost:7777")]
    url: String,

    /// Accept self-signed certificates.
    #[arg(long)]
    insecure_tls: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the served environment
    Info,
    /// Reset some or all batch slots
    Reset {
        /// Slots to reset (all when omitted)
        #[arg(short, long, value_delimiter = ',')]
        indices: Option<Vec<usize>>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Step every slot; ACTIONS is a JSON array with one action per slot, e.g. '[1, 0]'
    Step { actions: String },
    /// Close the environment
    Close,
    /// Check replica health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure_tls)
        .build()?;
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Info => rpc(&client, base, "GetEnvInfo", json!({})).await?,
        Commands::Reset { indices, seed } => {
            rpc(&client, base, "Reset", json!({ "indices": indices, "seed": seed })).await?
        }
        Commands::Step { actions } => {
            let actions: Value = serde_json::from_str(&actions)?;
            rpc(&client, base, "Step", json!({ "actions": actions })).await?
        }
        Commands::Close => rpc(&client, base, "Close", json!({})).await?,
        Commands::Health => client.get(format!("{}/healthz", base)).send().await?,
    };
    print_response(res).await
}

async fn rpc(
    client: &reqwest::Client,
    base: &str,
    method: &str,
    body: Value,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .post(format!("{}/env.EnvService/{}", base, method))
        .json(&body)
        .send()
        .await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: env service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
