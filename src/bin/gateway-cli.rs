use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use rr_gateway::http::StatusSnapshot;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the round-robin gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gateway version, backends and request count
    Status,
    /// Send requests through the gateway and tally which backend answered
    Probe {
        /// Number of requests to send
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Path to request
        #[arg(short, long, default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

            let res = client.get(format!("{base}/ping")).headers(headers).send().await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: gateway returned status {status}");
                return Ok(());
            }
            let snapshot: StatusSnapshot = res.json().await?;
            println!("Gateway v{} ({})", snapshot.version, snapshot.status);
            println!("Balancer:       {}", snapshot.balancer);
            println!("Backends:       {}", snapshot.backends.join(", "));
            println!("Total requests: {}", snapshot.total_requests);
        }
        Commands::Probe { count, path } => {
            let mut tally: BTreeMap<String, usize> = BTreeMap::new();
            for _ in 0..count {
                let key = match client.get(format!("{base}{path}")).send().await {
                    Ok(res) => res
                        .headers()
                        .get("x-backend-instance")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("status {}", res.status())),
                    Err(e) => format!("error: {e}"),
                };
                *tally.entry(key).or_default() += 1;
            }
            for (backend, hits) in tally {
                println!("{backend:<24} {hits}");
            }
        }
    }

    Ok(())
}
