use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "waypoint-cli")]
#[command(about = "Management CLI for the waypoint travel query service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a travel query and print the answer
    Ask {
        /// The free-text query, e.g. "weather in Paris"
        query: Vec<String>,
    },
    /// Check service liveness
    Health,
    /// Inspect circuit breaker states
    Breakers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ask { query } => {
            let query = query.join(" ");
            let res = client
                .post(format!("{}/query", cli.url))
                .json(&json!({ "query": query }))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
                return Ok(());
            }
            let body: Value = res.json().await?;
            match body.get("answer").and_then(Value::as_str) {
                Some(answer) => println!("{answer}"),
                None => println!("{}", serde_json::to_string_pretty(&body)?),
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/healthz", cli.url)).send().await?;
            println!("{}", res.status());
        }
        Commands::Breakers => {
            let res = client
                .get(format!("{}/admin/breakers", cli.url))
                .send()
                .await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
