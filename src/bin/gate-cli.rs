use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Management CLI for the edge gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, env = "EDGE_GATE_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gate status and locale settings
    Status,
    /// Preview the routing decision for a path
    Decide {
        /// Request path, e.g. /en/profile
        path: String,
        /// Cookie as name=value; repeatable
        #[arg(short, long = "cookie")]
        cookies: Vec<String>,
        /// Accept-Language header value
        #[arg(short, long)]
        accept_language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Decide { path, cookies, accept_language } => {
            let mut jar = Map::new();
            for pair in cookies {
                match pair.split_once('=') {
                    Some((name, value)) => {
                        jar.insert(name.trim().to_string(), Value::String(value.to_string()));
                    }
                    None => return Err(format!("cookie '{}' is not name=value", pair).into()),
                }
            }
            let body = json!({
                "path": path,
                "cookies": jar,
                "accept_language": accept_language,
            });
            let res = client.post(format!("{}/admin/decide", cli.url))
                .headers(headers)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("admin API returned status {}: {}", status, text.trim()).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
