//! `zenbook` - command-line access to the booking API.
//!
//! Usage:
//!   zenbook login <email> <password>
//!   zenbook logout
//!   zenbook me
//!   zenbook get <path> [key=value ...]
//!   zenbook overview
//!   zenbook endpoints

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use zenbook::api::{ApiClient, Payload};
use zenbook::config::Config;
use zenbook::credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use zenbook::format::{profile_image_url, role_display_name};

const USAGE: &str = "usage: zenbook <login EMAIL PASSWORD | logout | me | get PATH [KEY=VALUE ...] | overview | endpoints>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(USAGE);
    };

    let config = Config::load().context("Failed to load config")?;
    let credentials: Arc<dyn CredentialStore> = match &config.credentials_path {
        Some(path) => Arc::new(FileCredentialStore::new(path)),
        None => Arc::new(MemoryCredentialStore::new()),
    };
    let client = ApiClient::from_config(&config, credentials)?;

    match (command.as_str(), &args[1..]) {
        ("login", [email, password]) => {
            let payload = client.auth().login(email, password).await?;
            if client.credentials().is_authenticated() {
                println!("Logged in.");
            } else {
                print_payload(&payload)?;
            }
        }
        ("logout", []) => {
            client.auth().logout().await?;
            println!("Logged out.");
        }
        ("me", []) => {
            let user = client.auth().current_user().await?;
            println!("{} <{}> ({})", user.name, user.email, role_display_name(&user.role));
            let avatar = profile_image_url(Some(&user), config.image_host(), chrono::Utc::now().timestamp());
            println!("avatar: {avatar}");
        }
        ("get", [path, params @ ..]) => {
            let query = params
                .iter()
                .map(|p| p.split_once('=').with_context(|| format!("expected KEY=VALUE, got {p:?}")))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let payload = client.get(path, &query).await?;
            print_payload(&payload)?;
        }
        ("overview", []) => {
            let overview = client.staff().overview().await?;
            print_payload(&overview.dashboard)?;
        }
        ("endpoints", []) => {
            for (idx, url) in client.endpoints().iter().enumerate() {
                println!("{:>2}. {url}", idx + 1);
            }
        }
        _ => bail!(USAGE),
    }

    if let Some(used) = client.last_endpoint() {
        tracing::debug!("Answered by {used}");
    }
    Ok(())
}

fn print_payload(payload: &Payload) -> anyhow::Result<()> {
    match payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{text}"),
        Payload::Empty => {}
    }
    Ok(())
}
