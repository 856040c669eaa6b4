// ABOUTME: One-time Strava OAuth2 setup producing the refresh token used by chain-tracker
// ABOUTME: Prints the authorization URL, captures the code, exchanges it and updates .env
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage: `auth-setup [--listen PORT] [--env-file .env]`
//!
//! Without `--listen` the code is pasted on stdin, either bare or as the full
//! redirected URL.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chain_tracker::config::{load_dotenv, upsert_env_line, StravaSettings};
use chain_tracker::constants::{defaults, env_keys};
use chain_tracker::logging;
use chain_tracker::providers::StravaProvider;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "auth-setup")]
#[command(about = "Obtain a Strava refresh token for chain-tracker")]
struct Cli {
    /// OAuth2 client ID (defaults to `STRAVA_CLIENT_ID`)
    #[arg(long)]
    client_id: Option<String>,

    /// OAuth2 client secret (defaults to `STRAVA_CLIENT_SECRET`)
    #[arg(long)]
    client_secret: Option<String>,

    /// Redirect URI registered with the Strava application
    #[arg(long, default_value = defaults::AUTH_REDIRECT_URI)]
    redirect_uri: String,

    /// Capture the code with a local callback listener on this port
    #[arg(long, value_name = "PORT")]
    listen: Option<u16>,

    /// Seconds to wait for the callback
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Write the refresh token into this .env file
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env(None)?;
    load_dotenv();

    let settings = StravaSettings::from_env_vars();
    let client_id = cli
        .client_id
        .clone()
        .or(settings.client_id)
        .ok_or_else(|| anyhow!("--client-id or {} is required", env_keys::STRAVA_CLIENT_ID))?;
    let client_secret = cli
        .client_secret
        .clone()
        .or(settings.client_secret)
        .ok_or_else(|| {
            anyhow!(
                "--client-secret or {} is required",
                env_keys::STRAVA_CLIENT_SECRET
            )
        })?;

    let redirect_uri = cli.listen.map_or_else(
        || cli.redirect_uri.clone(),
        |port| format!("http://localhost:{port}/callback"),
    );
    let state = uuid::Uuid::new_v4().to_string();

    let provider = StravaProvider::new();
    let auth_url = provider.authorization_url(&client_id, &redirect_uri, Some(&state))?;

    println!("\nPlease visit this URL to authorize the application:");
    println!("{auth_url}\n");

    let code = match cli.listen {
        Some(port) => {
            let wait = Duration::from_secs(cli.timeout_secs);
            tokio::time::timeout(wait, wait_for_callback(port, &state))
                .await
                .map_err(|_| anyhow!("no authorization callback within {}s", cli.timeout_secs))??
        }
        None => read_code_from_stdin().await?,
    };

    info!("Received authorization code, exchanging for tokens...");
    let credentials = provider
        .exchange_code(&client_id, &client_secret, &code)
        .await
        .context("exchanging authorization code")?;
    let refresh_token = credentials
        .refresh_token
        .ok_or_else(|| anyhow!("Strava returned no refresh token"))?;

    println!("\nAuthentication successful. Add this line to your .env file:\n");
    println!("{}={refresh_token}", env_keys::STRAVA_REFRESH_TOKEN);

    if let Some(path) = &cli.env_file {
        write_refresh_token(path, &refresh_token).await?;
        println!("\nUpdated {}", path.display());
    }
    Ok(())
}

/// Accept one redirect and return its `code` parameter
async fn wait_for_callback(port: u16, expected_state: &str) -> Result<String> {
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("binding callback listener on port {port}"))?;
    info!("Listening for OAuth callback on port {port}");

    loop {
        let (socket, _) = listener.accept().await?;
        let (reader, mut writer) = socket.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        let Some(path) = line.split_whitespace().nth(1) else {
            continue;
        };
        let Ok(url) = Url::parse(&format!("http://localhost{path}")) else {
            continue;
        };
        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();

        if let Some(reason) = params.get("error") {
            respond(&mut writer, "Authorization denied").await;
            bail!("authorization denied: {reason}");
        }
        let Some(code) = params.get("code") else {
            // favicon and other stray requests
            respond(&mut writer, "Waiting for authorization...").await;
            continue;
        };
        if params.get("state").map(String::as_str) != Some(expected_state) {
            respond(&mut writer, "State mismatch").await;
            bail!("callback state did not match the authorization request");
        }

        respond(
            &mut writer,
            "Authorization successful! You can close this window and return to the terminal.",
        )
        .await;
        return Ok(code.clone());
    }
}

async fn respond(writer: &mut tokio::net::tcp::OwnedWriteHalf, message: &str) {
    let body = format!("<html><body><h1>{message}</h1></body></html>");
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    writer.write_all(response.as_bytes()).await.ok();
}

/// Read a pasted code or redirected URL from stdin
async fn read_code_from_stdin() -> Result<String> {
    println!("After approving, paste the `code` parameter (or the whole redirected URL):");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("reading authorization code")?;
    extract_code(line.trim()).ok_or_else(|| anyhow!("no authorization code entered"))
}

fn extract_code(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned()),
        Err(_) => Some(input.to_owned()),
    }
}

async fn write_refresh_token(path: &Path, refresh_token: &str) -> Result<()> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };
    let updated = upsert_env_line(&existing, env_keys::STRAVA_REFRESH_TOKEN, refresh_token);
    tokio::fs::write(path, updated)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_from_url_or_bare() {
        assert_eq!(
            extract_code("http://localhost/?state=x&code=abc123&scope=read").as_deref(),
            Some("abc123")
        );
        assert_eq!(extract_code("abc123").as_deref(), Some("abc123"));
        assert_eq!(extract_code(""), None);
    }
}
