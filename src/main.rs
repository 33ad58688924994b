// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Wiretap CLI - Transparent HTTP Traffic Logger
//!
//! Performs a single request with capture forced on and prints the logged
//! exchange.

use std::env;
use std::process::ExitCode;

use wiretap::{HttpClient, RelayConfig, Request};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wiretap=warn".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "get" => {
            if args.len() < 3 {
                eprintln!("Usage: wiretap get <url>");
                return ExitCode::from(1);
            }
            run(&args[2], None).await
        }
        "post" => {
            if args.len() < 4 {
                eprintln!("Usage: wiretap post <url> <body>");
                return ExitCode::from(1);
            }
            run(&args[2], Some(&args[3])).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("wiretap {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Wiretap - Transparent HTTP Traffic Logger

USAGE:
    wiretap <COMMAND> [OPTIONS]

COMMANDS:
    get <url>           Perform a GET request and log the exchange
    post <url> <body>   Perform a POST request and log the exchange
    help                Show this help message
    version             Show version information

EXAMPLES:
    wiretap get https://example.com
    wiretap post https://example.com/api '{{"name":"test"}}'

For more information, see: https://github.com/bountyyfi/wiretap
"#
    );
}

async fn run(url: &str, body: Option<&str>) -> ExitCode {
    match perform(url, body).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wiretap: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn perform(url: &str, body: Option<&str>) -> anyhow::Result<()> {
    let client = HttpClient::new()?;
    client.install_logging(RelayConfig::default().capture(|_| true));

    let request = match body {
        Some(body) => Request::post(url)?
            .header("content-type", "application/json")
            .body(body.to_string()),
        None => Request::get(url)?,
    };

    let response = client.execute(request).await?;
    eprintln!(
        "{} {} ({} bytes, {} ms)",
        response.status_code(),
        response.url_str(),
        response.body_len(),
        response.elapsed_ms
    );
    Ok(())
}
