// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use rwbuf::config::Config;

#[tokio::main]
async fn main() {
    let config = match Config::parse().resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    match rwbuf::run::run(config).await {
        Ok(summary) => match serde_json::to_string(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("failed to encode summary: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("fatal: {e:#}");
            std::process::exit(1);
        }
    }
}
