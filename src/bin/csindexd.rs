// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::sync::Arc;

use clap::Parser;
use csindexd::http::build_router;
use libctx::{Config, Context};

/// Starts the indexing/search JSON API. Everything it serves comes from
/// environment configuration (`CSINDEXD_*`); the flags below only override
/// the binaries the dispatcher shells out to and the bind address.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Overrides CSINDEXD_BIND_ADDR.
    #[arg(long)]
    bind_addr: Option<String>,

    /// Overrides CSINDEXD_INDEXER_BIN.
    #[arg(long)]
    indexer_bin: Option<String>,

    /// Overrides CSINDEXD_SEARCHER_BIN.
    #[arg(long)]
    searcher_bin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    libcustomlogger::init(log::LevelFilter::Info)?;

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(bind_addr) = cli.bind_addr {
        config.http_bind_addr = bind_addr;
    }
    if let Some(indexer_bin) = cli.indexer_bin {
        config.indexer_bin = indexer_bin;
    }
    if let Some(searcher_bin) = cli.searcher_bin {
        config.searcher_bin = searcher_bin;
    }

    let bind_addr = config.http_bind_addr.clone();
    let ctx = Arc::new(Context::new(config)?);

    log::info!("binding csindexd on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, build_router(ctx)).await?;
    Ok(())
}
