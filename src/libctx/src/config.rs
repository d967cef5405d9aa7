// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Environment-driven configuration, following the same fallback-chain
//! style as `CSEARCHINDEX` falling back to `$HOME/.csearchindex`, but
//! generalized to every knob the dispatcher and HTTP facade need a
//! path/address for.

use std::env;
use std::path::PathBuf;

const DEFAULT_INDEXER_BIN: &str = "cindex";
const DEFAULT_SEARCHER_BIN: &str = "csearch";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5555";
const DEFAULT_MAX_RESULTS: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one or more index files managed by a single
    /// `Context`. Created on `Context` construction if absent.
    pub store: PathBuf,
    pub indexer_bin: String,
    pub searcher_bin: String,
    pub http_bind_addr: String,
    pub default_max_results: usize,
}

impl Config {
    /// Reads `CSINDEXD_STORE`, `CSINDEXD_INDEXER_BIN`, `CSINDEXD_SEARCHER_BIN`,
    /// `CSINDEXD_BIND_ADDR`, and `CSINDEXD_MAX_RESULTS`, falling back to
    /// `$HOME/.csindexd`/`$USERPROFILE/.csindexd` for the store directory
    /// and hardcoded defaults for everything else.
    pub fn from_env() -> Self {
        let store = env::var("CSINDEXD_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = env::var("HOME")
                    .or_else(|_| env::var("USERPROFILE"))
                    .unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".csindexd")
            });

        let indexer_bin =
            env::var("CSINDEXD_INDEXER_BIN").unwrap_or_else(|_| DEFAULT_INDEXER_BIN.to_string());
        let searcher_bin = env::var("CSINDEXD_SEARCHER_BIN")
            .unwrap_or_else(|_| DEFAULT_SEARCHER_BIN.to_string());
        let http_bind_addr =
            env::var("CSINDEXD_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let default_max_results = env::var("CSINDEXD_MAX_RESULTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_RESULTS);

        Config {
            store,
            indexer_bin,
            searcher_bin,
            http_bind_addr,
            default_max_results,
        }
    }
}
