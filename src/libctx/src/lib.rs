// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Directory-backed collection of index files, keyed by a caller-supplied
//! resolver, wired to the process dispatcher and the index codec.

pub mod config;
pub mod error;
pub mod resolver;

pub use config::Config;
pub use error::{ContextError, Result};
pub use resolver::{DefaultResolver, IndexResolver};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use libdispatch::Dispatcher;

/// One match produced by `Context::search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub file: String,
    pub line: u64,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub ignore_case: bool,
    pub path_filter: Option<String>,
    pub max_results: usize,
}

pub struct Context {
    store: PathBuf,
    resolver: Box<dyn IndexResolver>,
    dispatcher: Dispatcher,
    indexer_bin: String,
    searcher_bin: String,
    default_max_results: usize,
}

impl Context {
    /// Creates a Context backed by `config.store`, which is created if
    /// absent, using the default single-file resolver.
    pub fn new(config: Config) -> std::io::Result<Self> {
        Self::with_resolver(config, Box::new(DefaultResolver))
    }

    pub fn with_resolver(
        config: Config,
        resolver: Box<dyn IndexResolver>,
    ) -> std::io::Result<Self> {
        std::fs::create_dir_all(&config.store)?;
        Ok(Context {
            store: config.store,
            resolver,
            dispatcher: Dispatcher::new(),
            indexer_bin: config.indexer_bin,
            searcher_bin: config.searcher_bin,
            default_max_results: config.default_max_results,
        })
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    /// The `max_results` a caller should use when it has no preference of
    /// its own, e.g. an HTTP request body that omits the field entirely.
    pub fn default_max_results(&self) -> usize {
        self.default_max_results
    }

    /// Dispatches `[indexer_bin, path]` against the resolved index file.
    pub async fn index(&self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let index_file = self.resolver.resolve(self, path);
        let argv = vec![
            self.indexer_bin.clone(),
            path.to_string_lossy().into_owned(),
        ];
        let out = self
            .dispatcher
            .run_indexed(&argv, &index_file, None, None)
            .await?;
        Ok(out.success)
    }

    /// Groups `paths` by resolved index file and dispatches one indexer
    /// invocation per group, returning one success flag per group in the
    /// order the groups were first encountered.
    pub async fn index_many(&self, paths: &[PathBuf]) -> Result<Vec<bool>> {
        let mut order = Vec::new();
        let mut groups: HashMap<PathBuf, Vec<String>> = HashMap::new();
        for path in paths {
            let index_file = self.resolver.resolve(self, path);
            if !groups.contains_key(&index_file) {
                order.push(index_file.clone());
            }
            groups
                .entry(index_file)
                .or_default()
                .push(path.to_string_lossy().into_owned());
        }

        let mut results = Vec::with_capacity(order.len());
        for index_file in &order {
            let mut argv = vec![self.indexer_bin.clone()];
            argv.extend(groups.remove(index_file).unwrap_or_default());
            let out = self
                .dispatcher
                .run_indexed(&argv, index_file, None, None)
                .await?;
            results.push(out.success);
        }
        Ok(results)
    }

    /// Dispatches `[indexer_bin, "-list"]` against every index file in the
    /// store and accumulates the stripped output lines into a set. Raises
    /// if any per-index invocation fails.
    pub async fn paths_indexed(&self) -> Result<HashSet<String>> {
        let mut all = HashSet::new();
        for index_file in self.indices()? {
            let argv = vec![self.indexer_bin.clone(), "-list".to_string()];
            let out = self
                .dispatcher
                .run_indexed(&argv, &index_file, None, None)
                .await?;
            if !out.success {
                return Err(ContextError::ToolFailure {
                    index_path: index_file.display().to_string(),
                });
            }
            for line in out.stdout.split(|&b| b == b'\n') {
                let line = String::from_utf8_lossy(line).trim().to_string();
                if !line.is_empty() {
                    all.insert(line);
                }
            }
        }
        Ok(all)
    }

    /// Removes every file in the store directory.
    pub fn clear_indices(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.store)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Lists absolute paths of files in the store directory.
    pub fn indices(&self) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.store)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                out.push(entry.path());
            }
        }
        out.sort();
        Ok(out)
    }

    /// For each index file in the store: open for read, decode, prune the
    /// named paths and their descendants, write back.
    pub fn prune_paths(&self, paths: &[Vec<u8>]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        for index_file in self.indices()? {
            let mut idx = libcindex::read_index(&index_file)?;
            libcindex::prune_paths(&mut idx, paths);
            libcindex::write_index(&index_file, &idx)?;
        }
        Ok(())
    }

    /// For each index file in the store: open for read, decode, prune the
    /// named files, write back.
    pub fn prune_files(&self, names: &[Vec<u8>]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        for index_file in self.indices()? {
            let mut idx = libcindex::read_index(&index_file)?;
            let mut found_names = Vec::new();
            let mut found_positions = Vec::new();
            for (i, entry) in idx.names.entries.iter().enumerate() {
                if names.iter().any(|n| n == entry) {
                    found_names.push(entry.clone());
                    found_positions.push(i);
                }
            }
            libcindex::prune_files(&mut idx, &found_names, &found_positions);
            libcindex::write_index(&index_file, &idx)?;
        }
        Ok(())
    }

    /// Builds `[searcher_bin, ("-f" path_filter)?, ("-i")?, "-n", pattern]`
    /// and dispatches it against each index file, parsing `file:line:text`
    /// out of stdout. Stops accumulating once more than `max_results` hits
    /// have been seen.
    pub async fn search(&self, pattern: &str, opts: SearchOptions) -> Result<Vec<SearchHit>> {
        let mut argv = vec![self.searcher_bin.clone()];
        if let Some(filter) = &opts.path_filter {
            argv.push("-f".to_string());
            argv.push(filter.clone());
        }
        if opts.ignore_case {
            argv.push("-i".to_string());
        }
        argv.push("-n".to_string());
        argv.push(pattern.to_string());

        let max_results = opts.max_results;
        let mut results = Vec::new();
        'outer: for index_file in self.indices()? {
            let out = self
                .dispatcher
                .run_indexed(
                    &argv,
                    &index_file,
                    Some(max_results),
                    Some(max_results),
                )
                .await?;
            for line in out.stdout.split(|&b| b == b'\n') {
                let line = String::from_utf8_lossy(line);
                let line = line.trim();
                if let Some(hit) = parse_search_line(line) {
                    results.push(hit);
                    if results.len() > max_results {
                        break 'outer;
                    }
                }
            }
        }
        Ok(results)
    }
}

fn parse_search_line(line: &str) -> Option<SearchHit> {
    if line.is_empty() || !line.starts_with('/') {
        return None;
    }
    let mut parts = line.splitn(3, ':');
    let file = parts.next()?;
    let line_no = parts.next()?;
    let text = parts.next()?;
    let line_no: u64 = match line_no.parse() {
        Ok(n) => n,
        Err(_) => {
            log::warn!("dropping search result with non-integer line number: {line:?}");
            return None;
        }
    };
    Some(SearchHit {
        file: file.to_string(),
        line: line_no,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_line() {
        let hit = parse_search_line("/repo/a.txt:42:hello world").unwrap();
        assert_eq!(hit.file, "/repo/a.txt");
        assert_eq!(hit.line, 42);
        assert_eq!(hit.text, "hello world");
    }

    #[test]
    fn drops_malformed_lines() {
        assert!(parse_search_line("malformed").is_none());
        assert!(parse_search_line("").is_none());
        assert!(parse_search_line("relative/path:1:text").is_none());
        assert!(parse_search_line("/repo/a.txt:notanumber:text").is_none());
    }

    #[test]
    fn indices_lists_store_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.store = tmp.path().to_path_buf();
        let ctx = Context::new(config).unwrap();
        std::fs::write(tmp.path().join("b.index"), b"").unwrap();
        std::fs::write(tmp.path().join("a.index"), b"").unwrap();
        let listed = ctx.indices().unwrap();
        assert_eq!(
            listed,
            vec![tmp.path().join("a.index"), tmp.path().join("b.index")]
        );
    }

    #[test]
    fn clear_indices_empties_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::from_env();
        config.store = tmp.path().to_path_buf();
        let ctx = Context::new(config).unwrap();
        std::fs::write(tmp.path().join("a.index"), b"").unwrap();
        ctx.clear_indices().unwrap();
        assert!(ctx.indices().unwrap().is_empty());
    }
}
