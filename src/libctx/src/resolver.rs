// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Maps an input path being indexed to the on-disk index file that should
//! hold it. Most deployments want a single shared index, but the strategy
//! is pluggable for callers that shard by directory, repo, or project.

use std::path::{Path, PathBuf};

use crate::Context;

pub trait IndexResolver: Send + Sync {
    fn resolve(&self, ctx: &Context, input_path: &Path) -> PathBuf;
}

/// Collapses every input to one fixed file under the store.
pub struct DefaultResolver;

impl IndexResolver for DefaultResolver {
    fn resolve(&self, ctx: &Context, _input_path: &Path) -> PathBuf {
        ctx.store().join("default.index")
    }
}
