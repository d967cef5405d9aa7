// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index codec error: {0}")]
    Codec(#[from] libcindex::IndexCodecError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] libdispatch::DispatchError),

    /// Raised by `paths_indexed` when a per-index invocation of `-list`
    /// fails; `index` and `search` never raise this, surfacing `false` /
    /// an empty result set for that index instead.
    #[error("tool invocation against `{index_path}` failed")]
    ToolFailure { index_path: String },
}

pub type Result<T> = std::result::Result<T, ContextError>;
