// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

/// Errors raised by the index codec and mutation engine.
///
/// The codec and mutation engine fail loudly: every fallible operation in
/// this crate returns `Result<T, IndexCodecError>` rather than silently
/// producing a partial index.
#[derive(Error, Debug)]
pub enum IndexCodecError {
    /// Header/trailer magic mismatch, or a section ended before its
    /// declared bound.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IndexCodecError>;
