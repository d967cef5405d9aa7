// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

/// Errors raised by the process dispatcher. Note that a nonzero exit code
/// without cancellation is *not* one of these: that case is reported as
/// `DispatchOutput { success: false, .. }` rather than raised.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The external tool could not be launched at all.
    #[error("failed to spawn `{argv0}`: {source}")]
    Spawn {
        argv0: String,
        #[source]
        source: std::io::Error,
    },

    /// A pipe read failed, or the process could not be waited on for a
    /// reason other than our own cancellation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
