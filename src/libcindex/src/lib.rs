// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Binary index codec and in-memory index model with incremental pruning.
//!
//! This crate owns the bit-exact on-disk format shared with the external
//! `cindex`/`csearch` tools: reading a file into an owned [`model::Index`],
//! mutating it in place to drop files or whole sub-trees, and writing it
//! back out byte-for-byte compatible with the reader.

pub mod error;
pub mod model;
pub mod mutate;
pub mod reader;
pub mod writer;

pub use error::{IndexCodecError, Result};
pub use model::{
    deltas_from_ids, Index, IndexTrailerOffsets, NameIndex, Posting, PostingIndex,
    PostingIndexEntry, Postings, Strings,
};
pub use mutate::{prune_files, prune_paths};
pub use reader::{decode_index, read_index};
pub use writer::{encode_index, write_index};
