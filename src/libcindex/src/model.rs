// Copyright 2016 Vernon Jones.
// Original code Copyright 2011 The Go Authors.  All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Typed, in-memory representation of the five sections of an on-disk
//! index plus its trailer offsets.

use consts::SENTINEL_TRIGRAM;

/// An ordered sequence of non-empty byte strings: the path list or the
/// name list of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Strings {
    pub entries: Vec<Vec<u8>>,
}

/// One posting: a trigram plus the file IDs (encoded as deltas) of every
/// indexed file whose contents contain that trigram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub trigram: [u8; 3],
    pub deltas: Vec<u32>,
}

impl Posting {
    /// The sentinel entry that always terminates the posting-list section.
    pub fn sentinel() -> Self {
        Posting {
            trigram: SENTINEL_TRIGRAM,
            deltas: vec![0],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.trigram == SENTINEL_TRIGRAM
    }

    /// Expands the delta-encoded list back into strictly increasing file
    /// IDs. The trailing `0` delta is a terminator, not a file ID.
    pub fn file_ids(&self) -> Vec<u32> {
        let body_len = self.deltas.len().saturating_sub(1);
        let mut ids = Vec::with_capacity(body_len);
        let mut cur: i64 = -1;
        for &delta in &self.deltas[..body_len] {
            cur += delta as i64;
            ids.push(cur as u32);
        }
        ids
    }
}

/// Encodes a strictly increasing list of file IDs as a delta list ending
/// in a terminating `0`.
pub fn deltas_from_ids(ids: &[u32]) -> Vec<u32> {
    let mut deltas = Vec::with_capacity(ids.len() + 1);
    let mut prev: i64 = -1;
    for &id in ids {
        deltas.push((id as i64 - prev) as u32);
        prev = id as i64;
    }
    deltas.push(0);
    deltas
}

pub type Postings = Vec<Posting>;

/// Offsets into the names section, one per name plus a terminating entry
/// equal to the total size of the names payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    pub entries: Vec<u32>,
}

/// One row of the posting-list index: random access into the
/// variable-length postings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingIndexEntry {
    pub trigram: [u8; 3],
    pub file_count: u32,
    pub offset: u32,
}

pub type PostingIndex = Vec<PostingIndexEntry>;

/// The five absolute byte offsets stored in an index file's trailer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexTrailerOffsets {
    pub path_list: u32,
    pub name_list: u32,
    pub posting_list: u32,
    pub name_index: u32,
    pub posting_list_index: u32,
}

/// The full in-memory model of one index file.
#[derive(Debug, Clone, Default)]
pub struct Index {
    pub paths: Strings,
    pub names: Strings,
    pub postings: Postings,
    pub name_index: NameIndex,
    pub posting_index: PostingIndex,
    pub offsets: IndexTrailerOffsets,
}

impl Index {
    /// An index with no paths or names and only the sentinel posting.
    pub fn empty() -> Self {
        let mut idx = Index {
            paths: Strings::default(),
            names: Strings::default(),
            postings: vec![Posting::sentinel()],
            name_index: NameIndex::default(),
            posting_index: Vec::new(),
            offsets: IndexTrailerOffsets::default(),
        };
        crate::writer::recompute_offsets(&mut idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_id_inverse_sample() {
        let deltas = vec![2, 5, 1, 1, 0];
        let posting = Posting {
            trigram: [b'a', b'b', b'c'],
            deltas: deltas.clone(),
        };
        assert_eq!(posting.file_ids(), vec![1, 6, 7, 8]);
        assert_eq!(deltas_from_ids(&posting.file_ids()), deltas);
    }

    #[test]
    fn delta_id_inverse_empty() {
        let posting = Posting::sentinel();
        assert_eq!(posting.file_ids(), Vec::<u32>::new());
    }

    #[test]
    fn empty_index_has_only_sentinel() {
        let idx = Index::empty();
        assert!(idx.paths.entries.is_empty());
        assert!(idx.names.entries.is_empty());
        assert_eq!(idx.postings.len(), 1);
        assert!(idx.postings[0].is_sentinel());
        assert!(idx.posting_index.is_empty());
    }
}
