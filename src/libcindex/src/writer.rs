// Copyright 2016 Vernon Jones.
// Original code Copyright 2013 Manpreet Singh ( junkblocker@yahoo.com ). All rights reserved.
// Original code Copyright 2011 The Go Authors.  All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Encodes an in-memory `Index` back to the on-disk format, byte-for-byte
//! compatible with `reader::decode_index`.
//!
//! This writer serializes a single already-materialized `Index` in one
//! pass — there is no merge step and no run-file heap, only the fixed
//! section concatenation order.

use std::io::Write;
use std::path::Path;

use consts::{HEADER_MAGIC, MAGIC_SIZE, TRAILER_MAGIC};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::model::{Index, IndexTrailerOffsets, NameIndex, Posting, PostingIndexEntry};

/// Writes `idx` to `path`, replacing any existing file. The new image is
/// built in a temporary file in the same directory and persisted over
/// `path` in a single rename, so a reader never observes a partial write.
pub fn write_index<P: AsRef<Path>>(path: P, idx: &Index) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new()?,
    };
    tmp.write_all(&encode_index(idx))?;
    tmp.persist(path).map_err(|e| e.error)?;
    log::debug!("wrote index to {}", path.display());
    Ok(())
}

/// Encodes `idx` as the full byte image of an index file.
pub fn encode_index(idx: &Index) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(HEADER_MAGIC.as_bytes());
    write_strings(&mut buf, idx.paths.entries.iter());
    write_strings(&mut buf, idx.names.entries.iter());
    write_postings(&mut buf, &idx.postings);
    write_name_index(&mut buf, &idx.name_index);
    write_posting_index(&mut buf, &idx.posting_index);
    write_trailer_offsets(&mut buf, &idx.offsets);
    buf.extend_from_slice(TRAILER_MAGIC.as_bytes());
    buf
}

fn write_strings<'a, I: Iterator<Item = &'a Vec<u8>>>(buf: &mut Vec<u8>, entries: I) {
    for entry in entries {
        buf.extend_from_slice(entry);
        buf.push(0);
    }
    buf.push(0);
}

fn write_postings(buf: &mut Vec<u8>, postings: &[Posting]) {
    for posting in postings {
        buf.extend_from_slice(&posting.trigram);
        for &delta in &posting.deltas {
            libvarint::write_varint(buf, delta).expect("writing to Vec<u8> cannot fail");
        }
    }
}

fn write_name_index(buf: &mut Vec<u8>, name_index: &NameIndex) {
    for &entry in &name_index.entries {
        libvarint::write_u32_be(buf, entry).expect("writing to Vec<u8> cannot fail");
    }
}

fn write_posting_index(buf: &mut Vec<u8>, posting_index: &[PostingIndexEntry]) {
    for entry in posting_index {
        buf.extend_from_slice(&entry.trigram);
        libvarint::write_u32_be(buf, entry.file_count).expect("writing to Vec<u8> cannot fail");
        libvarint::write_u32_be(buf, entry.offset).expect("writing to Vec<u8> cannot fail");
    }
}

fn write_trailer_offsets(buf: &mut Vec<u8>, offsets: &IndexTrailerOffsets) {
    for &v in &[
        offsets.path_list,
        offsets.name_list,
        offsets.posting_list,
        offsets.name_index,
        offsets.posting_list_index,
    ] {
        libvarint::write_u32_be(buf, v).expect("writing to Vec<u8> cannot fail");
    }
}

/// Re-derives `idx.offsets`, `idx.name_index`, and `idx.posting_index` from
/// the current `paths`/`names`/`postings` section contents.
///
/// Must run after any edit to `paths`, `names`, or `postings` and before
/// the index is written back out — the trailer offsets cannot be computed
/// until every preceding section is fully materialized.
pub fn recompute_offsets(idx: &mut Index) {
    let path_list = MAGIC_SIZE as u32;
    let paths_len: u32 = idx
        .paths
        .entries
        .iter()
        .map(|p| p.len() as u32 + 1)
        .sum::<u32>()
        + 1;
    let name_list = path_list + paths_len;
    let names_len: u32 = idx
        .names
        .entries
        .iter()
        .map(|n| n.len() as u32 + 1)
        .sum::<u32>()
        + 1;
    let posting_list = name_list + names_len;

    let mut name_index_entries = Vec::with_capacity(idx.names.entries.len() + 1);
    let mut cum = 0u32;
    for name in &idx.names.entries {
        name_index_entries.push(cum);
        cum += name.len() as u32 + 1;
    }
    name_index_entries.push(cum);
    idx.name_index = NameIndex {
        entries: name_index_entries,
    };

    let mut posting_index_entries = Vec::new();
    let mut running_offset = 0u32;
    for posting in &idx.postings {
        let file_count = posting.deltas.len() as u32 - 1;
        if file_count > 0 {
            posting_index_entries.push(PostingIndexEntry {
                trigram: posting.trigram,
                file_count,
                offset: running_offset,
            });
        }
        let mut entry_len = 3u32;
        for &delta in &posting.deltas {
            entry_len += libvarint::varint_size(delta) as u32;
        }
        running_offset += entry_len;
    }
    idx.posting_index = posting_index_entries;

    let name_index = posting_list + running_offset;
    let posting_list_index = name_index + 4 * (idx.names.entries.len() as u32 + 1);

    idx.offsets = IndexTrailerOffsets {
        path_list,
        name_list,
        posting_list,
        name_index,
        posting_list_index,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Index;

    #[test]
    fn recompute_offsets_matches_empty_index() {
        let mut idx = Index::empty();
        let before = idx.offsets;
        recompute_offsets(&mut idx);
        assert_eq!(idx.offsets, before);
    }

    #[test]
    fn write_then_read_back(
    ) {
        use tempfile::NamedTempFile;
        let idx = Index::empty();
        let f = NamedTempFile::new().unwrap();
        write_index(f.path(), &idx).unwrap();
        let decoded = crate::reader::read_index(f.path()).unwrap();
        assert_eq!(decoded.offsets, idx.offsets);
    }
}
