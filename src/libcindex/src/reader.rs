// Copyright 2016 Vernon Jones.
// Original code Copyright 2011 The Go Authors.  All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

// Index format.
//
// An index stored on disk has the format:
//
// 	"csearch index 1\n"
// 	list of paths
// 	list of names
// 	list of posting lists
// 	name index
// 	posting list index
// 	trailer
//
// See consts::HEADER_MAGIC / consts::TRAILER_MAGIC for the exact magic
// bytes, and model.rs for the typed representation this module decodes
// into. Unlike the mmap-backed random-access reader this format was
// originally built for, this reader eagerly materializes the whole file
// into an owned `Index`, because the mutation engine needs to edit it in
// place.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use consts::{HEADER_MAGIC, MAGIC_SIZE, POST_ENTRY_SIZE, SENTINEL_TRIGRAM, TRAILER_MAGIC,
             TRAILER_OFFSETS_SIZE};

use crate::error::{IndexCodecError, Result};
use crate::model::{Index, IndexTrailerOffsets, NameIndex, Posting, PostingIndexEntry, Strings};

/// Reads and decodes an index file from `path`.
pub fn read_index<P: AsRef<Path>>(path: P) -> Result<Index> {
    let data = fs::read(path)?;
    decode_index(&data)
}

/// Decodes an in-memory index image: verifies header and trailer, reads
/// the five section offsets, then decodes each section in turn.
pub fn decode_index(data: &[u8]) -> Result<Index> {
    if data.len() < 2 * MAGIC_SIZE + TRAILER_OFFSETS_SIZE {
        return Err(IndexCodecError::InvalidIndex("file too short".to_string()));
    }
    if &data[..MAGIC_SIZE] != HEADER_MAGIC.as_bytes() {
        return Err(IndexCodecError::InvalidIndex(
            "bad header magic".to_string(),
        ));
    }
    let len = data.len();
    if &data[len - MAGIC_SIZE..] != TRAILER_MAGIC.as_bytes() {
        return Err(IndexCodecError::InvalidIndex(
            "bad trailer magic".to_string(),
        ));
    }

    let offsets_start = len - MAGIC_SIZE - TRAILER_OFFSETS_SIZE;
    let mut cur = Cursor::new(&data[offsets_start..offsets_start + TRAILER_OFFSETS_SIZE]);
    let offsets = IndexTrailerOffsets {
        path_list: libvarint::read_u32_be(&mut cur)?,
        name_list: libvarint::read_u32_be(&mut cur)?,
        posting_list: libvarint::read_u32_be(&mut cur)?,
        name_index: libvarint::read_u32_be(&mut cur)?,
        posting_list_index: libvarint::read_u32_be(&mut cur)?,
    };

    let section = |lo: u32, hi: usize| -> Result<&[u8]> {
        let lo = lo as usize;
        if lo > hi || hi > data.len() {
            return Err(IndexCodecError::InvalidIndex(
                "section offset out of bounds".to_string(),
            ));
        }
        Ok(&data[lo..hi])
    };

    let paths = read_strings(section(offsets.path_list, offsets.name_list as usize)?);
    let names = read_strings(section(offsets.name_list, offsets.posting_list as usize)?);
    let postings = read_postings(section(offsets.posting_list, offsets.name_index as usize)?)?;
    let name_index = read_name_index(section(
        offsets.name_index,
        offsets.posting_list_index as usize,
    )?)?;
    let posting_index = read_posting_index(section(offsets.posting_list_index, offsets_start)?)?;

    Ok(Index {
        paths,
        names,
        postings,
        name_index: NameIndex {
            entries: name_index,
        },
        posting_index,
        offsets,
    })
}

/// Splits a NUL-terminated run of strings, dropping empty entries (which
/// includes the final empty terminator entry).
fn read_strings(buf: &[u8]) -> Strings {
    let mut entries = Vec::new();
    let mut start = 0;
    for (i, &b) in buf.iter().enumerate() {
        if b == 0 {
            if i > start {
                entries.push(buf[start..i].to_vec());
            }
            start = i + 1;
        }
    }
    Strings { entries }
}

/// Reads `{trigram, varint deltas ending in 0}` entries until the sentinel
/// is seen or the section is exhausted, whichever comes first.
fn read_postings(buf: &[u8]) -> Result<Vec<Posting>> {
    let mut cur = Cursor::new(buf);
    let mut postings = Vec::new();
    loop {
        if cur.position() as usize >= buf.len() {
            break;
        }
        let mut trigram = [0u8; 3];
        cur.read_exact(&mut trigram)?;
        let mut deltas = Vec::new();
        loop {
            let delta = libvarint::read_varint(&mut cur)? as u32;
            deltas.push(delta);
            if delta == 0 {
                break;
            }
        }
        let is_sentinel = trigram == SENTINEL_TRIGRAM;
        postings.push(Posting { trigram, deltas });
        if is_sentinel {
            break;
        }
    }
    Ok(postings)
}

fn read_name_index(buf: &[u8]) -> Result<Vec<u32>> {
    let mut entries = Vec::new();
    let mut cur = Cursor::new(buf);
    while (cur.position() as usize) + 4 <= buf.len() {
        entries.push(libvarint::read_u32_be(&mut cur)?);
    }
    Ok(entries)
}

fn read_posting_index(buf: &[u8]) -> Result<Vec<PostingIndexEntry>> {
    let mut entries = Vec::new();
    let mut cur = Cursor::new(buf);
    while (cur.position() as usize) + POST_ENTRY_SIZE <= buf.len() {
        let mut trigram = [0u8; 3];
        cur.read_exact(&mut trigram)?;
        let file_count = libvarint::read_u32_be(&mut cur)?;
        let offset = libvarint::read_u32_be(&mut cur)?;
        entries.push(PostingIndexEntry {
            trigram,
            file_count,
            offset,
        });
    }
    Ok(entries)
}
