// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Path/file removal from an already-decoded `Index`, with cascading
//! updates to names, posting lists, and both sub-indices.
//!
//! Nothing here builds an index forward; the offset bookkeeping it needs
//! is handed off to `writer::recompute_offsets` once the section contents
//! are final.

use std::collections::{HashMap, HashSet};

use crate::model::{deltas_from_ids, Index};
use crate::writer::recompute_offsets;

/// Removes every path (and its descendants, by byte-prefix match) from
/// `idx.paths`, then removes every name under those paths and the file IDs
/// that refer to them.
///
/// A no-op if `paths` is empty.
pub fn prune_paths(idx: &mut Index, paths: &[Vec<u8>]) {
    if paths.is_empty() {
        return;
    }

    idx.paths
        .entries
        .retain(|p| !paths.iter().any(|prefix| p.starts_with(prefix.as_slice())));

    let mut names = Vec::new();
    let mut positions = Vec::new();
    for (i, name) in idx.names.entries.iter().enumerate() {
        if paths.iter().any(|prefix| name.starts_with(prefix.as_slice())) {
            names.push(name.clone());
            positions.push(i);
        }
    }
    prune_files(idx, &names, &positions);
}

/// Removes the given names (at the given zero-based positions in
/// `idx.names`) and remaps every posting's file IDs accordingly.
///
/// A no-op if `names` is empty. `name_positions` must be the positions of
/// `names` within `idx.names.entries` before this call.
pub fn prune_files(idx: &mut Index, names: &[Vec<u8>], name_positions: &[usize]) {
    if names.is_empty() {
        return;
    }
    log::debug!("pruning {} names from index", names.len());

    let initial_name_count = idx.names.entries.len();
    let remove: HashSet<usize> = name_positions.iter().copied().collect();

    let mut kept = Vec::with_capacity(initial_name_count.saturating_sub(remove.len()));
    for (i, name) in idx.names.entries.iter().enumerate() {
        if !remove.contains(&i) {
            kept.push(name.clone());
        }
    }
    idx.names.entries = kept;

    let mut remap: HashMap<usize, usize> = HashMap::with_capacity(initial_name_count);
    let mut offset = 0usize;
    for k in 0..initial_name_count {
        if remove.contains(&k) {
            offset += 1;
            continue;
        }
        remap.insert(k, k - offset);
    }

    for posting in idx.postings.iter_mut() {
        let new_ids: Vec<u32> = posting
            .file_ids()
            .into_iter()
            .filter_map(|id| remap.get(&(id as usize)).map(|&n| n as u32))
            .collect();
        posting.deltas = deltas_from_ids(&new_ids);
    }
    idx.postings
        .retain(|p| p.is_sentinel() || p.deltas.as_slice() != [0u32]);

    recompute_offsets(idx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Index, Posting};

    fn idx_with(paths: &[&str], names: &[&str], postings: Vec<Posting>) -> Index {
        let mut idx = Index {
            paths: crate::model::Strings {
                entries: paths.iter().map(|s| s.as_bytes().to_vec()).collect(),
            },
            names: crate::model::Strings {
                entries: names.iter().map(|s| s.as_bytes().to_vec()).collect(),
            },
            postings,
            ..Index::empty()
        };
        recompute_offsets(&mut idx);
        idx
    }

    #[test]
    fn empty_prune_is_noop() {
        let mut idx = idx_with(&["/a"], &["/a/x"], vec![Posting::sentinel()]);
        let before = idx.clone();
        prune_paths(&mut idx, &[]);
        assert_eq!(idx.paths, before.paths);
        assert_eq!(idx.names, before.names);
    }

    #[test]
    fn single_file_prune_clears_paths_and_names() {
        let posting = Posting {
            trigram: *b"abc",
            deltas: vec![1, 0],
        };
        let mut idx = idx_with(&["/a"], &["/a/x"], vec![posting, Posting::sentinel()]);
        prune_paths(&mut idx, &[b"/a".to_vec()]);
        assert!(idx.paths.entries.is_empty());
        assert!(idx.names.entries.is_empty());
        assert_eq!(idx.postings.len(), 1);
        assert!(idx.postings[0].is_sentinel());
    }

    #[test]
    fn prune_remaps_surviving_file_ids() {
        // file0 -> kept, file1 -> removed, file2 -> kept
        let posting = Posting {
            trigram: *b"xyz",
            deltas: deltas_from_ids(&[0, 1, 2]),
        };
        let mut idx = idx_with(
            &[],
            &["/a/0", "/a/1", "/a/2"],
            vec![posting, Posting::sentinel()],
        );
        prune_files(&mut idx, &[b"/a/1".to_vec()], &[1]);
        assert_eq!(idx.names.entries, vec![b"/a/0".to_vec(), b"/a/2".to_vec()]);
        assert_eq!(idx.postings[0].file_ids(), vec![0, 1]);
    }

    #[test]
    fn prefix_match_over_matches_by_design() {
        // "/a" is a byte prefix of "/ab" too, so pruning "/a" also drops "/ab".
        let mut idx = idx_with(&["/a", "/ab"], &["/ab/x"], vec![Posting::sentinel()]);
        prune_paths(&mut idx, &[b"/a".to_vec()]);
        assert!(idx.paths.entries.is_empty());
        assert!(idx.names.entries.is_empty());
    }
}
