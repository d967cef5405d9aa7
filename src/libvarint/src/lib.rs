// Ported from Go's binary.varint lib.
// Original code Copyright 2011 The Go Authors.  All rights reserved.
// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Byte-level primitives used by the index codec: big-endian u32 words and
//! LEB128-style unsigned varints with 7-bit groups and a high-bit
//! continuation flag.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// Reads exactly 4 bytes and returns them as a big-endian `u32`.
pub fn read_u32_be<R: Read>(r: &mut R) -> io::Result<u32> {
    r.read_u32::<BigEndian>()
}

/// Writes `v` as 4 big-endian bytes.
pub fn write_u32_be<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_u32::<BigEndian>(v)
}

/// Reads a little-endian-grouped, 7-bits-per-byte unsigned varint.
///
/// Reads bytes while the high bit is set; at least one byte is always
/// consumed. No maximum byte count is enforced: bits beyond 64 are dropped
/// rather than panicking, since the format in practice never produces more
/// than 5 bytes for a `u32`.
pub fn read_varint<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut x: u64 = 0;
    let mut s: u32 = 0;
    let mut byte = [0u8; 1];
    loop {
        r.read_exact(&mut byte)?;
        let b = byte[0];
        if b < 0x80 {
            if s < 64 {
                x |= (b as u64) << s;
            }
            return Ok(x);
        }
        if s < 64 {
            x |= ((b & 0x7f) as u64) << s;
        }
        s = s.saturating_add(7);
    }
}

/// Writes `v` as a 7-bit-group varint, continuation bit set on all but the
/// last group. Returns the number of bytes written.
pub fn write_varint<W: Write>(w: &mut W, v: u32) -> io::Result<usize> {
    let mut x = v;
    let mut n = 0usize;
    loop {
        if x < 0x80 {
            w.write_all(&[x as u8])?;
            n += 1;
            return Ok(n);
        }
        w.write_all(&[(x as u8) | 0x80])?;
        x >>= 7;
        n += 1;
    }
}

/// Returns how many bytes `write_varint` would emit for `v`. Must be kept
/// consistent with `write_varint`.
pub fn varint_size(v: u32) -> usize {
    let mut x = v;
    let mut n = 1usize;
    while x >= 0x80 {
        x >>= 7;
        n += 1;
    }
    n
}
