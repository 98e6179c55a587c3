// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ZIP member extraction for uploaded reference files.
//!
//! Reference files arrive as zipped shapefiles. Only the subset of ZIP
//! needed to pull the `.shp` member out is implemented: a local-file-header
//! walk with stored and deflate entries. Entries that defer their sizes to a
//! data descriptor are rejected rather than guessed at.

use crate::error::{Error, Result};
use flate2::read::DeflateDecoder;
use std::io::Read;

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR_FLAG: u16 = 1 << 3;

/// One extracted archive member.
#[derive(Debug, Clone)]
pub struct ArchiveMember {
    pub name: String,
    pub data: Vec<u8>,
}

/// Extract the first member whose name ends with `extension`
/// (case-insensitive), e.g. ".shp".
pub fn extract_member(bytes: &[u8], extension: &str) -> Result<ArchiveMember> {
    let wanted = extension.to_ascii_lowercase();
    for member in walk_members(bytes)? {
        let member = member?;
        if member.name.to_ascii_lowercase().ends_with(&wanted) {
            return Ok(member);
        }
    }
    Err(Error::InvalidArchive(format!(
        "no member with extension {extension}"
    )))
}

/// Iterate the archive's local file entries in storage order.
fn walk_members(bytes: &[u8]) -> Result<impl Iterator<Item = Result<ArchiveMember>> + '_> {
    if bytes.len() < 4 || read_u32(bytes, 0)? != LOCAL_HEADER_SIG {
        return Err(Error::InvalidArchive(
            "missing local file header signature".to_string(),
        ));
    }
    Ok(MemberIter { bytes, pos: 0 })
}

struct MemberIter<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Iterator for MemberIter<'_> {
    type Item = Result<ArchiveMember>;

    fn next(&mut self) -> Option<Self::Item> {
        // The central directory signature marks the end of the entries
        if self.pos + 4 > self.bytes.len() {
            return None;
        }
        match read_u32(self.bytes, self.pos) {
            Ok(sig) if sig == LOCAL_HEADER_SIG => {}
            _ => return None,
        }
        Some(self.read_entry())
    }
}

impl MemberIter<'_> {
    fn read_entry(&mut self) -> Result<ArchiveMember> {
        let base = self.pos;
        if base + 30 > self.bytes.len() {
            return Err(Error::InvalidArchive("truncated local header".to_string()));
        }
        let flags = read_u16(self.bytes, base + 6)?;
        let method = read_u16(self.bytes, base + 8)?;
        let compressed_size = read_u32(self.bytes, base + 18)? as usize;
        let uncompressed_size = read_u32(self.bytes, base + 22)? as usize;
        let name_len = read_u16(self.bytes, base + 26)? as usize;
        let extra_len = read_u16(self.bytes, base + 28)? as usize;

        if flags & DATA_DESCRIPTOR_FLAG != 0 {
            return Err(Error::InvalidArchive(
                "streaming entries (data descriptor) are not supported".to_string(),
            ));
        }

        let name_start = base + 30;
        let data_start = name_start + name_len + extra_len;
        let data_end = data_start + compressed_size;
        if data_end > self.bytes.len() {
            return Err(Error::InvalidArchive("truncated member data".to_string()));
        }

        let name = String::from_utf8_lossy(&self.bytes[name_start..name_start + name_len])
            .into_owned();
        let raw = &self.bytes[data_start..data_end];
        let data = match method {
            0 => raw.to_vec(),
            8 => inflate(raw, uncompressed_size)?,
            other => {
                return Err(Error::InvalidArchive(format!(
                    "unsupported compression method {other} for '{name}'"
                )))
            }
        };
        if data.len() != uncompressed_size {
            return Err(Error::InvalidArchive(format!(
                "'{name}': expected {uncompressed_size} bytes, inflated {}",
                data.len()
            )));
        }

        self.pos = data_end;
        Ok(ArchiveMember { name, data })
    }
}

fn inflate(raw: &[u8], size_hint: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size_hint);
    DeflateDecoder::new(raw)
        .read_to_end(&mut out)
        .map_err(|e| Error::InvalidArchive(format!("deflate failed: {e}")))?;
    Ok(out)
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| Error::InvalidArchive(format!("short read at {offset}")))
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::InvalidArchive(format!("short read at {offset}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// Build a single-member ZIP buffer (no central directory needed for the
    /// local-header walk).
    fn build_zip(entries: &[(&str, &[u8], bool)]) -> Vec<u8> {
        let mut buf = Vec::new();
        for (name, data, deflate) in entries {
            let (method, payload): (u16, Vec<u8>) = if *deflate {
                let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
                enc.write_all(data).unwrap();
                (8, enc.finish().unwrap())
            } else {
                (0, data.to_vec())
            };
            buf.extend_from_slice(&LOCAL_HEADER_SIG.to_le_bytes());
            buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
            buf.extend_from_slice(&0u16.to_le_bytes()); // flags
            buf.extend_from_slice(&method.to_le_bytes());
            buf.extend_from_slice(&[0u8; 8]); // time, date, crc
            buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(&payload);
        }
        buf
    }

    #[test]
    fn extracts_stored_member() {
        let zip = build_zip(&[("boundary.shp", b"shapefile bytes", false)]);
        let member = extract_member(&zip, ".shp").unwrap();
        assert_eq!(member.name, "boundary.shp");
        assert_eq!(member.data, b"shapefile bytes");
    }

    #[test]
    fn extracts_deflated_member_among_several() {
        let zip = build_zip(&[
            ("boundary.dbf", b"attributes", false),
            ("boundary.shp", b"the actual geometry payload", true),
        ]);
        let member = extract_member(&zip, ".shp").unwrap();
        assert_eq!(member.name, "boundary.shp");
        assert_eq!(member.data, b"the actual geometry payload");
    }

    #[test]
    fn missing_extension_is_an_error() {
        let zip = build_zip(&[("readme.txt", b"hello", false)]);
        assert!(extract_member(&zip, ".shp").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(extract_member(b"not a zip at all", ".shp").is_err());
        assert!(extract_member(b"", ".shp").is_err());
    }
}
