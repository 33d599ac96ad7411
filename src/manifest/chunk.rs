//! Low-level chunk and string pool reading shared by the AXML and ARSC decoders

use thiserror::Error;

pub const RES_STRING_POOL_TYPE: u16 = 0x0001;
pub const NO_INDEX: u32 = 0xFFFF_FFFF;

const UTF8_FLAG: u32 = 1 << 8;
const CHUNK_HEADER_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("Unexpected end of data at offset {0}")]
    Truncated(usize),

    #[error("Invalid chunk at offset {offset}: {reason}")]
    InvalidChunk { offset: usize, reason: String },
}

pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, ChunkError> {
    data.get(offset).copied().ok_or(ChunkError::Truncated(offset))
}

pub fn read_u16(data: &[u8], offset: usize) -> Result<u16, ChunkError> {
    let bytes = data
        .get(offset..offset + 2)
        .ok_or(ChunkError::Truncated(offset))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub fn read_u32(data: &[u8], offset: usize) -> Result<u32, ChunkError> {
    let bytes = data
        .get(offset..offset + 4)
        .ok_or(ChunkError::Truncated(offset))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Common `ResChunk_header` prefix of every chunk
#[derive(Debug, Clone, Copy)]
pub struct ChunkHeader {
    pub kind: u16,
    pub header_size: u16,
    pub size: u32,
    pub offset: usize,
}

impl ChunkHeader {
    pub fn read(data: &[u8], offset: usize) -> Result<Self, ChunkError> {
        let kind = read_u16(data, offset)?;
        let header_size = read_u16(data, offset + 2)?;
        let size = read_u32(data, offset + 4)?;

        if (header_size as usize) < CHUNK_HEADER_LEN || size < header_size as u32 {
            return Err(ChunkError::InvalidChunk {
                offset,
                reason: format!("header size {} / chunk size {}", header_size, size),
            });
        }
        if offset + size as usize > data.len() {
            return Err(ChunkError::InvalidChunk {
                offset,
                reason: format!("chunk of {} bytes overruns {} byte buffer", size, data.len()),
            });
        }

        Ok(Self {
            kind,
            header_size,
            size,
            offset,
        })
    }

    /// First byte after the chunk header
    pub fn body(&self) -> usize {
        self.offset + self.header_size as usize
    }

    /// First byte after the whole chunk
    pub fn end(&self) -> usize {
        self.offset + self.size as usize
    }
}

/// Decoded `ResStringPool`
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    strings: Vec<String>,
}

impl StringPool {
    pub fn parse(data: &[u8], header: &ChunkHeader) -> Result<Self, ChunkError> {
        if header.kind != RES_STRING_POOL_TYPE {
            return Err(ChunkError::InvalidChunk {
                offset: header.offset,
                reason: format!("expected string pool, found type 0x{:04x}", header.kind),
            });
        }

        let base = header.offset;
        let count = read_u32(data, base + 8)? as usize;
        let flags = read_u32(data, base + 16)?;
        let strings_start = read_u32(data, base + 20)? as usize;
        let utf8 = flags & UTF8_FLAG != 0;

        let offsets_at = header.body();
        let mut strings = Vec::with_capacity(count.min(4096));
        for i in 0..count {
            let relative = read_u32(data, offsets_at + i * 4)? as usize;
            let at = base + strings_start + relative;
            if at >= header.end() {
                return Err(ChunkError::Truncated(at));
            }
            let value = if utf8 {
                decode_utf8(data, at)?
            } else {
                decode_utf16(data, at)?
            };
            strings.push(value);
        }

        Ok(Self { strings })
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        if index == NO_INDEX {
            return None;
        }
        self.strings.get(index as usize).map(String::as_str)
    }

    pub fn position(&self, value: &str) -> Option<u32> {
        self.strings
            .iter()
            .position(|s| s == value)
            .map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

fn utf8_length(data: &[u8], at: usize) -> Result<(usize, usize), ChunkError> {
    let first = read_u8(data, at)? as usize;
    if first & 0x80 != 0 {
        let second = read_u8(data, at + 1)? as usize;
        Ok((((first & 0x7F) << 8) | second, 2))
    } else {
        Ok((first, 1))
    }
}

fn decode_utf8(data: &[u8], at: usize) -> Result<String, ChunkError> {
    // UTF-16 length first, then the byte length we actually need
    let (_, skip_chars) = utf8_length(data, at)?;
    let (len, skip_bytes) = utf8_length(data, at + skip_chars)?;
    let start = at + skip_chars + skip_bytes;
    let bytes = data
        .get(start..start + len)
        .ok_or(ChunkError::Truncated(start))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn decode_utf16(data: &[u8], at: usize) -> Result<String, ChunkError> {
    let first = read_u16(data, at)? as usize;
    let (len, skip) = if first & 0x8000 != 0 {
        let second = read_u16(data, at + 2)? as usize;
        (((first & 0x7FFF) << 16) | second, 4)
    } else {
        (first, 2)
    };

    let start = at + skip;
    let mut units = Vec::with_capacity(len.min(4096));
    for i in 0..len {
        units.push(read_u16(data, start + i * 2)?);
    }
    Ok(String::from_utf16_lossy(&units))
}
