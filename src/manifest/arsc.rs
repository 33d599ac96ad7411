//! Compiled resource table (`resources.arsc`) decoding
//!
//! Only simple (non-bag) entries are kept; that is all the string and
//! boolean lookups made while validating an integration need.

use super::axml::{TYPE_INT_BOOLEAN, TYPE_REFERENCE, TYPE_STRING};
use super::chunk::{
    ChunkError, ChunkHeader, NO_INDEX, RES_STRING_POOL_TYPE, StringPool, read_u8, read_u16,
    read_u32,
};
use thiserror::Error;

const RES_TABLE_TYPE: u16 = 0x0002;
const RES_TABLE_PACKAGE_TYPE: u16 = 0x0200;
const RES_TABLE_TYPE_TYPE: u16 = 0x0201;

const FLAG_COMPLEX: u16 = 0x0001;
const TYPE_FLAG_SPARSE: u8 = 0x01;
const TYPE_FLAG_OFFSET16: u8 = 0x02;
const NO_OFFSET16: u16 = 0xFFFF;

const MAX_REFERENCE_DEPTH: usize = 8;

#[derive(Error, Debug)]
pub enum ArscError {
    #[error("Not a resource table (chunk type 0x{0:04x})")]
    NotResourceTable(u16),

    #[error("Resource table has no value string pool")]
    MissingStringPool,

    #[error("Malformed resource table: {0}")]
    Chunk(#[from] ChunkError),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    type_id: u8,
    index: u16,
    key: u32,
    data_type: u8,
    data: u32,
}

#[derive(Debug, Clone)]
struct Package {
    id: u8,
    type_names: StringPool,
    key_names: StringPool,
    entries: Vec<Entry>,
}

/// Decoded resource table with id and name lookups
#[derive(Debug, Clone)]
pub struct ResourceTable {
    values: StringPool,
    packages: Vec<Package>,
}

impl ResourceTable {
    pub fn parse(data: &[u8]) -> Result<Self, ArscError> {
        let header = ChunkHeader::read(data, 0)?;
        if header.kind != RES_TABLE_TYPE {
            return Err(ArscError::NotResourceTable(header.kind));
        }

        let mut values = None;
        let mut packages = Vec::new();

        let mut offset = header.body();
        while offset + 8 <= header.end() {
            let chunk = ChunkHeader::read(data, offset)?;
            match chunk.kind {
                RES_STRING_POOL_TYPE if values.is_none() => {
                    values = Some(StringPool::parse(data, &chunk)?)
                }
                RES_TABLE_PACKAGE_TYPE => packages.push(parse_package(data, &chunk)?),
                _ => {}
            }
            offset = chunk.end();
        }

        Ok(Self {
            values: values.ok_or(ArscError::MissingStringPool)?,
            packages,
        })
    }

    /// Resolve a resource id (`0xPPTTEEEE`) to its textual value
    pub fn string_by_id(&self, id: u32) -> Option<String> {
        self.resolve(id, 0)
    }

    /// Resolve a resource by type and entry name, e.g. `("string", "app_name")`
    pub fn string_by_name(&self, type_name: &str, key: &str) -> Option<String> {
        self.packages.iter().find_map(|package| {
            let type_id = package.type_names.position(type_name)? + 1;
            let key_index = package.key_names.position(key)?;
            package
                .entries
                .iter()
                .find(|e| e.type_id as u32 == type_id && e.key == key_index)
                .and_then(|e| self.entry_text(e, 0))
        })
    }

    /// Resource id for a type and entry name
    pub fn id_of(&self, type_name: &str, key: &str) -> Option<u32> {
        self.packages.iter().find_map(|package| {
            let type_id = package.type_names.position(type_name)? + 1;
            let key_index = package.key_names.position(key)?;
            package
                .entries
                .iter()
                .find(|e| e.type_id as u32 == type_id && e.key == key_index)
                .map(|e| resource_id(package.id, e.type_id, e.index))
        })
    }

    /// Type name of a resource id, e.g. `"bool"` for `@bool/...`
    pub fn type_name(&self, id: u32) -> Option<&str> {
        let package_id = (id >> 24) as u8;
        let type_id = (id >> 16) & 0xFF;
        let package = self.packages.iter().find(|p| p.id == package_id)?;
        package.type_names.get(type_id.checked_sub(1)?)
    }

    fn resolve(&self, id: u32, depth: usize) -> Option<String> {
        let package_id = (id >> 24) as u8;
        let type_id = ((id >> 16) & 0xFF) as u8;
        let index = (id & 0xFFFF) as u16;

        self.packages
            .iter()
            .filter(|p| p.id == package_id)
            .flat_map(|p| p.entries.iter())
            .find(|e| e.type_id == type_id && e.index == index)
            .and_then(|e| self.entry_text(e, depth))
    }

    fn entry_text(&self, entry: &Entry, depth: usize) -> Option<String> {
        match entry.data_type {
            TYPE_STRING => self.values.get(entry.data).map(str::to_string),
            TYPE_INT_BOOLEAN => Some((entry.data != 0).to_string()),
            TYPE_REFERENCE if depth < MAX_REFERENCE_DEPTH => self.resolve(entry.data, depth + 1),
            _ => None,
        }
    }
}

fn resource_id(package: u8, type_id: u8, index: u16) -> u32 {
    ((package as u32) << 24) | ((type_id as u32) << 16) | index as u32
}

fn parse_package(data: &[u8], chunk: &ChunkHeader) -> Result<Package, ArscError> {
    let base = chunk.offset;
    let id = read_u32(data, base + 8)? as u8;
    // skip the fixed 128 x u16 package name
    let type_strings = read_u32(data, base + 268)? as usize;
    let key_strings = read_u32(data, base + 276)? as usize;

    let mut type_names = StringPool::default();
    let mut key_names = StringPool::default();
    let mut entries = Vec::new();

    let mut offset = chunk.body();
    while offset + 8 <= chunk.end() {
        let inner = ChunkHeader::read(data, offset)?;
        match inner.kind {
            RES_STRING_POOL_TYPE if inner.offset == base + type_strings => {
                type_names = StringPool::parse(data, &inner)?
            }
            RES_STRING_POOL_TYPE if inner.offset == base + key_strings => {
                key_names = StringPool::parse(data, &inner)?
            }
            RES_TABLE_TYPE_TYPE => read_type_chunk(data, &inner, &mut entries)?,
            _ => {}
        }
        offset = inner.end();
    }

    Ok(Package {
        id,
        type_names,
        key_names,
        entries,
    })
}

fn read_type_chunk(
    data: &[u8],
    chunk: &ChunkHeader,
    entries: &mut Vec<Entry>,
) -> Result<(), ArscError> {
    let base = chunk.offset;
    let type_id = read_u8(data, base + 8)?;
    let flags = read_u8(data, base + 9)?;
    let entry_count = read_u32(data, base + 12)? as usize;
    let entries_start = read_u32(data, base + 16)? as usize;
    let offsets_at = chunk.body();

    let mut slots: Vec<(u16, usize)> = Vec::with_capacity(entry_count.min(4096));
    if flags & TYPE_FLAG_SPARSE != 0 {
        for i in 0..entry_count {
            let index = read_u16(data, offsets_at + i * 4)?;
            let offset = read_u16(data, offsets_at + i * 4 + 2)? as usize * 4;
            slots.push((index, offset));
        }
    } else if flags & TYPE_FLAG_OFFSET16 != 0 {
        for i in 0..entry_count {
            let offset = read_u16(data, offsets_at + i * 2)?;
            if offset != NO_OFFSET16 {
                slots.push((i as u16, offset as usize * 4));
            }
        }
    } else {
        for i in 0..entry_count {
            let offset = read_u32(data, offsets_at + i * 4)?;
            if offset != NO_INDEX {
                slots.push((i as u16, offset as usize));
            }
        }
    }

    for (index, offset) in slots {
        let at = base + entries_start + offset;
        let size = read_u16(data, at)? as usize;
        let entry_flags = read_u16(data, at + 2)?;
        let key = read_u32(data, at + 4)?;
        if entry_flags & FLAG_COMPLEX != 0 {
            continue;
        }

        let value_at = at + size;
        entries.push(Entry {
            type_id,
            index,
            key,
            data_type: read_u8(data, value_at + 3)?,
            data: read_u32(data, value_at + 4)?,
        });
    }

    Ok(())
}
