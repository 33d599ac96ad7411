//! Android binary XML (AXML) decoding
//!
//! Compiled `AndroidManifest.xml` files are a `RES_XML_TYPE` chunk holding a
//! string pool, an optional resource-id map and a flat stream of namespace and
//! element chunks. This module folds that stream back into an element tree.

use super::chunk::{
    ChunkError, ChunkHeader, RES_STRING_POOL_TYPE, StringPool, read_u8, read_u16, read_u32,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

const RES_XML_TYPE: u16 = 0x0003;
const RES_XML_START_ELEMENT_TYPE: u16 = 0x0102;
const RES_XML_END_ELEMENT_TYPE: u16 = 0x0103;
const RES_XML_RESOURCE_MAP_TYPE: u16 = 0x0180;

const ATTRIBUTE_LEN: usize = 20;

pub const TYPE_REFERENCE: u8 = 0x01;
pub const TYPE_STRING: u8 = 0x03;
pub const TYPE_INT_DEC: u8 = 0x10;
pub const TYPE_INT_HEX: u8 = 0x11;
pub const TYPE_INT_BOOLEAN: u8 = 0x12;

/// Framework attribute ids we need when a build tool strips attribute names
const ANDROID_ATTRS: &[(u32, &str)] = &[
    (0x0101_0003, "name"),
    (0x0101_0024, "value"),
    (0x0101_0025, "resource"),
    (0x0101_0027, "scheme"),
    (0x0101_0028, "host"),
    (0x0101_0029, "port"),
    (0x0101_002a, "path"),
    (0x0101_002b, "pathPrefix"),
    (0x0101_002c, "pathPattern"),
    (0x0101_04ee, "autoVerify"),
];

#[derive(Error, Debug)]
pub enum AxmlError {
    #[error("Not a binary XML document (chunk type 0x{0:04x})")]
    NotBinaryXml(u16),

    #[error("Element found before the string pool")]
    MissingStringPool,

    #[error("Document has no root element")]
    Empty,

    #[error("Malformed binary XML: {0}")]
    Chunk(#[from] ChunkError),
}

/// A decoded attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    String(String),
    Reference(u32),
    Boolean(bool),
    Integer(i64),
    Other { data_type: u8, data: u32 },
}

impl AttrValue {
    fn from_typed(data_type: u8, data: u32, pool: &StringPool) -> Self {
        match data_type {
            TYPE_STRING => AttrValue::String(pool.get(data).unwrap_or_default().to_string()),
            TYPE_REFERENCE => AttrValue::Reference(data),
            TYPE_INT_BOOLEAN => AttrValue::Boolean(data != 0),
            TYPE_INT_DEC => AttrValue::Integer(data as i32 as i64),
            TYPE_INT_HEX => AttrValue::Integer(data as i64),
            _ => AttrValue::Other { data_type, data },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::Reference(id) => write!(f, "@0x{:08x}", id),
            AttrValue::Boolean(b) => write!(f, "{}", b),
            AttrValue::Integer(i) => write!(f, "{}", i),
            AttrValue::Other { data_type, data } => write!(f, "<0x{:02x}:0x{:08x}>", data_type, data),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Look up an attribute by local name, ignoring its namespace
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(AttrValue::as_str)
    }

    /// All elements below this one, in document order
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(el.children.iter().rev());
        }
        out
    }
}

/// Decode a compiled XML document into its root element
pub fn parse_document(data: &[u8]) -> Result<XmlElement, AxmlError> {
    let header = ChunkHeader::read(data, 0)?;
    if header.kind != RES_XML_TYPE {
        return Err(AxmlError::NotBinaryXml(header.kind));
    }

    let mut pool: Option<StringPool> = None;
    let mut resource_ids: Vec<u32> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    let mut offset = header.body();
    while offset + 8 <= header.end() {
        let chunk = ChunkHeader::read(data, offset)?;
        match chunk.kind {
            RES_STRING_POOL_TYPE => pool = Some(StringPool::parse(data, &chunk)?),
            RES_XML_RESOURCE_MAP_TYPE => {
                let count = (chunk.size as usize - chunk.header_size as usize) / 4;
                resource_ids = (0..count)
                    .map(|i| read_u32(data, chunk.body() + i * 4))
                    .collect::<Result<_, _>>()?;
            }
            RES_XML_START_ELEMENT_TYPE => {
                let pool = pool.as_ref().ok_or(AxmlError::MissingStringPool)?;
                stack.push(read_element(data, &chunk, pool, &resource_ids)?);
            }
            RES_XML_END_ELEMENT_TYPE => close_element(&mut stack, &mut root),
            // namespaces and CDATA carry nothing we need
            _ => {}
        }
        offset = chunk.end();
    }

    // Tolerate truncated documents with unclosed elements
    while !stack.is_empty() {
        close_element(&mut stack, &mut root);
    }

    root.ok_or(AxmlError::Empty)
}

fn close_element(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>) {
    if let Some(el) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(el),
            None => {
                if root.is_none() {
                    *root = Some(el);
                }
            }
        }
    }
}

fn read_element(
    data: &[u8],
    chunk: &ChunkHeader,
    pool: &StringPool,
    resource_ids: &[u32],
) -> Result<XmlElement, AxmlError> {
    let ext = chunk.body();
    let name = read_u32(data, ext + 4)?;
    let attr_start = read_u16(data, ext + 8)? as usize;
    let attr_size = read_u16(data, ext + 10)? as usize;
    let attr_count = read_u16(data, ext + 12)? as usize;

    if attr_count > 0 && attr_size < ATTRIBUTE_LEN {
        return Err(ChunkError::InvalidChunk {
            offset: chunk.offset,
            reason: format!("attribute size {}", attr_size),
        }
        .into());
    }

    let mut attributes = Vec::with_capacity(attr_count);
    for i in 0..attr_count {
        let at = ext + attr_start + i * attr_size;
        let ns = read_u32(data, at)?;
        let attr_name = read_u32(data, at + 4)?;
        let raw_value = read_u32(data, at + 8)?;
        let data_type = read_u8(data, at + 15)?;
        let value_data = read_u32(data, at + 16)?;

        let value = match pool.get(raw_value) {
            Some(raw) => AttrValue::String(raw.to_string()),
            _ => AttrValue::from_typed(data_type, value_data, pool),
        };

        attributes.push(XmlAttribute {
            namespace: pool.get(ns).map(str::to_string),
            name: attribute_name(attr_name, pool, resource_ids),
            value,
        });
    }

    Ok(XmlElement {
        name: pool.get(name).unwrap_or_default().to_string(),
        attributes,
        children: Vec::new(),
    })
}

fn attribute_name(index: u32, pool: &StringPool, resource_ids: &[u32]) -> String {
    match pool.get(index) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => resource_ids
            .get(index as usize)
            .and_then(|id| ANDROID_ATTRS.iter().find(|(rid, _)| rid == id))
            .map(|(_, name)| name.to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_text_xml() {
        let err = parse_document(b"<?xml version=\"1.0\"?><manifest/>").unwrap_err();
        assert!(matches!(err, AxmlError::NotBinaryXml(_) | AxmlError::Chunk(_)));
    }

    #[test]
    fn empty_document_has_no_root() {
        let mut data = Vec::new();
        data.extend_from_slice(&RES_XML_TYPE.to_le_bytes());
        data.extend_from_slice(&8u16.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        assert!(matches!(parse_document(&data), Err(AxmlError::Empty)));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let leaf = |name: &str| XmlElement {
            name: name.to_string(),
            ..Default::default()
        };
        let root = XmlElement {
            name: "manifest".into(),
            attributes: vec![],
            children: vec![
                XmlElement {
                    name: "application".into(),
                    attributes: vec![],
                    children: vec![leaf("activity"), leaf("meta-data")],
                },
                leaf("uses-permission"),
            ],
        };
        let names: Vec<&str> = root.descendants().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["application", "activity", "meta-data", "uses-permission"]);
    }

    #[test]
    fn typed_values_decode() {
        let pool = StringPool::default();
        assert_eq!(AttrValue::from_typed(TYPE_INT_BOOLEAN, 0xFFFF_FFFF, &pool), AttrValue::Boolean(true));
        assert_eq!(AttrValue::from_typed(TYPE_INT_DEC, 0xFFFF_FFFF, &pool), AttrValue::Integer(-1));
        assert_eq!(AttrValue::from_typed(TYPE_REFERENCE, 0x7f0b_0001, &pool), AttrValue::Reference(0x7f0b_0001));
        assert_eq!(AttrValue::Boolean(false).to_string(), "false");
        assert_eq!(AttrValue::String("x".into()).as_bool(), None);
    }
}
