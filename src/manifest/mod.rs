//! Application package inspection: binary manifest, resource table and dex lookups

pub mod apk;
pub mod arsc;
pub mod axml;
mod chunk;
mod model;

pub use apk::{ApkArchive, ApkError, find_apk, find_apks, fingerprint};
pub use arsc::{ArscError, ResourceTable};
pub use axml::{AttrValue, AxmlError, XmlAttribute, XmlElement, parse_document};
pub use chunk::ChunkError;
pub use model::IntegrationModel;
