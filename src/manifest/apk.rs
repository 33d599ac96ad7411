//! APK archive access

use super::arsc::{ArscError, ResourceTable};
use super::axml::{AxmlError, XmlElement, parse_document};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::ZipArchive;

pub const MANIFEST_ENTRY: &str = "AndroidManifest.xml";
pub const RESOURCES_ENTRY: &str = "resources.arsc";

#[derive(Error, Debug)]
pub enum ApkError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to open package: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Package entry not found: {0}")]
    MissingEntry(String),

    #[error("Manifest error: {0}")]
    ManifestError(#[from] AxmlError),

    #[error("Resource table error: {0}")]
    ResourceError(#[from] ArscError),

    #[error("No .apk found under {0}")]
    NoPackage(PathBuf),
}

/// An opened application package. The file handle closes on drop.
pub struct ApkArchive {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ApkArchive {
    pub fn open(path: &Path) -> Result<Self, ApkError> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ApkError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ApkError::MissingEntry(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Decode the binary `AndroidManifest.xml`
    pub fn manifest(&mut self) -> Result<XmlElement, ApkError> {
        let bytes = self.read_entry(MANIFEST_ENTRY)?;
        Ok(parse_document(&bytes)?)
    }

    /// Decode `resources.arsc`, if the package has one
    pub fn resources(&mut self) -> Result<Option<ResourceTable>, ApkError> {
        match self.read_entry(RESOURCES_ENTRY) {
            Ok(bytes) => Ok(Some(ResourceTable::parse(&bytes)?)),
            Err(ApkError::MissingEntry(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether any dex file references the given type descriptor,
    /// e.g. `Lio/branch/referral/Branch;`
    pub fn contains_class(&mut self, descriptor: &str) -> Result<bool, ApkError> {
        let dex_names: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| is_dex_entry(n))
            .map(str::to_string)
            .collect();

        let needle = descriptor.as_bytes();
        for name in dex_names {
            let bytes = self.read_entry(&name)?;
            if bytes.windows(needle.len()).any(|w| w == needle) {
                log::debug!("Found {} in {}", descriptor, name);
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn is_dex_entry(name: &str) -> bool {
    name.starts_with("classes") && name.ends_with(".dex") && !name.contains('/')
}

/// Resolve a path to a package file: files are taken as-is, directories are
/// searched for the most recently modified `.apk`
pub fn find_apk(path: &Path) -> Result<PathBuf, ApkError> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    find_apks(path)
        .into_iter()
        .max_by_key(|p| {
            p.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        })
        .ok_or_else(|| ApkError::NoPackage(path.to_path_buf()))
}

/// All `.apk` files under a directory (e.g. `app/build/outputs/apk`)
pub fn find_apks(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(6)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("apk"))
        })
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// SHA-256 of the package file, hex encoded
pub fn fingerprint(path: &Path) -> Result<String, ApkError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
