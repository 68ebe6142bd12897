//! The folder catalog: a fixed set of folders and the file records shown in them.

use std::{collections::HashMap, fs, path::Path, str::FromStr};

use color_eyre::{
    Result,
    eyre::{WrapErr, bail, eyre},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{info, warn};

/// The folders the sidebar offers, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FolderId {
    Documents,
    Images,
    Music,
}

impl FolderId {
    pub fn label(self) -> &'static str {
        match self {
            FolderId::Documents => "Documents",
            FolderId::Images => "Images",
            FolderId::Music => "Music",
        }
    }

    fn key(self) -> &'static str {
        match self {
            FolderId::Documents => "documents",
            FolderId::Images => "images",
            FolderId::Music => "music",
        }
    }
}

/// What a file is, as far as picking its icon goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum FileKind {
    Document,
    Image,
    Audio,
    Video,
    Other,
}

impl FromStr for FileKind {
    type Err = color_eyre::Report;

    fn from_str(tag: &str) -> Result<Self> {
        let kind = match tag {
            "pdf" | "doc" => FileKind::Document,
            "image" => FileKind::Image,
            "audio" => FileKind::Audio,
            "video" => FileKind::Video,
            "other" | "file" => FileKind::Other,
            _ => bail!("unknown file type tag {tag:?}"),
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub kind: FileKind,
    /// Already formatted for display, e.g. "2.4 MB".
    pub size: String,
    /// Already formatted for display, e.g. "2024-03-15".
    pub modified: String,
}

impl FileRecord {
    pub fn new(name: &str, kind: FileKind, size: &str, modified: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            size: size.to_string(),
            modified: modified.to_string(),
        }
    }
}

/// A record as it is written in a catalog file, before the type tag is checked.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    name: String,
    #[serde(rename = "type")]
    tag: String,
    size: String,
    modified: String,
}

impl TryFrom<RawRecord> for FileRecord {
    type Error = color_eyre::Report;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let kind = raw
            .tag
            .parse::<FileKind>()
            .wrap_err_with(|| format!("in record {:?}", raw.name))?;
        Ok(Self {
            name: raw.name,
            kind,
            size: raw.size,
            modified: raw.modified,
        })
    }
}

/// Immutable mapping from every [`FolderId`] to its records in authored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    folders: HashMap<FolderId, Vec<FileRecord>>,
}

impl Catalog {
    /// Builds a catalog from explicit folder contents. Folders not listed stay empty.
    pub fn new(entries: impl IntoIterator<Item = (FolderId, Vec<FileRecord>)>) -> Self {
        let mut folders: HashMap<FolderId, Vec<FileRecord>> =
            FolderId::iter().map(|folder| (folder, Vec::new())).collect();
        for (folder, records) in entries {
            folders.insert(folder, records);
        }
        Self { folders }
    }

    /// The catalog compiled into the binary.
    pub fn seed() -> Self {
        Self::new([
            (
                FolderId::Documents,
                vec![
                    FileRecord::new(
                        "Project Proposal.pdf",
                        FileKind::Document,
                        "2.4 MB",
                        "2024-03-15",
                    ),
                    FileRecord::new(
                        "Meeting Notes.docx",
                        FileKind::Document,
                        "1.1 MB",
                        "2024-03-14",
                    ),
                ],
            ),
            (
                FolderId::Images,
                vec![
                    FileRecord::new("Vacation.jpg", FileKind::Image, "3.7 MB", "2024-03-13"),
                    FileRecord::new("Profile.png", FileKind::Image, "0.8 MB", "2024-03-12"),
                ],
            ),
            (
                FolderId::Music,
                vec![FileRecord::new(
                    "Summer Mix.mp3",
                    FileKind::Audio,
                    "8.2 MB",
                    "2024-03-11",
                )],
            ),
        ])
    }

    /// Loads a catalog from a `.json5` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read catalog {}", path.display()))?;
        let extension = path.extension().and_then(|ext| ext.to_str());
        let catalog = Self::parse(&text, extension)
            .wrap_err_with(|| format!("invalid catalog {}", path.display()))?;
        if catalog.is_empty() {
            warn!("catalog {} has no records", path.display());
        }
        info!(
            "loaded catalog from {} ({} records)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Parses catalog text in the format named by a file extension.
    fn parse(text: &str, extension: Option<&str>) -> Result<Self> {
        let raw: HashMap<String, Vec<RawRecord>> = match extension {
            Some("json5") => json5::from_str(text)?,
            Some("json") => serde_json::from_str(text)?,
            _ => bail!("unsupported catalog format {extension:?}"),
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: HashMap<String, Vec<RawRecord>>) -> Result<Self> {
        let mut entries = Vec::with_capacity(raw.len());
        for (key, records) in raw {
            let folder = FolderId::iter()
                .find(|folder| folder.key() == key)
                .ok_or_else(|| eyre!("unknown folder {key:?}"))?;
            let records = records
                .into_iter()
                .map(FileRecord::try_from)
                .collect::<Result<Vec<_>>>()?;
            entries.push((folder, records));
        }
        Ok(Self::new(entries))
    }

    pub fn records_for(&self, folder: FolderId) -> &[FileRecord] {
        self.folders
            .get(&folder)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of records over all folders.
    pub fn len(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.values().all(Vec::is_empty)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}
