use crate::icon::{CanonicalKey, IconVariant};
use crate::mapping::MissingSet;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Component, Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const DEFAULT_OUTPUT: &str = "unmapped_system_icons.zip";
pub const SNIPPET_ENTRY_NAME: &str = "missing_mappings_snippet.yaml";

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to create archive {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read icon {path:?}")]
    ReadIcon {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write to the archive")]
    Io(#[from] std::io::Error),
    #[error("failed to write to the archive")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to serialize the mapping snippet")]
    Snippet(#[from] serde_yaml::Error),
}

/// Writes icon files and the mapping snippet into a zip archive.
///
/// Icons are stored at `category/icon_name/theme_name/sub/dir/file_name`. No two files share an
/// entry, and no file is stored twice under the same key.
pub struct BundleWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: FileOptions,
    /// Entry name -> file stored there.
    entries: HashMap<String, PathBuf>,
    /// Icon base name -> new canonical keys.
    snippet: BTreeMap<String, Vec<String>>,
    files_written: usize,
}

impl BundleWriter<BufWriter<File>> {
    /// Create (or truncate) the archive at `path`.
    pub fn create(path: &Path) -> Result<Self, BundleError> {
        let file = File::create(path).map_err(|source| BundleError::Create {
            path: path.to_owned(),
            source,
        })?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> BundleWriter<W> {
    pub fn new(writer: W) -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        BundleWriter {
            zip: ZipWriter::new(writer),
            options,
            entries: HashMap::new(),
            snippet: BTreeMap::new(),
            files_written: 0,
        }
    }

    /// Add every variant of an unmapped icon, and list the key in the snippet.
    pub fn add_missing(
        &mut self,
        key: &CanonicalKey,
        variants: &[IconVariant],
    ) -> Result<(), BundleError> {
        let snippet_keys = self.snippet.entry(key.icon_name().to_owned()).or_default();
        if !snippet_keys.iter().any(|k| k == key.as_str()) {
            snippet_keys.push(key.to_string());
        }

        for variant in variants {
            self.add_variant(key, variant)?;
        }

        Ok(())
    }

    /// Store `variant` unless this exact file is already stored for `key`.
    fn add_variant(
        &mut self,
        key: &CanonicalKey,
        variant: &IconVariant,
    ) -> Result<(), BundleError> {
        let Some(name) = self.free_entry_name(key, variant) else {
            log::trace!("{:?} is already in the bundle", variant.path);
            return Ok(());
        };

        let bytes = std::fs::read(&variant.path).map_err(|source| BundleError::ReadIcon {
            path: variant.path.clone(),
            source,
        })?;

        self.zip.start_file(name.as_str(), self.options)?;
        self.zip.write_all(&bytes)?;

        self.entries.insert(name, variant.path.clone());
        self.files_written += 1;

        Ok(())
    }

    /// Pick an unused entry name for `variant`.
    ///
    /// Two different files can only map to the same name when two theme roots share a directory
    /// name (a user theme shadowing a system one). The later one gets `~2`, `~3`, ... appended
    /// to its theme segment.
    fn free_entry_name(&self, key: &CanonicalKey, variant: &IconVariant) -> Option<String> {
        let mut n = 1;
        loop {
            let theme = match n {
                1 => variant.theme_name.clone(),
                n => format!("{}~{n}", variant.theme_name),
            };
            let name = entry_name(key, &theme, variant);

            match self.entries.get(&name) {
                None => return Some(name),
                Some(stored) if *stored == variant.path => return None,
                Some(_) => n += 1,
            }
        }
    }

    /// Write the mapping snippet and finish the archive.
    pub fn finish(mut self) -> Result<BundleStats, BundleError> {
        let snippet = serde_yaml::to_string(&self.snippet)?;

        self.zip.start_file(SNIPPET_ENTRY_NAME, self.options)?;
        self.zip.write_all(snippet.as_bytes())?;

        let mut writer = self.zip.finish()?;
        writer.flush()?;

        Ok(BundleStats {
            icons: self.snippet.values().map(Vec::len).sum(),
            files: self.files_written,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BundleStats {
    /// Canonical keys listed in the snippet.
    pub icons: usize,
    /// Icon files stored in the archive.
    pub files: usize,
}

/// `category/icon_name/theme/sub/dir/file_name`, always with `/` separators.
///
/// Only plain components of the sub-directory are kept, so the name never leaves the archive
/// root.
pub fn entry_name(key: &CanonicalKey, theme: &str, variant: &IconVariant) -> String {
    let (category, icon_name) = key.split();
    let sub_dir = variant
        .sub_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{category}/{icon_name}/{theme}/{sub_dir}/{}",
        variant.file_name()
    )
}

/// Write every variant of every missing icon, plus the snippet, to a new archive at `output`.
pub fn write_bundle(missing: &MissingSet, output: &Path) -> Result<BundleStats, BundleError> {
    let mut writer = BundleWriter::create(output)?;

    for (key, variants) in missing.iter() {
        writer.add_missing(key, variants)?;
    }

    writer.finish()
}
