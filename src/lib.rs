//! Find the icons your icon mapping table doesn't know about yet.
//!
//! Applications that ship their own icon set often keep a table from a display name to the
//! freedesktop icons it stands for (`category/icon_name`, e.g. `actions/edit-copy`).
//! This crate, `icon_bundle`, looks at every icon installed on the system, works out which ones
//! that table is missing, and packs them into a zip archive together with a YAML snippet listing
//! the new keys, ready to be sorted into the table by hand.
//!
//! # Quick start
//!
//! ```no_run
//! use icon_bundle::SearchRoots;
//! use std::path::Path;
//!
//! let report = icon_bundle::bundle_unmapped(
//!     &SearchRoots::default(),
//!     Path::new("mappings.yaml"),
//!     Path::new("unmapped_system_icons.zip"),
//! )?;
//!
//! println!("{} icons are missing a mapping", report.missing);
//! # Ok::<(), icon_bundle::Error>(())
//! ```
//!
//! # High level design
//!
//! Every step is a single pass, and each can be used on its own:
//!
//! 1.  *Finding themes*:
//!
//!     Themes are the directories under the [SearchRoots] holding an `index.theme`.
//!     [SearchRoots::find_theme_indices] lists them.
//!
//! 2.  *Finding icon directories*:
//!
//!     Each `index.theme` lists its directories and the `Context` of each one. Directories with
//!     a context this crate knows (see [Category]) become [theme::IconDirectory]s.
//!     Themes whose index cannot be parsed are skipped, see [theme::enumerate_theme].
//!     Directories of the `hicolor` fallback theme are also taken by name alone.
//!
//! 3.  *Indexing*:
//!
//!     [SystemIndex] groups every `png` and `svg` icon by its [CanonicalKey]. Symbolic icons
//!     share a key with their full color counterparts.
//!
//! 4.  *Diffing*:
//!
//!     [KnownMappings] holds the keys an existing table accounts for, and
//!     [KnownMappings::missing] yields the rest.
//!
//! 5.  *Bundling*:
//!
//!     [BundleWriter] stores every file of every missing icon, plus the snippet.

pub mod bundle;
mod context;
mod icon;
pub mod index;
pub mod mapping;
mod search_dir;
pub mod theme;

pub use bundle::{BundleStats, BundleWriter, DEFAULT_OUTPUT, SNIPPET_ENTRY_NAME};
pub use context::*;
pub use icon::*;
pub use index::SystemIndex;
pub use mapping::{KnownMappings, MissingSet};
pub use search_dir::*;

use crate::bundle::BundleError;
use crate::mapping::MappingError;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not load existing mappings from {path:?}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: MappingError,
    },
    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// What a run of [bundle_unmapped] found and wrote.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BundleReport {
    pub themes: usize,
    pub directories: usize,
    pub indexed: usize,
    pub missing: usize,
    pub files_written: usize,
}

/// Bundle every icon under `roots` that the mapping table at `mapping_path` doesn't list.
///
/// The archive at `output` is created or overwritten. A missing mapping file counts as an empty
/// table; any other problem loading it, or any problem reading an icon or writing the archive,
/// aborts the run.
pub fn bundle_unmapped(
    roots: &SearchRoots,
    mapping_path: &Path,
    output: &Path,
) -> Result<BundleReport, Error> {
    let known = KnownMappings::load(mapping_path).map_err(|source| Error::Mapping {
        path: mapping_path.to_owned(),
        source,
    })?;

    log::info!("indexing system icons");
    let themes = roots.find_theme_indices();
    let directories = roots.icon_directories_of(&themes);
    let index = SystemIndex::build(&directories);

    let missing = known.missing(&index);
    log::info!("found {} missing mappings", missing.len());

    let stats = bundle::write_bundle(&missing, output)?;

    Ok(BundleReport {
        themes: themes.len(),
        directories: directories.len(),
        indexed: index.len(),
        missing: missing.len(),
        files_written: stats.files,
    })
}
