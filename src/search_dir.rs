use crate::context::Category;
use crate::theme::{INDEX_FILE_NAME, IconDirectory, enumerate_theme};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

pub const SYSTEM_ICON_ROOT: &str = "/usr/share/icons";
pub const HICOLOR_ROOT: &str = "/usr/share/icons/hicolor";

/// The directories themes are looked for in.
///
/// Themes are subdirectories of `system` and `user` holding an `index.theme`.
/// `hicolor` is additionally scanned by directory name alone, see
/// [SearchRoots::hicolor_directories].
///
/// The default is `/usr/share/icons`, `$XDG_DATA_HOME/icons` (usually `~/.local/share/icons`)
/// and `/usr/share/icons/hicolor`. Construct one by hand to search elsewhere.
///
/// # Example
///
/// ```
/// use icon_bundle::SearchRoots;
///
/// let roots = SearchRoots::default();
/// assert_eq!(roots.hicolor, std::path::Path::new("/usr/share/icons/hicolor"));
/// ```
#[derive(Debug, Clone)]
pub struct SearchRoots {
    pub system: PathBuf,
    pub user: Option<PathBuf>,
    pub hicolor: PathBuf,
}

impl SearchRoots {
    /// All search roots below a single directory, laid out like a real system.
    ///
    /// `base/icons` is the system root, `base/local/icons` the user root and
    /// `base/icons/hicolor` the hicolor root.
    pub fn under(base: &Path) -> Self {
        let system = base.join("icons");

        SearchRoots {
            hicolor: system.join("hicolor"),
            user: Some(base.join("local").join("icons")),
            system,
        }
    }

    fn roots(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.system.as_path()).chain(self.user.as_deref())
    }

    /// Every `*/index.theme` directly below the system and user roots.
    ///
    /// A root that does not exist contributes nothing.
    pub fn find_theme_indices(&self) -> BTreeSet<PathBuf> {
        self.roots()
            .flat_map(|root| root.read_dir()) // read the entries in each root
            .flatten() // merge all the iterators
            .flatten() // remove Err entries
            .map(|entry| entry.path().join(INDEX_FILE_NAME))
            .filter(|index| index.is_file())
            .collect()
    }

    /// Directories two levels below the hicolor root whose name is a category folder name,
    /// e.g. `48x48/apps`.
    ///
    /// hicolor is the fallback for every theme, so its directories are taken even when its
    /// `index.theme` is missing or does not list them.
    pub fn hicolor_directories(&self) -> Vec<IconDirectory> {
        let mut directories = self
            .hicolor
            .read_dir()
            .into_iter()
            .flatten()
            .flatten()
            .flat_map(|size_dir| size_dir.path().read_dir())
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if !path.is_dir() {
                    return None;
                }

                let category = Category::from_folder_name(entry.file_name().to_str()?)?;
                let sub_dir = path.strip_prefix(&self.hicolor).ok()?.to_owned();

                Some(IconDirectory {
                    theme_root: self.hicolor.clone(),
                    sub_dir,
                    category,
                })
            })
            .collect::<Vec<_>>();

        // read_dir order is unspecified
        directories.sort_by(|a, b| a.sub_dir.cmp(&b.sub_dir));
        directories
    }

    /// Collect the icon directories of every theme, followed by the hicolor fallback
    /// directories.
    ///
    /// Theme indices that fail to parse are skipped. A directory found by both passes is only
    /// listed once.
    pub fn find_icon_directories(&self) -> Vec<IconDirectory> {
        self.icon_directories_of(&self.find_theme_indices())
    }

    /// Like [SearchRoots::find_icon_directories], for theme indices that were already found.
    pub fn icon_directories_of(&self, indices: &BTreeSet<PathBuf>) -> Vec<IconDirectory> {
        log::info!("found {} icon themes", indices.len());

        let from_themes = indices
            .iter()
            .flat_map(|index_path| match enumerate_theme(index_path) {
                Ok(directories) => directories,
                Err(e) => {
                    log::debug!("skipping theme index {index_path:?} because {e}");
                    Vec::new()
                }
            })
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        let directories = from_themes
            .into_iter()
            .chain(self.hicolor_directories())
            .filter(|dir| seen.insert(dir.clone()))
            .collect::<Vec<_>>();

        log::info!("found {} icon directories", directories.len());
        directories
    }
}

impl Default for SearchRoots {
    fn default() -> Self {
        let xdg = xdg::BaseDirectories::new();

        SearchRoots {
            system: SYSTEM_ICON_ROOT.into(),
            user: xdg.get_data_home().map(|data_home| data_home.join("icons")),
            hicolor: HICOLOR_ROOT.into(),
        }
    }
}
