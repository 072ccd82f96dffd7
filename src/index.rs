use crate::icon::{CanonicalKey, IconVariant};
use crate::theme::IconDirectory;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Every icon file found on the system, grouped by [CanonicalKey].
///
/// Each key has at least one variant. Variants keep the order they were found in.
#[derive(Debug, Default, Clone)]
pub struct SystemIndex {
    icons: BTreeMap<CanonicalKey, Vec<IconVariant>>,
}

impl SystemIndex {
    /// Index the icon files directly inside each directory. Subdirectories are not entered.
    pub fn build(directories: &[IconDirectory]) -> Self {
        let mut index = SystemIndex::default();

        for directory in directories {
            index.add_directory(directory);
        }

        log::info!("indexed {} icons", index.len());
        index
    }

    pub fn add_directory(&mut self, directory: &IconDirectory) {
        let theme_name = directory.theme_name();

        let Ok(entries) = directory.path().read_dir() else {
            log::debug!("could not read icon directory {:?}", directory.path());
            return;
        };

        let mut files = entries
            .flatten()
            .map(|entry| entry.path())
            // follows symlinks, so dangling links are left out too
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();
        files.sort();

        for path in files {
            let Some(variant) = IconVariant::from_path(&path, &theme_name, &directory.sub_dir)
            else {
                continue;
            };
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                log::debug!("skipping icon with non utf-8 name {path:?}");
                continue;
            };

            self.insert(CanonicalKey::new(directory.category, stem), variant);
        }
    }

    pub fn insert(&mut self, key: CanonicalKey, variant: IconVariant) {
        self.icons.entry(key).or_default().push(variant);
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&[IconVariant]> {
        self.icons.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.icons.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.icons.keys()
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, CanonicalKey, Vec<IconVariant>> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl FromIterator<(CanonicalKey, IconVariant)> for SystemIndex {
    fn from_iter<I: IntoIterator<Item = (CanonicalKey, IconVariant)>>(iter: I) -> Self {
        let mut index = SystemIndex::default();
        for (key, variant) in iter {
            index.insert(key, variant);
        }
        index
    }
}
