use crate::context::Category;
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker for monochrome icon variants, dropped when computing a [CanonicalKey].
pub const SYMBOLIC_SUFFIX: &str = "-symbolic";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FileType {
    Png,
    Svg,
}

impl FileType {
    pub fn from_path_ext(path: &Path) -> Option<Self> {
        let ext = path.extension()?;
        let ext = ext.to_str()?;

        if ext.eq_ignore_ascii_case("png") {
            Some(FileType::Png)
        } else if ext.eq_ignore_ascii_case("svg") {
            Some(FileType::Svg)
        } else {
            None
        }
    }
}

/// The identity of an icon across themes: `category/icon_name`.
///
/// A trailing [SYMBOLIC_SUFFIX] is stripped, so `actions/refresh-symbolic` and
/// `actions/refresh` are the same key.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(category: Category, icon_name: &str) -> Self {
        Self::normalize(format!("{category}/{icon_name}"))
    }

    /// Normalize an already joined key. Applying this twice changes nothing.
    pub fn normalize(key: impl Into<String>) -> Self {
        let mut key = key.into();
        if key.ends_with(SYMBOLIC_SUFFIX) {
            key.truncate(key.len() - SYMBOLIC_SUFFIX.len());
        }

        CanonicalKey(key)
    }

    /// Split on the first `/` into category and icon base name.
    pub fn split(&self) -> (&str, &str) {
        self.0.split_once('/').unwrap_or(("", self.0.as_str()))
    }

    pub fn category(&self) -> &str {
        self.split().0
    }

    pub fn icon_name(&self) -> &str {
        self.split().1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One concrete file backing a [CanonicalKey].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IconVariant {
    pub path: PathBuf,
    /// Final path segment of the theme root the file was found in.
    pub theme_name: String,
    /// Directory of the file, relative to the theme root.
    pub sub_dir: PathBuf,
}

impl IconVariant {
    /// Returns `None` if the file is not a recognized icon image.
    pub fn from_path(path: &Path, theme_name: &str, sub_dir: &Path) -> Option<IconVariant> {
        FileType::from_path_ext(path)?;

        Some(IconVariant {
            path: path.to_owned(),
            theme_name: theme_name.to_owned(),
            sub_dir: sub_dir.to_owned(),
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use crate::context::Category;
    use crate::icon::{CanonicalKey, FileType, IconVariant};
    use std::path::Path;

    #[test]
    fn test_symbolic_collapses() {
        let plain = CanonicalKey::new(Category::Actions, "foo");
        let symbolic = CanonicalKey::new(Category::Actions, "foo-symbolic");

        assert_eq!(plain.as_str(), "actions/foo");
        assert_eq!(plain, symbolic);
    }

    #[test]
    fn test_normalize_idempotent() {
        for key in ["actions/foo", "actions/foo-symbolic", "apps/a-symbolic-symbolic"] {
            let once = CanonicalKey::normalize(key);
            let twice = CanonicalKey::normalize(once.as_str());
            assert_eq!(once, twice);
        }

        // only one marker is removed
        assert_eq!(
            CanonicalKey::normalize("apps/a-symbolic-symbolic").as_str(),
            "apps/a-symbolic"
        );
    }

    #[test]
    fn test_split() {
        let key = CanonicalKey::new(Category::MimeTypes, "text-x-generic");
        assert_eq!(key.category(), "mimetypes");
        assert_eq!(key.icon_name(), "text-x-generic");

        // icon names containing a slash keep it, only the first one separates
        let key = CanonicalKey::normalize("apps/odd/name");
        assert_eq!(key.split(), ("apps", "odd/name"));
    }

    #[test]
    fn test_file_types() {
        assert_eq!(FileType::from_path_ext("a.png".as_ref()), Some(FileType::Png));
        assert_eq!(FileType::from_path_ext("a.SVG".as_ref()), Some(FileType::Svg));
        assert_eq!(FileType::from_path_ext("a.xpm".as_ref()), None);
        assert_eq!(FileType::from_path_ext("a.svg.bak".as_ref()), None);
        assert_eq!(FileType::from_path_ext("svg".as_ref()), None);

        let variant = IconVariant::from_path(
            "/t/Adwaita/16x16/actions/edit-copy.svg".as_ref(),
            "Adwaita",
            Path::new("16x16/actions"),
        )
        .unwrap();
        assert_eq!(variant.file_name(), "edit-copy.svg");

        let not_an_icon = IconVariant::from_path(
            "/t/Adwaita/16x16/actions/index.theme".as_ref(),
            "Adwaita",
            Path::new("16x16/actions"),
        );
        assert_eq!(not_an_icon, None);
    }
}
