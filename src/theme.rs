use crate::context::Category;
use crate::theme::ThemeParseError::MissingRequiredAttribute;
use freedesktop_entry_parser::low_level::SectionBytes;
use std::path::{Component, Path, PathBuf};

pub const INDEX_FILE_NAME: &str = "index.theme";
pub const ICON_THEME_SECTION: &str = "Icon Theme";

/// A directory of icons inside a theme, together with the category its icons are filed under.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct IconDirectory {
    pub theme_root: PathBuf,
    /// Relative to `theme_root`, e.g. `16x16/actions`.
    pub sub_dir: PathBuf,
    pub category: Category,
}

impl IconDirectory {
    pub fn path(&self) -> PathBuf {
        self.theme_root.join(&self.sub_dir)
    }

    /// The theme's internal name: the final segment of its root directory.
    pub fn theme_name(&self) -> String {
        self.theme_root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Why a theme descriptor was skipped.
#[derive(Debug, thiserror::Error)]
pub enum ThemeParseError {
    #[error("failed to read the theme index")]
    Io(#[from] std::io::Error),
    #[error("the index file has no parent directory")]
    NoThemeRoot,
    #[error("missing Icon Theme section")]
    NotAnIconTheme,
    #[error("missing attribute `{0}`")]
    MissingRequiredAttribute(&'static str),
    #[error("the input wasn't in utf-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("invalid format for a freedesktop entry file")]
    ParseError(#[from] freedesktop_entry_parser::ParseError),
}

/// The parts of an `index.theme` needed to find its icon directories.
pub struct ThemeIndex {
    /// Directory names from `Directories`, in declaration order.
    pub directories: Vec<String>,
    /// One entry per section describing a listed directory.
    pub directory_indices: Vec<DirectoryIndex>,
}

impl ThemeIndex {
    pub fn parse_from_file(path: &Path) -> Result<Self, ThemeParseError> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ThemeParseError> {
        // a syntax error anywhere invalidates the whole file
        let sections = freedesktop_entry_parser::low_level::parse_entry(bytes)
            .collect::<Result<Vec<SectionBytes>, _>>()?;

        let icon_theme_section = sections
            .iter()
            .find(|section| section.title == ICON_THEME_SECTION.as_bytes())
            .ok_or(ThemeParseError::NotAnIconTheme)?;

        let directories = find_attr_req(icon_theme_section, "Directories")?
            .split(',') // comma-separated, and usually ends with a trailing comma
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();

        let directory_indices = sections
            .iter()
            .filter_map(|section| {
                let title = str::from_utf8(section.title).ok()?;

                if !directories.iter().any(|dir| dir == title) {
                    // not a listed directory, ignore
                    return None;
                }

                Some(DirectoryIndex::parse(section))
            })
            .collect::<Result<Vec<_>, ThemeParseError>>()?;

        Ok(Self {
            directories,
            directory_indices,
        })
    }

    pub fn directory_index(&self, directory_name: &str) -> Option<&DirectoryIndex> {
        self.directory_indices
            .iter()
            .find(|index| index.directory_name == directory_name)
    }

    /// Resolve the listed directories against `theme_root`.
    ///
    /// A directory is kept only if it is a plain relative path, exists, has a section with a
    /// `Context`, and that context is a recognized [Category].
    pub fn icon_directories(&self, theme_root: &Path) -> Vec<IconDirectory> {
        self.directories
            .iter()
            .filter_map(|directory_name| {
                let sub_dir = PathBuf::from(directory_name);
                // must stay below the theme root
                if !sub_dir.components().all(|c| matches!(c, Component::Normal(_))) {
                    log::debug!("ignoring {directory_name:?} outside of {theme_root:?}");
                    return None;
                }
                if !theme_root.join(&sub_dir).is_dir() {
                    return None;
                }

                let context = self.directory_index(directory_name)?.context.as_deref()?;
                let Some(category) = Category::from_context(context) else {
                    log::trace!("ignoring {directory_name} with context {context:?}");
                    return None;
                };

                Some(IconDirectory {
                    theme_root: theme_root.to_owned(),
                    sub_dir,
                    category,
                })
            })
            .collect()
    }
}

pub struct DirectoryIndex {
    pub directory_name: String,
    pub context: Option<String>,
}

impl DirectoryIndex {
    fn parse(section: &SectionBytes) -> Result<Self, ThemeParseError> {
        let dir_name = str::from_utf8(section.title)?;
        let context = find_attr(section, "Context")?;

        Ok(Self {
            directory_name: dir_name.into(),
            context: context.map(Into::into),
        })
    }
}

/// Parse the `index.theme` at `index_path` and list its icon directories.
///
/// The theme root is the directory containing the index file.
pub fn enumerate_theme(index_path: &Path) -> Result<Vec<IconDirectory>, ThemeParseError> {
    let theme_root = index_path.parent().ok_or(ThemeParseError::NoThemeRoot)?;
    let index = ThemeIndex::parse_from_file(index_path)?;

    Ok(index.icon_directories(theme_root))
}

fn find_attr<'a>(
    section: &'a SectionBytes,
    name: &str,
) -> Result<Option<&'a str>, std::str::Utf8Error> {
    section
        .attrs
        .iter()
        .find(|attr| attr.name == name.as_bytes() && attr.param.is_none())
        .map(|attr| str::from_utf8(attr.value))
        .transpose()
}

fn find_attr_req<'a>(
    section: &'a SectionBytes,
    name: &'static str,
) -> Result<&'a str, ThemeParseError> {
    find_attr(section, name)?.ok_or(MissingRequiredAttribute(name))
}

#[cfg(test)]
mod test {
    use crate::context::Category;
    use crate::theme::{IconDirectory, ThemeIndex, ThemeParseError, enumerate_theme};
    use std::error::Error;
    use std::fs;
    use std::path::Path;

    static EXAMPLE: &'static str = include_str!("../resources/example.index.theme");

    #[test]
    fn test_parse_example_theme() -> Result<(), Box<dyn Error>> {
        let index = ThemeIndex::parse(EXAMPLE.as_bytes())?;

        assert_eq!(
            index.directories,
            vec![
                "scalable/apps",
                "48x48/apps",
                "48x48/mimetypes",
                "32x32/apps",
                "32x32/status",
                "32x32/animations",
            ]
        );

        // only listed directories get an index; `ScaledDirectories` and strays are left out
        assert_eq!(index.directory_indices.len(), 6);
        assert!(index.directory_index("unlisted/places").is_none());
        assert!(index.directory_index("48x48@2/apps").is_none());

        let first_dir_index = &index.directory_indices[0];
        assert_eq!(first_dir_index.directory_name, "scalable/apps");
        assert_eq!(first_dir_index.context.as_deref(), Some("Applications"));

        let status = index.directory_index("32x32/status").unwrap();
        assert_eq!(status.context, None);

        Ok(())
    }

    #[test]
    fn test_icon_directories_filtering() -> Result<(), Box<dyn Error>> {
        let root = tempfile::tempdir()?;
        let theme_root = root.path().join("Birch");
        // every listed directory but `32x32/apps` exists
        for dir in [
            "scalable/apps",
            "48x48/apps",
            "48x48/mimetypes",
            "32x32/status",
            "32x32/animations",
        ] {
            fs::create_dir_all(theme_root.join(dir))?;
        }
        fs::write(theme_root.join("index.theme"), EXAMPLE)?;

        let directories = enumerate_theme(&theme_root.join("index.theme"))?;

        let expected = [
            ("scalable/apps", Category::Apps),
            ("48x48/apps", Category::Apps),
            ("48x48/mimetypes", Category::MimeTypes),
        ]
        .map(|(sub_dir, category)| IconDirectory {
            theme_root: theme_root.clone(),
            sub_dir: sub_dir.into(),
            category,
        });

        assert_eq!(directories, expected);
        assert_eq!(directories[0].theme_name(), "Birch");
        assert_eq!(directories[2].path(), theme_root.join("48x48/mimetypes"));

        Ok(())
    }

    #[test]
    fn test_directories_outside_theme_root() -> Result<(), Box<dyn Error>> {
        let root = tempfile::tempdir()?;
        let theme_root = root.path().join("icons/Evil");
        for dir in ["icons/Evil/48x48/apps", "outside/apps"] {
            fs::create_dir_all(root.path().join(dir))?;
        }
        let outside = root.path().join("outside/apps");
        let index = format!(
            "[Icon Theme]\nDirectories=../../outside/apps,{outside},\
             48x48/../48x48/apps,./48x48/apps,48x48/apps\n\n\
             [../../outside/apps]\nContext=Applications\n\n\
             [{outside}]\nContext=Applications\n\n\
             [48x48/../48x48/apps]\nContext=Applications\n\n\
             [./48x48/apps]\nContext=Applications\n\n\
             [48x48/apps]\nContext=Applications\n",
            outside = outside.display()
        );
        fs::write(theme_root.join("index.theme"), index)?;

        let directories = enumerate_theme(&theme_root.join("index.theme"))?;

        assert_eq!(
            directories,
            vec![IconDirectory {
                theme_root,
                sub_dir: "48x48/apps".into(),
                category: Category::Apps,
            }]
        );

        Ok(())
    }

    #[test]
    fn test_missing_icon_theme_section() {
        let result = ThemeIndex::parse(b"[Desktop Entry]\nName=Firefox\n");
        assert!(matches!(result, Err(ThemeParseError::NotAnIconTheme)));
    }

    #[test]
    fn test_missing_directories() {
        let result = ThemeIndex::parse(b"[Icon Theme]\nName=Empty\n");
        assert!(matches!(
            result,
            Err(ThemeParseError::MissingRequiredAttribute("Directories"))
        ));
    }

    #[test]
    fn test_section_order_does_not_matter() -> Result<(), Box<dyn Error>> {
        let index = ThemeIndex::parse(
            b"[16x16/actions]\nContext=Actions\n\n\
              [Icon Theme]\nName=Late\nDirectories=16x16/actions\n",
        )?;

        assert_eq!(index.directories, vec!["16x16/actions"]);
        assert_eq!(
            index.directory_index("16x16/actions").unwrap().context.as_deref(),
            Some("Actions")
        );

        Ok(())
    }

    #[test]
    fn test_unreadable_index_is_skip_reason() {
        let result = enumerate_theme(Path::new("/nonexistent/theme/index.theme"));
        assert!(matches!(result, Err(ThemeParseError::Io(_))));
    }
}
