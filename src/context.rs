use std::fmt;

/// The normalized folder name an icon directory is filed under.
///
/// Themes label each of their directories with a `Context`, such as `Actions` or `MimeTypes`.
/// Only the contexts listed in [Category::from_context] are recognized; directories with any
/// other context are not indexed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Category {
    Actions,
    Apps,
    Categories,
    Devices,
    Emblems,
    Emotes,
    MimeTypes,
    Places,
    Status,
    Preferences,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Actions,
        Category::Apps,
        Category::Categories,
        Category::Devices,
        Category::Emblems,
        Category::Emotes,
        Category::MimeTypes,
        Category::Places,
        Category::Status,
        Category::Preferences,
    ];

    /// Classify a theme's raw `Context` value.
    ///
    /// Matching is exact: `actions` is not a context, `Actions` is.
    pub fn from_context(context: &str) -> Option<Self> {
        let category = match context {
            "Actions" => Category::Actions,
            // both spellings are found in the wild
            "Application" | "Applications" => Category::Apps,
            "Categories" => Category::Categories,
            "Devices" => Category::Devices,
            "Emblems" => Category::Emblems,
            "Emotes" => Category::Emotes,
            "MimeTypes" => Category::MimeTypes,
            "Places" => Category::Places,
            "Status" => Category::Status,
            "Preferences" => Category::Preferences,
            _ => return None,
        };

        Some(category)
    }

    /// Look up a category by its folder name, e.g. `mimetypes`.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.folder_name() == name)
    }

    pub fn folder_name(self) -> &'static str {
        match self {
            Category::Actions => "actions",
            Category::Apps => "apps",
            Category::Categories => "categories",
            Category::Devices => "devices",
            Category::Emblems => "emblems",
            Category::Emotes => "emotes",
            Category::MimeTypes => "mimetypes",
            Category::Places => "places",
            Category::Status => "status",
            Category::Preferences => "preferences",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}
