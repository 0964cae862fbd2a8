//! Dataset categories and the per-invocation download selection.
//!
//! Each category is a directory under the remote module that can be mirrored
//! on its own. The local layout mirrors the remote one: `<data_dir>/<name>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named group of remote files that is downloaded independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OrbitFiles,
    Maps,
}

impl Category {
    /// All categories in download order.
    pub const ALL: [Category; 2] = [Category::OrbitFiles, Category::Maps];

    /// Directory name on both the remote and the local side.
    pub fn name(self) -> &'static str {
        match self {
            Category::OrbitFiles => "orbit_files",
            Category::Maps => "maps",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::OrbitFiles => "solar system object orbit files",
            Category::Maps => "sky maps used by metrics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        write!(
            f,
            "unknown dataset category '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the directory name, case-insensitively, with `-` allowed for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.name() == key)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Which categories to fetch in one run. Unflagged categories are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    orbit_files: bool,
    maps: bool,
}

impl Selection {
    pub fn new(orbit_files: bool, maps: bool) -> Self {
        Self { orbit_files, maps }
    }

    pub fn all() -> Self {
        Self::new(true, true)
    }

    pub fn set(&mut self, category: Category, download: bool) {
        match category {
            Category::OrbitFiles => self.orbit_files = download,
            Category::Maps => self.maps = download,
        }
    }

    pub fn is_selected(&self, category: Category) -> bool {
        match category {
            Category::OrbitFiles => self.orbit_files,
            Category::Maps => self.maps,
        }
    }

    /// Flagged categories, in `Category::ALL` order.
    pub fn selected(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| self.is_selected(*c))
    }

    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }
}

impl FromIterator<Category> for Selection {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut sel = Selection::default();
        for c in iter {
            sel.set(c, true);
        }
        sel
    }
}
