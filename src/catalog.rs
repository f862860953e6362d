//! Loading and querying the static catalog. The catalog is produced by a
//! build-time generation step; a copy ships inside the binary so the board
//! works without any files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{AdmissionScheduleItem, Catalog, Institution, Subject};

/// Catalog compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog at {path} is not valid")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bundled catalog is not valid")]
    Bundled(#[source] serde_json::Error),
}

/// Result of looking up the seat table for one institution unit.
#[derive(Debug)]
pub enum SeatTable<'a> {
    /// The institution is not in the catalog at all.
    NoData { institution_id: String },
    /// The institution exists. The list may be empty when it publishes no
    /// subjects for the requested unit.
    Subjects {
        institution: &'a Institution,
        subjects: &'a [Subject],
    },
}

impl SeatTable<'_> {
    /// Literal message shown instead of a table when there is nothing to show.
    pub fn no_data_message(institution_id: &str) -> String {
        format!(
            "{} এর বিষয়ভিত্তিক আসনের তথ্য পাওয়া যায়নি।",
            institution_id.to_uppercase()
        )
    }
}

impl Catalog {
    /// Parse the catalog bundled with the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        serde_json::from_str(BUNDLED_CATALOG).map_err(CatalogError::Bundled)
    }

    /// Read a catalog from disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` when given, otherwise fall back to the bundled copy.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    pub fn institution(&self, id: &str) -> Option<&Institution> {
        self.universities.iter().find(|uni| uni.id == id)
    }

    /// Resolve the subjects of `unit` at institution `id`. A missing
    /// subjects structure or unit is an empty list, a missing institution is
    /// [`SeatTable::NoData`].
    pub fn seat_table(&self, id: &str, unit: &str) -> SeatTable<'_> {
        let Some(institution) = self.institution(id) else {
            return SeatTable::NoData {
                institution_id: id.to_string(),
            };
        };

        let subjects = institution
            .subjects
            .as_ref()
            .and_then(|units| units.get(unit))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        SeatTable::Subjects {
            institution,
            subjects,
        }
    }

    /// Schedule items in catalog order, minus the ones without any date.
    pub fn visible_schedule(&self) -> Vec<&AdmissionScheduleItem> {
        self.calendar_info
            .iter()
            .filter(|item| item.is_scheduled())
            .collect()
    }
}
