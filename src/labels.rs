use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LoadError, LookupError};

/// Class ids of the classifier mapped to plant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    names: BTreeMap<i64, String>,
}

#[derive(Debug, Deserialize)]
struct LabelRecord {
    id: i64,
    name: String,
}

impl LabelTable {
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|err| LoadError::LabelTable {
            path: path.to_path_buf(),
            source: err.into(),
        })?;
        Self::from_reader(file, path)
    }

    /// Parses a CSV with at least the columns `id` and `name`. `origin` is
    /// only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, LoadError> {
        let table_error = |source: csv::Error| LoadError::LabelTable {
            path: origin.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers().map_err(table_error)?.clone();
        for column in ["id", "name"] {
            if !headers.iter().any(|header| header == column) {
                return Err(LoadError::MissingColumn {
                    path: origin.to_path_buf(),
                    column,
                });
            }
        }

        let mut names = BTreeMap::new();
        for record in reader.records() {
            let record: LabelRecord = record
                .and_then(|record| record.deserialize(Some(&headers)))
                .map_err(table_error)?;
            match names.entry(record.id) {
                Entry::Vacant(slot) => {
                    slot.insert(record.name);
                }
                Entry::Occupied(_) => {
                    return Err(LoadError::DuplicateLabel {
                        path: origin.to_path_buf(),
                        id: record.id,
                    })
                }
            }
        }

        if names.is_empty() {
            return Err(LoadError::EmptyLabelTable(origin.to_path_buf()));
        }
        Ok(Self { names })
    }

    /// Name of the class the model reported at `index`.
    pub fn get(&self, index: usize) -> Result<&str, LookupError> {
        i64::try_from(index)
            .ok()
            .and_then(|id| self.names.get(&id))
            .map(String::as_str)
            .ok_or(LookupError::UnknownClass { index })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.values().any(|known| known == name)
    }
}
