//! Disease description and precaution lookup tables.
//!
//! Both tables are loaded once from CSV at startup and never mutated.
//!
//! | File                       | Columns |
//! |----------------------------|---------|
//! | `symptom_Description.csv`  | `Disease`, `Description` |
//! | `symptom_precaution.csv`   | `Disease`, `Precaution_1` .. `Precaution_4` |

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{RankError, Result};

/// Returned when a disease has no description row.
pub const NO_DESCRIPTION: &str = "No description";
/// Returned when a disease has no precaution row.
pub const NO_PRECAUTIONS: &str = "No precautions";

const DISEASE_COLUMN: &str = "Disease";
const DESCRIPTION_COLUMN: &str = "Description";
const PRECAUTION_COLUMNS: [&str; 4] = ["Precaution_1", "Precaution_2", "Precaution_3", "Precaution_4"];

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| RankError::Table(format!("missing column '{}'", name)))
}

/// Insert unless the key already exists. First row wins.
fn insert_first(table: &mut HashMap<String, String>, disease: String, value: String, kind: &str) {
    if let Some(existing) = table.get(&disease) {
        if *existing != value {
            warn!("Conflicting {} rows for '{}', keeping the first", kind, disease);
        }
        return;
    }
    table.insert(disease, value);
}

// ── Descriptions ────────────────────────────────────────────────────────────

/// Disease → free-text description.
#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
    entries: HashMap<String, String>,
}

impl DescriptionTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading descriptions from {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let disease_idx = column_index(&headers, DISEASE_COLUMN)?;
        let description_idx = column_index(&headers, DESCRIPTION_COLUMN)?;

        let mut entries = HashMap::new();
        for result in reader.records() {
            let record = result?;
            let Some(disease) = record.get(disease_idx) else {
                continue;
            };
            let description = record.get(description_idx).unwrap_or("").to_string();
            insert_first(&mut entries, disease.to_string(), description, "description");
        }

        info!("Loaded {} disease descriptions", entries.len());
        Ok(Self { entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, disease: &str) -> Option<&str> {
        self.entries.get(disease).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Precautions ─────────────────────────────────────────────────────────────

/// Disease → precautions joined with ", ".
#[derive(Debug, Clone, Default)]
pub struct PrecautionTable {
    entries: HashMap<String, String>,
}

impl PrecautionTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading precautions from {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Each row's four precaution cells (empty when missing) are each followed
    /// by ", " and concatenated. Exact duplicate rows are dropped, then the
    /// trailing run of ',' and ' ' is stripped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let disease_idx = column_index(&headers, DISEASE_COLUMN)?;
        let precaution_idx = PRECAUTION_COLUMNS
            .iter()
            .map(|name| column_index(&headers, name))
            .collect::<Result<Vec<_>>>()?;

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut entries = HashMap::new();
        let mut duplicates = 0usize;

        for result in reader.records() {
            let record = result?;
            let Some(disease) = record.get(disease_idx) else {
                continue;
            };

            let mut joined = String::new();
            for &idx in &precaution_idx {
                joined.push_str(record.get(idx).unwrap_or(""));
                joined.push_str(", ");
            }

            if !seen.insert((disease.to_string(), joined.clone())) {
                duplicates += 1;
                continue;
            }

            let precautions = joined.trim_end_matches(|c: char| c == ',' || c == ' ').to_string();
            insert_first(&mut entries, disease.to_string(), precautions, "precaution");
        }

        info!(
            "Loaded precautions for {} diseases ({} duplicate rows dropped)",
            entries.len(),
            duplicates
        );
        Ok(Self { entries })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, disease: &str) -> Option<&str> {
        self.entries.get(disease).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Combined ────────────────────────────────────────────────────────────────

/// Both metadata tables, with placeholder fallback on lookup.
#[derive(Debug, Clone, Default)]
pub struct DiseaseKnowledge {
    pub descriptions: DescriptionTable,
    pub precautions: PrecautionTable,
}

impl DiseaseKnowledge {
    pub fn new(descriptions: DescriptionTable, precautions: PrecautionTable) -> Self {
        Self { descriptions, precautions }
    }

    pub fn load(descriptions_path: impl AsRef<Path>, precautions_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            descriptions: DescriptionTable::from_path(descriptions_path)?,
            precautions: PrecautionTable::from_path(precautions_path)?,
        })
    }

    /// Stored description, or `NO_DESCRIPTION`.
    pub fn description(&self, disease: &str) -> &str {
        self.descriptions.get(disease).unwrap_or(NO_DESCRIPTION)
    }

    /// Stored precautions, or `NO_PRECAUTIONS`.
    pub fn precautions(&self, disease: &str) -> &str {
        self.precautions.get(disease).unwrap_or(NO_PRECAUTIONS)
    }
}
