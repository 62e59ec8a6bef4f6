//! Container schema for B→hhh decay records.
//!
//! Column names are the original open-data branch names: `H1_PX`,
//! `H1_ProbK`, `H3_isMuon` and so on. Kinematics and PID probabilities are
//! `Float64`; `Charge` and `isMuon` are `Int32`. The schema version is
//! embedded in the Parquet footer under [`META_KEY_SCHEMA_VERSION`].

use std::collections::HashMap;

use arrow::datatypes::{DataType, Field, Schema};

/// Schema version string embedded in Parquet key-value metadata.
pub const DECAY_SCHEMA_VERSION: &str = "b2hhh_decay_v1";

/// Parquet metadata key for the schema version.
pub const META_KEY_SCHEMA_VERSION: &str = "b2hhh.schema_version";

/// Candidate column-name prefixes, slot order.
pub const CANDIDATE_PREFIXES: [&str; 3] = ["H1", "H2", "H3"];

/// Per-candidate `Float64` field suffixes, container order.
pub const FLOAT_SUFFIXES: [&str; 5] = ["PX", "PY", "PZ", "ProbK", "ProbPi"];

/// Per-candidate `Int32` field suffixes, container order.
pub const INT_SUFFIXES: [&str; 2] = ["Charge", "isMuon"];

/// Column name for candidate slot `i` (0-based) and field `suffix`.
pub fn column_name(candidate: usize, suffix: &str) -> String {
    format!("{}_{}", CANDIDATE_PREFIXES[candidate], suffix)
}

/// The fixed 21-column Arrow schema of a decay container, with the schema
/// version recorded in the footer metadata.
pub fn decay_schema() -> Schema {
    let mut fields = Vec::with_capacity(21);
    for prefix in CANDIDATE_PREFIXES {
        for suffix in FLOAT_SUFFIXES {
            fields.push(Field::new(format!("{prefix}_{suffix}"), DataType::Float64, false));
        }
        for suffix in INT_SUFFIXES {
            fields.push(Field::new(format!("{prefix}_{suffix}"), DataType::Int32, false));
        }
    }
    let metadata = HashMap::from([(
        META_KEY_SCHEMA_VERSION.to_string(),
        DECAY_SCHEMA_VERSION.to_string(),
    )]);
    Schema::new(fields).with_metadata(metadata)
}

/// Column subset a reader decodes.
///
/// The muon filter consults all three `isMuon` flags in every mode, so the
/// plot-only subset keeps them alongside `H1_PX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// All 21 columns.
    #[default]
    Full,
    /// `H1_PX` plus the three `isMuon` flags.
    PlotOnly,
}

impl Projection {
    /// Names of the columns this projection decodes, in schema order.
    pub fn column_names(self) -> Vec<String> {
        match self {
            Projection::Full => {
                let mut names = Vec::with_capacity(21);
                for i in 0..3 {
                    for suffix in FLOAT_SUFFIXES {
                        names.push(column_name(i, suffix));
                    }
                    for suffix in INT_SUFFIXES {
                        names.push(column_name(i, suffix));
                    }
                }
                names
            }
            Projection::PlotOnly => vec![
                column_name(0, "PX"),
                column_name(0, "isMuon"),
                column_name(1, "isMuon"),
                column_name(2, "isMuon"),
            ],
        }
    }
}
