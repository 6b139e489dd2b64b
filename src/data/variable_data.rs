//! Per-variable records and the column store built from a dataset.

use super::{Column, DatasetSource, VariableInfo, VariableMetadata};
use crate::error::Result;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Why a variable was left out of the column store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The variable has this many dimensions instead of one.
    Rank(usize),
    /// The stored type is not one of the supported element kinds.
    UnsupportedKind(String),
}

/// Result of loading one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Values were read into a column.
    Loaded(Column),
    /// Nothing was read.
    Skipped(SkipReason),
}

/// A variable with its metadata and, when it could be loaded, its values.
#[derive(Debug, Clone)]
pub struct LoadedVariable {
    /// Variable index in the dataset.
    pub index: usize,
    /// Name, type and rank.
    pub info: VariableInfo,
    /// Standard name, long name and units.
    pub metadata: VariableMetadata,
    /// Values, `None` when the variable was skipped.
    pub column: Option<Column>,
}

impl LoadedVariable {
    /// Variable name.
    pub fn name(&self) -> &str {
        &self.info.name
    }
}

/// Load one variable as a column of `len` values.
///
/// Variables with a rank other than one, or with an unsupported element
/// kind, are skipped with a warning and nothing is read.
pub fn load_column<S: DatasetSource + ?Sized>(
    source: &S,
    index: usize,
    info: &VariableInfo,
    len: usize,
) -> Result<LoadOutcome> {
    if info.rank != 1 {
        warn!(
            "only 1-dimensional variables are supported, skipping {} ({} dims)",
            info.name, info.rank
        );
        return Ok(LoadOutcome::Skipped(SkipReason::Rank(info.rank)));
    }

    let Some(kind) = info.kind else {
        warn!("invalid variable type {} for {}, skipping", info.type_name, info.name);
        return Ok(LoadOutcome::Skipped(SkipReason::UnsupportedKind(
            info.type_name.clone(),
        )));
    };

    Column::load(source, index, &info.name, kind, len).map(LoadOutcome::Loaded)
}

/// Every variable of one dataset, keyed by variable index.
///
/// Each column present holds exactly [`dimension_length`](Self::dimension_length) values.
#[derive(Debug, Clone, Default)]
pub struct ColumnStore {
    dimension_length: usize,
    variables: BTreeMap<usize, LoadedVariable>,
}

impl ColumnStore {
    /// Resolve metadata and load columns for all variables in `source`.
    pub fn load<S: DatasetSource + ?Sized>(source: &S, dimension_length: usize) -> Result<Self> {
        let mut variables = BTreeMap::new();

        for index in 0..source.variable_count()? {
            let info = source.variable_info(index)?;
            info!(
                "variable: {} # dims: {} # atts: {} type: {}",
                info.name, info.rank, info.attribute_count, info.type_name
            );

            let metadata = VariableMetadata::resolve(source, index)?;
            let column = match load_column(source, index, &info, dimension_length)? {
                LoadOutcome::Loaded(column) => Some(column),
                LoadOutcome::Skipped(_) => None,
            };

            variables.insert(
                index,
                LoadedVariable {
                    index,
                    info,
                    metadata,
                    column,
                },
            );
        }

        Ok(Self {
            dimension_length,
            variables,
        })
    }

    /// Length of the shared dimension.
    pub fn dimension_length(&self) -> usize {
        self.dimension_length
    }

    /// Number of variables, loaded or not.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the dataset had no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All variables in index order.
    pub fn variables(&self) -> impl Iterator<Item = &LoadedVariable> {
        self.variables.values()
    }

    /// Variables that have a column, in index order.
    pub fn loaded(&self) -> impl Iterator<Item = (&LoadedVariable, &Column)> {
        self.variables
            .values()
            .filter_map(|v| v.column.as_ref().map(|c| (v, c)))
    }

    /// The variable with this index.
    pub fn get(&self, index: usize) -> Option<&LoadedVariable> {
        self.variables.get(&index)
    }

    /// Column of the variable with this index, if it was loaded.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.get(index).and_then(|v| v.column.as_ref())
    }

    /// Number of variables that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.variables.values().filter(|v| v.column.is_none()).count()
    }
}
