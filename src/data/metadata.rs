//! Descriptive metadata attached to variables.

use super::{AttributeTarget, DatasetSource};
use crate::error::Result;
use tracing::trace;

/// Attribute holding the CF standard name.
pub const STANDARD_NAME: &str = "standard_name";
/// Attribute holding the free-text long name.
pub const LONG_NAME: &str = "long_name";
/// Attribute holding the units.
pub const UNITS: &str = "units";

/// The three descriptive strings recognized on every variable.
///
/// Missing attributes resolve to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMetadata {
    /// `standard_name` attribute.
    pub standard_name: String,
    /// `long_name` attribute.
    pub long_name: String,
    /// `units` attribute.
    pub units: String,
}

impl VariableMetadata {
    /// Resolve the metadata of variable `index`.
    pub fn resolve<S: DatasetSource + ?Sized>(source: &S, index: usize) -> Result<Self> {
        let target = AttributeTarget::Variable(index);
        Ok(Self {
            standard_name: read_text_attribute(source, target, STANDARD_NAME)?.unwrap_or_default(),
            long_name: read_text_attribute(source, target, LONG_NAME)?.unwrap_or_default(),
            units: read_text_attribute(source, target, UNITS)?.unwrap_or_default(),
        })
    }
}

/// Read a text attribute, cut to its declared length.
///
/// Returns `Ok(None)` when the attribute does not exist. Bytes past the
/// declared length are dropped even if no terminator precedes them.
pub fn read_text_attribute<S: DatasetSource + ?Sized>(
    source: &S,
    target: AttributeTarget,
    name: &str,
) -> Result<Option<String>> {
    let Some(len) = source.attribute_length(target, name)? else {
        trace!("{:?} has no {} attribute", target, name);
        return Ok(None);
    };

    let mut bytes = source.read_attribute_text(target, name)?;
    bytes.truncate(len);
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
