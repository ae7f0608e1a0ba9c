use serde::{Deserialize, Serialize};
use std::fmt;

/// French administrative department code (e.g. "75", "2A", "971").
///
/// Used as the key of the per-department transfer-tax table. Codes are
/// compared verbatim; an unknown code is not an error and simply resolves
/// to the default rate.
///
/// # Examples
///
/// ```
/// use estimate_engine::core::department::DepartmentCode;
///
/// let paris = DepartmentCode::new("75");
/// let rhone = DepartmentCode::new("69");
/// assert_ne!(paris, rhone);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentCode(String);

impl DepartmentCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DepartmentCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
