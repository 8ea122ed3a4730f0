use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named schema category of lab report (e.g. Blood Group, CBC).
///
/// Read-only to the report engine: types are provisioned via the catalog
/// repository, never mutated during a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportType {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}
