/// Identifier plus the optional hints that travel with a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    pub id: String,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl ScanParams {
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: None,
            location: None,
        }
    }
}
