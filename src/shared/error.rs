use thiserror::Error;

/// Typed errors for the inventory core.
///
/// Data-quality problems (missing PURLs, unknown license strings, metadata
/// shape mismatches) are never errors: the exporters skip or degrade and log
/// a warning instead. The variants here cover genuine caller mistakes, such
/// as feeding an unrecognized ecosystem name parsed from external text.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("unrecognized OSV ecosystem name: {name:?}")]
    UnknownEcosystem { name: String },

    #[error("ecosystem string is empty")]
    EmptyEcosystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ecosystem_display() {
        let error = InventoryError::UnknownEcosystem {
            name: "FancyOS".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("unrecognized OSV ecosystem"));
        assert!(display.contains("FancyOS"));
    }

    #[test]
    fn test_empty_ecosystem_display() {
        let display = format!("{}", InventoryError::EmptyEcosystem);
        assert!(display.contains("empty"));
    }
}
