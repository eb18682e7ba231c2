use serde::{Deserialize, Serialize};

/// A power restriction code applied between two path steps
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PowerRestrictionRange {
    pub from: String,
    pub to: String,
    pub value: String,
}

impl PowerRestrictionRange {
    #[must_use]
    pub fn new(from: &str, to: &str, value: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether both ranges span the same pair of path steps
    #[must_use]
    pub fn same_bounds(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// Whether the path step is one of the range endpoints
    #[must_use]
    pub fn references(&self, step_id: &str) -> bool {
        self.from == step_id || self.to == step_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_bounds_ignores_value() {
        let a = PowerRestrictionRange::new("a", "b", "C1US");
        let b = PowerRestrictionRange::new("a", "b", "M1US");
        let c = PowerRestrictionRange::new("a", "c", "C1US");
        assert!(a.same_bounds(&b));
        assert!(!a.same_bounds(&c));
    }

    #[test]
    fn test_references() {
        let range = PowerRestrictionRange::new("a", "b", "C1US");
        assert!(range.references("a"));
        assert!(range.references("b"));
        assert!(!range.references("c"));
    }

    #[test]
    fn test_json_shape() {
        let range: PowerRestrictionRange = serde_json::from_str(r#"{"from":"a","to":"b","value":"HLP"}"#)
            .expect("should deserialize");
        assert_eq!(range, PowerRestrictionRange::new("a", "b", "HLP"));
    }
}
