//! ID generation utilities
//!
//! Path steps created by the editor (vias, power restriction boundaries) get a
//! random UUID string so they never collide with ids coming from a saved schedule.

/// Generate a new path step ID
#[must_use]
pub fn generate_path_step_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_path_step_id_produces_different_values() {
        let id1 = generate_path_step_id();
        let id2 = generate_path_step_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_many_unique_ids() {
        let mut ids = HashSet::new();
        let count = 10_000;

        for _ in 0..count {
            ids.insert(generate_path_step_id());
        }

        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = generate_path_step_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
