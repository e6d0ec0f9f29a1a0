//! Human and JSON summaries of a loaded snapshot.

use std::fmt;

use serde::Serialize;

use engine_component::ComponentKindId;
use engine_registry::{Registry, SnapshotStats};

use crate::demo;

/// One component kind present in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindSummary {
    pub id: ComponentKindId,
    pub name: Option<&'static str>,
    pub size: usize,
    pub count: usize,
}

/// What `engine_inspect inspect` reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub format: String,
    pub entities: u64,
    pub components: u64,
    pub kinds: Vec<KindSummary>,
}

impl SnapshotSummary {
    /// Summarise `registry` as freshly loaded with `stats`.
    pub fn new(registry: &Registry, stats: &SnapshotStats) -> Self {
        let kinds = registry
            .kinds()
            .iter()
            .map(|(id, info)| KindSummary {
                id,
                name: info.name.or_else(|| demo::known_name(id)),
                size: info.size,
                count: registry.pool_len(id),
            })
            .collect();
        Self {
            format: stats.format.to_string(),
            entities: stats.entities,
            components: stats.components,
            kinds,
        }
    }
}

impl fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "format:     {}", self.format)?;
        writeln!(f, "entities:   {}", self.entities)?;
        writeln!(f, "components: {}", self.components)?;
        for kind in &self.kinds {
            writeln!(
                f,
                "  {}  {:<12} size {:>4}  x{}",
                kind.id,
                kind.name.unwrap_or("?"),
                kind.size,
                kind.count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_component::Component;
    use engine_registry::{FormatVersion, RegistrySerializer};

    use super::*;
    use crate::demo::{Test, Transform};

    fn loaded_demo() -> (Registry, SnapshotStats) {
        let source = demo::build(3).unwrap();
        let mut bytes = Vec::new();
        RegistrySerializer::default()
            .write_to(&source, &mut bytes)
            .unwrap();

        let mut registry = Registry::new();
        let stats = RegistrySerializer::default()
            .read_from(&mut registry, bytes.as_slice())
            .unwrap();
        (registry, stats)
    }

    #[test]
    fn test_summary_counts_kinds() {
        let (registry, stats) = loaded_demo();
        let summary = SnapshotSummary::new(&registry, &stats);

        assert_eq!(summary.format, FormatVersion::V1.to_string());
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.components, 4);

        let transform = summary
            .kinds
            .iter()
            .find(|k| k.id == Transform::kind_id())
            .unwrap();
        assert_eq!(transform.name, Some("Transform"));
        assert_eq!(transform.size, 8);
        assert_eq!(transform.count, 3);

        let test = summary
            .kinds
            .iter()
            .find(|k| k.id == Test::kind_id())
            .unwrap();
        assert_eq!(test.size, 12);
        assert_eq!(test.count, 1);
    }

    #[test]
    fn test_summary_json() {
        let (registry, stats) = loaded_demo();
        let json = serde_json::to_value(SnapshotSummary::new(&registry, &stats)).unwrap();
        assert_eq!(json["entities"], 3);
        assert_eq!(json["kinds"].as_array().unwrap().len(), 2);
        assert!(json["kinds"][0]["id"].is_u64());
    }

    #[test]
    fn test_summary_display_lists_every_kind() {
        let (registry, stats) = loaded_demo();
        let text = SnapshotSummary::new(&registry, &stats).to_string();
        assert!(text.contains("entities:   3"));
        assert!(text.contains("Transform"));
        assert!(text.contains("Test"));
    }
}
