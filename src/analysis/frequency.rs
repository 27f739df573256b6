use crate::analysis::entities::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the entity frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    /// Trimmed surface text
    pub text: String,
    pub count: usize,
    /// Distinct labels seen for this surface text, sorted
    pub labels: Vec<String>,
}

/// Entity occurrence counts keyed by surface text, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFrequencyTable {
    rows: Vec<EntityCount>,
}

impl EntityFrequencyTable {
    /// Tallies entities by trimmed surface text.
    ///
    /// Rows are ordered by count descending; equal counts keep the order in
    /// which the text first appeared.
    pub fn from_entities(entities: &[Entity]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut rows: Vec<EntityCount> = Vec::new();

        for entity in entities {
            let text = entity.text.trim();
            if text.is_empty() {
                continue;
            }

            let i = match index.get(text).copied() {
                Some(i) => i,
                None => {
                    index.insert(text, rows.len());
                    rows.push(EntityCount {
                        text: text.to_string(),
                        count: 0,
                        labels: Vec::new(),
                    });
                    rows.len() - 1
                }
            };

            let row = &mut rows[i];
            row.count += 1;
            if let Err(pos) = row.labels.binary_search(&entity.label) {
                row.labels.insert(pos, entity.label.clone());
            }
        }

        // Stable sort keeps first-seen order among ties.
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Self { rows }
    }

    pub fn rows(&self) -> &[EntityCount] {
        &self.rows
    }

    /// Count for a surface text, zero when absent
    pub fn count(&self, text: &str) -> usize {
        self.rows
            .iter()
            .find(|row| row.text == text)
            .map_or(0, |row| row.count)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::entities::{EntityModel, EntityRecognizer};

    fn entity(text: &str, label: &str) -> Entity {
        Entity {
            text: text.to_string(),
            label: label.to_string(),
            start: 0,
            end: text.len(),
        }
    }

    #[test]
    fn test_counts_sorted_descending() {
        let table = EntityFrequencyTable::from_entities(&[
            entity("Mozilla", "ORG"),
            entity("Ferris", "PERSON"),
            entity("Ferris", "PERSON"),
            entity("Berlin", "GPE"),
            entity("Ferris", "PERSON"),
            entity("Berlin", "GPE"),
        ]);
        let rows: Vec<_> = table.rows().iter().map(|r| (r.text.as_str(), r.count)).collect();
        assert_eq!(rows, vec![("Ferris", 3), ("Berlin", 2), ("Mozilla", 1)]);
    }

    #[test]
    fn test_surface_text_is_trimmed_and_labels_kept() {
        let table = EntityFrequencyTable::from_entities(&[
            entity(" Apple", "ORG"),
            entity("Apple ", "PRODUCT"),
            entity("Apple", "ORG"),
            entity("  ", "ORG"),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].count, 3);
        assert_eq!(table.rows()[0].labels, vec!["ORG", "PRODUCT"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = EntityFrequencyTable::from_entities(&[
            entity("Zurich", "GPE"),
            entity("Amsterdam", "GPE"),
        ]);
        assert_eq!(table.rows()[0].text, "Zurich");
        assert_eq!(table.rows()[1].text, "Amsterdam");
    }

    #[test]
    fn test_repetition_reflected_after_recognition() {
        let model = EntityModel::default();
        let entities = model.recognize("Apple announced Apple Pay. Apple is a company.");
        let table = EntityFrequencyTable::from_entities(&entities);
        assert!(table.count("Apple") >= 2);
        assert_eq!(table.count("Samsung"), 0);
    }

    #[test]
    fn test_empty() {
        assert!(EntityFrequencyTable::from_entities(&[]).is_empty());
    }
}
