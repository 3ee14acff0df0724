//! Hierarchy construction from the nested dataset documents.
//!
//! Nodes live in an arena indexed by [`NodeId`]. A parent is always stored
//! before its children, so walking the arena backwards visits every child
//! before its parent.

use serde::Deserialize;
use std::ops::Index;
use treemap_common::{format_number, Result, TreemapError};

/// Wire format of a dataset node.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetNode {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Child nodes. Absent or empty means leaf.
    #[serde(default)]
    pub children: Option<Vec<DatasetNode>>,
    /// Leaf value, numeric or numeric string.
    #[serde(default)]
    pub value: Option<RawValue>,
    /// Category tag, used for colour and legend.
    #[serde(default)]
    pub category: Option<String>,
}

/// A value as it appears in the source document.
///
/// The published datasets store values as strings (`"4.02"`), so the original
/// text is kept for display while [`RawValue::as_f64`] feeds the layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON number.
    Number(f64),
    /// JSON string.
    Text(String),
}

impl RawValue {
    /// Numeric value; anything unparsable or non-finite counts as 0.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if v.is_finite() {
            v
        } else {
            0.0
        }
    }

    /// Text as it should appear in attributes and tooltips.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Index of a node inside a [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A node after ids, sums and ordering have been computed.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Dotted path of names from the root, e.g. `root.Wii.Wii Sports`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category tag.
    pub category: Option<String>,
    /// Value as written in the source.
    pub raw_value: Option<RawValue>,
    /// Own value plus the values of all descendants.
    pub value: f64,
    /// Distance from the root.
    pub depth: usize,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in descending value order.
    pub children: Vec<NodeId>,
}

impl HierarchyNode {
    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A summed and sorted hierarchy.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Root of every hierarchy.
    pub const ROOT: NodeId = NodeId(0);

    /// Parses a dataset document and builds the hierarchy.
    pub fn from_json(dataset: &str, json: &[u8]) -> Result<Self> {
        let root: DatasetNode =
            serde_json::from_slice(json).map_err(|e| TreemapError::dataset_load(dataset, e))?;
        Ok(Self::build(root))
    }

    /// Builds the hierarchy: assigns ids, sums values bottom-up, then sorts
    /// siblings by descending value. Sorting is stable, so ties keep document order.
    #[must_use]
    pub fn build(root: DatasetNode) -> Self {
        let mut nodes = Vec::new();
        let mut pending = vec![(root, None::<NodeId>)];

        while let Some((data, parent)) = pending.pop() {
            let id = NodeId(nodes.len());
            let (path, depth) = match parent {
                Some(p) => {
                    let parent_node: &HierarchyNode = &nodes[p.0];
                    (format!("{}.{}", parent_node.id, data.name), parent_node.depth + 1)
                }
                None => (data.name.clone(), 0),
            };
            nodes.push(HierarchyNode {
                id: path,
                name: data.name,
                category: data.category,
                value: data.value.as_ref().map_or(0.0, RawValue::as_f64),
                raw_value: data.value,
                depth,
                parent,
                children: Vec::new(),
            });
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            // reversed so the first child is popped, and numbered, first
            for child in data.children.unwrap_or_default().into_iter().rev() {
                pending.push((child, Some(id)));
            }
        }

        for i in (0..nodes.len()).rev() {
            let sum: f64 = nodes[i].children.iter().map(|c| nodes[c.0].value).sum();
            nodes[i].value += sum;
        }

        let values: Vec<f64> = nodes.iter().map(|n| n.value).collect();
        for node in &mut nodes {
            node.children
                .sort_by(|a, b| values[b.0].total_cmp(&values[a.0]));
        }

        Self { nodes }
    }

    /// Number of nodes, internal nodes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy is empty. Never true for a built hierarchy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[Self::ROOT.0]
    }

    /// Node ids in pre-order (parent before children, children in sorted order).
    #[must_use]
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    /// Leaves in pre-order.
    #[must_use]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|id| self.nodes[id.0].is_leaf())
            .collect()
    }

    /// Distinct leaf categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<Option<String>> {
        let mut seen = Vec::new();
        for id in self.leaves() {
            let category = &self.nodes[id.0].category;
            if !seen.contains(category) {
                seen.push(category.clone());
            }
        }
        seen
    }
}

impl Index<NodeId> for Hierarchy {
    type Output = HierarchyNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemap_common::test_utils::dataset_fixtures;

    fn games() -> Hierarchy {
        Hierarchy::from_json("games", dataset_fixtures::games_json().as_bytes()).unwrap()
    }

    #[test]
    fn test_string_values_are_summed() {
        let h = games();
        let total = 82.53 + 35.52 + 32.77 + 29.8 + 24.67;
        assert!((h.root().value - total).abs() < 1e-9);
    }

    #[test]
    fn test_ids_are_dotted_paths() {
        let h = games();
        let leaf = h.leaves()[0];
        assert_eq!(h[leaf].id, "Video Game Sales Data Top 100.Wii.Wii Sports");
        assert_eq!(h[leaf].depth, 2);
    }

    #[test]
    fn test_children_sorted_by_descending_value() {
        let h = games();
        let names: Vec<&str> = h.leaves().iter().map(|id| h[*id].name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Wii Sports",
                "Mario Kart Wii",
                "Wii Sports Resort",
                "New Super Mario Bros.",
                "Nintendogs"
            ]
        );
    }

    #[test]
    fn test_ties_keep_document_order() {
        let h = Hierarchy::from_json("movies", dataset_fixtures::movies_json().as_bytes()).unwrap();
        let names: Vec<&str> = h.leaves().iter().map(|id| h[*id].name.as_str()).collect();
        let a = names.iter().position(|n| *n == "Tie A").unwrap();
        let b = names.iter().position(|n| *n == "Tie B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_raw_value_display_preserves_source_text() {
        assert_eq!(RawValue::Text("4.02".into()).display(), "4.02");
        assert_eq!(RawValue::Number(100.0).display(), "100");
        assert!((RawValue::Text(" 7 ".into()).as_f64() - 7.0).abs() < f64::EPSILON);
        assert!(RawValue::Text("n/a".into()).as_f64().abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_children_array_is_a_leaf() {
        let h = Hierarchy::from_json("x", br#"{"name":"solo","children":[]}"#).unwrap();
        assert_eq!(h.len(), 1);
        assert_eq!(h.leaves(), vec![Hierarchy::ROOT]);
    }

    #[test]
    fn test_categories_first_appearance_including_missing() {
        let json = br#"{"name":"r","children":[
            {"name":"a","category":"x","value":3},
            {"name":"b","value":2},
            {"name":"c","category":"x","value":1}
        ]}"#;
        let h = Hierarchy::from_json("x", json).unwrap();
        assert_eq!(h.categories(), vec![Some("x".to_string()), None]);
    }

    #[test]
    fn test_malformed_json_is_a_dataset_load_failure() {
        let err = Hierarchy::from_json("games", b"{not json").unwrap_err();
        assert!(err.is_dataset_load());
    }
}
