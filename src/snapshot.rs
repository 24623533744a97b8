use crate::model::{Node, NodeId};
use crate::tree::FamilyTree;
use anyhow::{Context, Result};
use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Invalid format: expected an array of nodes")]
    InvalidFormat,
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One exchanged node. Every field is optional on the way in, and a field of
/// the wrong JSON type falls back to its default instead of failing the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient_parent")]
    pub parent: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub level: u32,
    #[serde(deserialize_with = "lenient")]
    pub color: String,
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

// Ids are strings, but numeric ids are common in hand-written files.
fn id_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(id_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_parent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(id_text(Value::deserialize(deserializer)?))
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            name: node.name.clone(),
            parent: node.parent.as_ref().map(|p| p.to_string()),
            level: node.level,
            color: node.color.clone(),
            x: node.x,
            y: node.y,
        }
    }
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: NodeId::from(record.id),
            name: record.name,
            parent: record.parent.map(NodeId::from),
            level: record.level,
            color: record.color,
            x: record.x,
            y: record.y,
        }
    }
}

pub fn encode(tree: &FamilyTree) -> Result<String, SnapshotError> {
    let records: Vec<NodeRecord> = tree.nodes().into_iter().map(NodeRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses a snapshot. Only the outer shape is checked: the payload must be an
/// array. Elements that are not objects are skipped.
pub fn decode(text: &str) -> Result<Vec<NodeRecord>, SnapshotError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(SnapshotError::InvalidFormat);
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if !item.is_object() {
                warn!("snapshot: skipping element {}: not an object", i);
                return None;
            }
            match serde_json::from_value::<NodeRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("snapshot: skipping element {}: {}", i, e);
                    None
                }
            }
        })
        .collect();
    Ok(records)
}

/// Decodes `text` and swaps it into `tree`. On error the tree is untouched.
pub fn load_into(tree: &mut FamilyTree, text: &str) -> Result<usize, SnapshotError> {
    let records = decode(text)?;
    let count = records.len();
    tree.replace_all(records.into_iter().map(Node::from).collect());
    Ok(count)
}

pub fn load_file(tree: &mut FamilyTree, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let count = load_into(tree, &content)?;
    Ok(count)
}

pub fn save_file(tree: &FamilyTree, path: &Path) -> Result<()> {
    let content = encode(tree)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
