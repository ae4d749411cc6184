//! Default state handed to a newly provisioned account.
//!
//! The frontend owns the payload layout; these types exist only so the
//! initial document is produced with the exact field names it expects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use minkan_core::AppResult;

const ROOT_NODE_ID: &str = "root";
const DEFAULT_NODE_TYPE: &str = "custom";
const ROOT_NODE_LABEL: &str = "input";
const DEFAULT_PROJECT_NAME: &str = "New Project";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MinkanState {
    current_pj_id: String,
    projects: HashMap<String, Project>,
    /// Project id to the node ids that have a kanban card.
    kanban_index: HashMap<String, Vec<String>>,
    kanban_columns: KanbanColumns,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Project {
    id: String,
    name: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct Node {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    data: NodeData,
    position: Position,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeData {
    label: String,
    parent_id: Option<String>,
    is_done: bool,
    comments: Vec<NodeComment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeComment {
    id: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Serialize)]
struct Edge {
    id: String,
    source: String,
    target: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KanbanCardRef {
    node_id: String,
    pj_id: String,
}

#[derive(Debug, Default, Serialize)]
struct KanbanColumns {
    backlog: Vec<KanbanCardRef>,
    todo: Vec<KanbanCardRef>,
    doing: Vec<KanbanCardRef>,
    done: Vec<KanbanCardRef>,
}

/// Build the initial payload: one empty project holding a single root node.
pub fn default_payload(now: DateTime<Utc>) -> AppResult<serde_json::Value> {
    let project_id = Uuid::new_v4().simple().to_string();

    let root = Node {
        id: ROOT_NODE_ID.to_string(),
        kind: DEFAULT_NODE_TYPE.to_string(),
        data: NodeData {
            label: ROOT_NODE_LABEL.to_string(),
            parent_id: None,
            is_done: false,
            comments: Vec::new(),
        },
        position: Position { x: 0.0, y: 0.0 },
    };

    let project = Project {
        id: project_id.clone(),
        name: DEFAULT_PROJECT_NAME.to_string(),
        nodes: vec![root],
        edges: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let state = MinkanState {
        current_pj_id: project_id.clone(),
        projects: HashMap::from([(project_id.clone(), project)]),
        kanban_index: HashMap::from([(project_id, Vec::new())]),
        kanban_columns: KanbanColumns::default(),
    };

    Ok(serde_json::to_value(state)?)
}
