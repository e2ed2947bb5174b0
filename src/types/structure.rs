use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FileRecord;

/// Nested view of the extracted archive. Directory nodes carry aggregate
/// counts over everything beneath them; file nodes are leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Directory {
        children: BTreeMap<String, TreeNode>,
        file_count: u64,
        total_size: u64,
    },
    File {
        size: u64,
        mime_type: String,
        last_modified: DateTime<Utc>,
    },
}

impl TreeNode {
    pub fn root() -> Self {
        TreeNode::Directory {
            children: BTreeMap::new(),
            file_count: 0,
            total_size: 0,
        }
    }

    /// Places `record` at its path, creating directory nodes on demand and
    /// bumping `file_count`/`total_size` on every ancestor along the way.
    pub fn insert(&mut self, record: &FileRecord) {
        let components: Vec<&str> = record.path.split('/').filter(|c| !c.is_empty()).collect();
        if components.is_empty() {
            return;
        }

        let mut node = self;
        for (i, component) in components.iter().enumerate() {
            let TreeNode::Directory {
                children,
                file_count,
                total_size,
            } = node
            else {
                return;
            };
            *file_count += 1;
            *total_size += record.size;

            if i == components.len() - 1 {
                children.insert(
                    component.to_string(),
                    TreeNode::File {
                        size: record.size,
                        mime_type: record.mime_type.clone(),
                        last_modified: record.last_modified,
                    },
                );
                return;
            }
            node = children.entry(component.to_string()).or_insert_with(TreeNode::root);
        }
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        match self {
            TreeNode::Directory { children, .. } => children.get(name),
            TreeNode::File { .. } => None,
        }
    }

    pub fn file_count(&self) -> u64 {
        match self {
            TreeNode::Directory { file_count, .. } => *file_count,
            TreeNode::File { .. } => 0,
        }
    }

    pub fn total_size(&self) -> u64 {
        match self {
            TreeNode::Directory { total_size, .. } => *total_size,
            TreeNode::File { size, .. } => *size,
        }
    }

    /// Plain-text listing of the tree, one entry per line, children in
    /// name order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, "");
        out
    }

    fn render_into(&self, out: &mut String, prefix: &str) {
        let TreeNode::Directory { children, .. } = self else {
            return;
        };
        let mut entries = children.iter().peekable();
        while let Some((name, child)) = entries.next() {
            let last = entries.peek().is_none();
            let connector = if last { "└── " } else { "├── " };
            match child {
                TreeNode::Directory { .. } => {
                    out.push_str(&format!("{prefix}{connector}{name}/\n"));
                    let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
                    child.render_into(out, &nested);
                }
                TreeNode::File { size, .. } => {
                    out.push_str(&format!("{prefix}{connector}{name} ({size} bytes)\n"));
                }
            }
        }
    }
}
