use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier assigned to each node in the document tree.
/// 文件樹中每個節點的唯一識別碼。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// The kind of document node.
/// 文件節點的類型。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeKind {
    Folder {
        #[serde(default)]
        children: Vec<NodeId>,
    },
    File {
        #[serde(default)]
        content: String,
        #[serde(default)]
        edited: bool,
    },
}

impl NodeKind {
    pub fn is_folder(&self) -> bool {
        matches!(self, NodeKind::Folder { .. })
    }
}

/// Immutable document node stored in the tree arena.
/// 儲存在樹狀結構裡的不可變文件節點。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentNode {
    pub id: NodeId,
    pub name: String,
    /// `None` only for the root node.
    /// 僅根節點為 `None`。
    #[serde(default)]
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl DocumentNode {
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    pub fn is_file(&self) -> bool {
        !self.kind.is_folder()
    }

    /// Returns the text content for files, `None` for folders.
    /// 檔案節點回傳文字內容，資料夾回傳 `None`。
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content, .. } => Some(content),
            NodeKind::Folder { .. } => None,
        }
    }

    /// True once the file content has been rewritten after creation.
    /// 檔案內容在建立後曾被改寫時為真。
    pub fn edited(&self) -> bool {
        matches!(&self.kind, NodeKind::File { edited: true, .. })
    }

    pub fn child_ids(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File { .. } => &[],
        }
    }
}

#[derive(Debug, Clone)]
enum DraftKind {
    Folder,
    File { content: String },
}

/// Helper to describe a node before it is minted into the tree.
/// 在節點正式編入樹狀結構前描述其內容的輔助型別。
#[derive(Debug, Clone)]
pub struct NodeDraft {
    name: String,
    kind: DraftKind,
}

impl NodeDraft {
    /// A file draft with empty content.
    /// 內容為空白的檔案草稿。
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DraftKind::File {
                content: String::new(),
            },
        }
    }

    /// A folder draft with no children.
    /// 不含子節點的資料夾草稿。
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DraftKind::Folder,
        }
    }

    /// Seeds initial content without marking the file as edited.
    /// Has no effect on folder drafts.
    /// 填入初始內容但不標記為已編輯；對資料夾草稿無作用。
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        if let DraftKind::File { content: slot } = &mut self.kind {
            *slot = content.into();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, DraftKind::Folder)
    }

    pub(crate) fn build(self, parent: NodeId) -> DocumentNode {
        let kind = match self.kind {
            DraftKind::Folder => NodeKind::Folder {
                children: Vec::new(),
            },
            DraftKind::File { content } => NodeKind::File {
                content,
                edited: false,
            },
        };
        DocumentNode {
            id: NodeId::new(),
            name: self.name,
            parent: Some(parent),
            kind,
        }
    }
}
