use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{DocumentNode, NodeDraft, NodeId, NodeKind};

/// Immutable document tree stored as an arena of shared node records.
/// Mutations return a new tree; untouched records stay shared.
/// 以共享節點記錄組成的不可變文件樹；變動會產生新樹，未變動的節點維持共享。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    revision: u64,
    root: NodeId,
    nodes: HashMap<NodeId, Arc<DocumentNode>>,
}

impl PartialEq for DocumentTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.nodes == other.nodes
    }
}

impl Eq for DocumentTree {}

impl DocumentTree {
    /// Constructs a tree holding a single folder root.
    /// 建立僅含資料夾根節點的文件樹。
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = DocumentNode {
            id: NodeId::new(),
            name: root_name.into(),
            parent: None,
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
        };
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, Arc::new(root));
        Self {
            revision: 0,
            root: root_id,
            nodes,
        }
    }

    /// Returns the identifier of the root node.
    /// 取得根節點的識別碼。
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Revision counter, bumped once per applied mutation.
    /// 修訂計數，每次套用變動遞增一次。
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: NodeId) -> Option<&Arc<DocumentNode>> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the tree, root included.
    /// 樹中的節點數量，包含根節點。
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DocumentNode>> {
        self.nodes.values()
    }

    /// Child identifiers of a folder, in display order. Empty for files
    /// and unknown identifiers.
    /// 資料夾子節點的識別碼，依顯示順序排列；檔案或未知識別碼回傳空集合。
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Folder { children }) => children,
            _ => &[],
        }
    }

    /// Parent lookup through the explicit parent link. `None` for the root
    /// and for unknown identifiers.
    /// 透過父節點連結查詢上層節點；根節點與未知識別碼回傳 `None`。
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Mints a detached node under the given parent folder. The tree itself
    /// is not modified; pass the node to [`DocumentTree::insert`].
    /// 在指定父資料夾下鑄造尚未掛載的節點；樹本身不會改變，請再以
    /// [`DocumentTree::insert`] 掛載。
    pub fn create_node(
        &self,
        parent: NodeId,
        draft: NodeDraft,
    ) -> Result<DocumentNode, TreeError> {
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(TreeError::NotFound(parent))?;
        if !parent_node.is_folder() {
            return Err(TreeError::NotAFolder(parent));
        }
        Ok(draft.build(parent))
    }

    /// Appends a detached node under the given parent folder.
    /// 將尚未掛載的節點附加到指定的父資料夾下。
    pub fn insert(
        &self,
        parent: NodeId,
        node: DocumentNode,
    ) -> Result<(Self, TreeDiff), TreeError> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        if !node.child_ids().is_empty() {
            return Err(TreeError::NotDetached(node.id));
        }
        let mut parent_copy = self.cloned_folder(parent)?;
        if let NodeKind::Folder { children } = &mut parent_copy.kind {
            children.push(node.id);
        }

        let mut inserted = node;
        inserted.parent = Some(parent);
        let id = inserted.id;

        let mut diff = TreeDiff::default();
        diff.added.push(id);
        diff.updated.push(parent);

        let mut next = self.clone();
        next.nodes.insert(parent, Arc::new(parent_copy));
        next.nodes.insert(id, Arc::new(inserted));
        next.revision = self.revision.wrapping_add(1);
        Ok((next, diff))
    }

    /// Removes the subtree rooted at `target`. The diff lists every removed
    /// identifier in depth-first order so sessions can drop dangling tabs.
    /// 移除以 `target` 為根的子樹；差異集依深度優先順序列出所有被移除的
    /// 識別碼，供工作階段清除懸空標籤。
    pub fn remove(&self, target: NodeId) -> Result<(Self, TreeDiff), TreeError> {
        let node = self
            .nodes
            .get(&target)
            .ok_or(TreeError::NotFound(target))?;
        let Some(parent_id) = node.parent else {
            return Err(TreeError::CannotRemoveRoot);
        };

        let mut removed = Vec::new();
        self.collect_subtree(target, &mut removed);

        let mut parent_copy = self.cloned_folder(parent_id)?;
        if let NodeKind::Folder { children } = &mut parent_copy.kind {
            children.retain(|&child| child != target);
        }

        let mut next = self.clone();
        next.nodes.insert(parent_id, Arc::new(parent_copy));
        for id in &removed {
            next.nodes.remove(id);
        }
        next.revision = self.revision.wrapping_add(1);

        let mut diff = TreeDiff::default();
        diff.removed = removed;
        diff.updated.push(parent_id);
        Ok((next, diff))
    }

    /// Renames a node. Renaming to the current name succeeds with an empty
    /// diff; a name that trims to nothing is rejected.
    /// 重新命名節點；改為相同名稱會成功但差異集為空，去除空白後為空的
    /// 名稱則會被拒絕。
    pub fn rename(
        &self,
        target: NodeId,
        new_name: impl Into<String>,
    ) -> Result<(Self, TreeDiff), TreeError> {
        let new_name = new_name.into();
        if new_name.trim().is_empty() {
            return Err(TreeError::EmptyName);
        }
        let node = self
            .nodes
            .get(&target)
            .ok_or(TreeError::NotFound(target))?;
        if node.name == new_name {
            return Ok((self.clone(), TreeDiff::default()));
        }

        let mut copy = (**node).clone();
        copy.name = new_name;

        let mut next = self.clone();
        next.nodes.insert(target, Arc::new(copy));
        next.revision = self.revision.wrapping_add(1);

        let mut diff = TreeDiff::default();
        diff.updated.push(target);
        Ok((next, diff))
    }

    /// Replaces file content and marks the file edited. Last write wins;
    /// the edit applies even when the text is unchanged.
    /// 取代檔案內容並標記為已編輯；採後寫優先，即使文字相同也會套用。
    pub fn update_content(
        &self,
        target: NodeId,
        content: impl Into<String>,
    ) -> Result<(Self, TreeDiff), TreeError> {
        let node = self
            .nodes
            .get(&target)
            .ok_or(TreeError::NotFound(target))?;
        if node.is_folder() {
            return Err(TreeError::NotAFile(target));
        }

        let mut copy = (**node).clone();
        copy.kind = NodeKind::File {
            content: content.into(),
            edited: true,
        };

        let mut next = self.clone();
        next.nodes.insert(target, Arc::new(copy));
        next.revision = self.revision.wrapping_add(1);

        let mut diff = TreeDiff::default();
        diff.updated.push(target);
        Ok((next, diff))
    }

    /// Case-insensitive substring search over node names, walking the tree
    /// depth-first from the root. Folders match as well as files.
    /// 對節點名稱做不分大小寫的子字串搜尋，自根節點深度優先走訪；
    /// 資料夾與檔案皆可命中。
    pub fn search(&self, query: &str) -> Vec<Arc<DocumentNode>> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        self.search_from(self.root, &needle, &mut hits);
        hits
    }

    /// Resolves a `/`-separated path of child names starting below the
    /// root. The empty path resolves to the root itself.
    /// 解析以 `/` 分隔、自根節點下層開始的名稱路徑；空路徑即根節點。
    pub fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let node = self.nodes.get(&current)?;
            current = node.child_ids().iter().copied().find(|child| {
                self.nodes
                    .get(child)
                    .map(|node| node.name == segment)
                    .unwrap_or(false)
            })?;
        }
        Some(current)
    }

    /// Path of a node below the root, the inverse of
    /// [`DocumentTree::resolve_path`]. The root maps to the empty path.
    /// 節點在根節點以下的路徑，為 [`DocumentTree::resolve_path`] 的反向
    /// 操作；根節點對應空路徑。
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut current = self.nodes.get(&id)?;
        if current.parent.is_none() {
            return Some(String::new());
        }
        let mut segments = vec![current.name.as_str()];
        while let Some(parent_id) = current.parent {
            let parent = self.nodes.get(&parent_id)?;
            if parent.parent.is_some() {
                segments.push(parent.name.as_str());
            }
            current = parent;
        }
        segments.reverse();
        Some(segments.join("/"))
    }

    fn search_from(&self, id: NodeId, needle: &str, hits: &mut Vec<Arc<DocumentNode>>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.name.to_lowercase().contains(needle) {
            hits.push(Arc::clone(node));
        }
        for &child in node.child_ids() {
            self.search_from(child, needle, hits);
        }
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in self.children_of(id) {
            self.collect_subtree(child, out);
        }
    }

    fn cloned_folder(&self, id: NodeId) -> Result<DocumentNode, TreeError> {
        let node = self.nodes.get(&id).ok_or(TreeError::NotFound(id))?;
        if !node.is_folder() {
            return Err(TreeError::NotAFolder(id));
        }
        Ok((**node).clone())
    }
}

/// Captures differences after a tree mutation.
/// 紀錄樹狀結構變動後的差異。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    pub updated: Vec<NodeId>,
}

impl TreeDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Tree-manipulation errors.
/// 文件樹操作錯誤類型。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} not found")]
    NotFound(NodeId),
    #[error("node {0} is not a folder")]
    NotAFolder(NodeId),
    #[error("node {0} is not a file")]
    NotAFile(NodeId),
    #[error("name must not be empty")]
    EmptyName,
    #[error("node {0} already exists in the tree")]
    DuplicateId(NodeId),
    #[error("the root folder cannot be removed")]
    CannotRemoveRoot,
    #[error("node {0} already carries children")]
    NotDetached(NodeId),
}
