use codebench_tree::{DocumentTree, NodeId};
use serde::{Deserialize, Serialize};

/// Live name-search state over the document tree.
///
/// Results surface file identifiers only; folder matches stay reachable
/// through [`DocumentTree::search`] for callers that want them. An empty
/// query clears the results, and the owning workbench re-runs a live query
/// after every applied tree change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    query: String,
    results: Vec<NodeId>,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[NodeId] {
        &self.results
    }

    /// True while a non-empty query is live.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub(crate) fn set_query(&mut self, query: String, tree: &DocumentTree) {
        self.query = query;
        self.refresh(tree);
    }

    pub(crate) fn refresh(&mut self, tree: &DocumentTree) {
        if self.query.is_empty() {
            self.results.clear();
            return;
        }
        self.results = tree
            .search(&self.query)
            .into_iter()
            .filter(|node| node.is_file())
            .map(|node| node.id)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebench_tree::NodeDraft;

    #[test]
    fn results_carry_files_only() {
        let tree = DocumentTree::new("project");
        let root = tree.root_id();
        let folder = tree.create_node(root, NodeDraft::folder("docs")).unwrap();
        let folder_id = folder.id;
        let (tree, _) = tree.insert(root, folder).unwrap();
        let file = tree
            .create_node(folder_id, NodeDraft::file("docs.md"))
            .unwrap();
        let file_id = file.id;
        let (tree, _) = tree.insert(folder_id, file).unwrap();

        let mut search = SearchState::default();
        search.set_query("doc".into(), &tree);
        assert_eq!(search.results(), &[file_id]);
    }

    #[test]
    fn empty_query_clears_results() {
        let tree = DocumentTree::new("project");
        let root = tree.root_id();
        let file = tree.create_node(root, NodeDraft::file("a.txt")).unwrap();
        let (tree, _) = tree.insert(root, file).unwrap();

        let mut search = SearchState::default();
        search.set_query("a".into(), &tree);
        assert_eq!(search.results().len(), 1);
        assert!(search.is_active());

        search.set_query(String::new(), &tree);
        assert!(search.results().is_empty());
        assert!(!search.is_active());
    }
}
