use codebench_session::{Session, SessionError};
use codebench_tree::{DocumentTree, NodeDraft, NodeId, TreeDiff, TreeError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Command;
use crate::language;
use crate::search::SearchState;

/// Defaults applied when commands omit explicit names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbenchOptions {
    pub default_file_name: String,
    pub default_folder_name: String,
    pub root_name: String,
}

impl Default for WorkbenchOptions {
    fn default() -> Self {
        Self {
            default_file_name: "new-file.txt".into(),
            default_folder_name: "new-folder".into(),
            root_name: "project".into(),
        }
    }
}

/// Mirror of the document shown in the editor pane. `id` is `None` exactly
/// when no tab is active; the name and content always restate the canonical
/// tree record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveDocument {
    pub id: Option<NodeId>,
    pub filename: String,
    pub content: String,
}

/// Input handed to the embedded editor widget for the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPayload {
    pub file_id: NodeId,
    pub content: String,
    pub language_hint: &'static str,
}

/// A delete request parked until the user confirms or cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub target: NodeId,
    pub name: String,
}

/// What an applied command changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TreeChanged(TreeDiff),
    SessionChanged,
    TreeAndSessionChanged(TreeDiff),
    SearchRefreshed { hits: usize },
    DeletePending { target: NodeId, name: String },
    DeleteCancelled,
    Unchanged,
}

/// Rejection raised by [`Workbench::apply`]. No workbench field changes when
/// a command is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkbenchError {
    #[error("tree operation failed: {0}")]
    Tree(#[from] TreeError),
    #[error("session operation failed: {0}")]
    Session(#[from] SessionError),
    #[error("no delete request is pending")]
    NoPendingDelete,
    #[error("a delete request for '{0}' is already pending")]
    DeleteAlreadyPending(String),
}

/// Owns the document tree and tab session and applies every command as one
/// atomic step: tree mutation, session reconciliation, mirror recompute,
/// search refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbench {
    tree: DocumentTree,
    session: Session,
    active: ActiveDocument,
    search: SearchState,
    pending_delete: Option<PendingDelete>,
    options: WorkbenchOptions,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(WorkbenchOptions::default())
    }
}

impl Workbench {
    pub fn new(options: WorkbenchOptions) -> Self {
        let tree = DocumentTree::new(options.root_name.clone());
        Self::from_tree(tree, options)
    }

    pub fn from_tree(tree: DocumentTree, options: WorkbenchOptions) -> Self {
        Self {
            tree,
            session: Session::new(),
            active: ActiveDocument::default(),
            search: SearchState::default(),
            pending_delete: None,
            options,
        }
    }

    /// A workbench seeded with the demo project used by the preview shells.
    pub fn with_sample_project() -> Self {
        let options = WorkbenchOptions::default();
        let tree = sample_tree(&options.root_name);
        Self::from_tree(tree, options)
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn active(&self) -> &ActiveDocument {
        &self.active
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn options(&self) -> &WorkbenchOptions {
        &self.options
    }

    /// Editor input for the active file, or `None` when no tab is active.
    pub fn editor_payload(&self) -> Option<EditorPayload> {
        let file_id = self.active.id?;
        Some(EditorPayload {
            file_id,
            content: self.active.content.clone(),
            language_hint: language::language_hint(&self.active.filename),
        })
    }

    /// Applies one command. `Ok` reports what changed; `Err` means the
    /// command was rejected and the workbench is exactly as it was.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, WorkbenchError> {
        match self.dispatch(command) {
            Ok(outcome) => {
                debug!("applied: {outcome:?}");
                Ok(outcome)
            }
            Err(err) => {
                warn!("rejected: {err}");
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Outcome, WorkbenchError> {
        match command {
            Command::CreateFile { context, name } => {
                let name = pick_name(name, &self.options.default_file_name);
                self.create(context, NodeDraft::file(name))
            }
            Command::CreateFolder { context, name } => {
                let name = pick_name(name, &self.options.default_folder_name);
                self.create(context, NodeDraft::folder(name))
            }
            Command::Rename { target, name } => {
                let (tree, diff) = self.tree.rename(target, name)?;
                if diff.is_empty() {
                    return Ok(Outcome::Unchanged);
                }
                self.commit_tree(tree);
                Ok(Outcome::TreeChanged(diff))
            }
            Command::Edit { target, content } => {
                let (tree, diff) = self.tree.update_content(target, content)?;
                self.commit_tree(tree);
                Ok(Outcome::TreeChanged(diff))
            }
            Command::RequestDelete { target } => {
                if let Some(pending) = &self.pending_delete {
                    return Err(WorkbenchError::DeleteAlreadyPending(pending.name.clone()));
                }
                let node = self
                    .tree
                    .get(target)
                    .ok_or(TreeError::NotFound(target))?;
                if node.parent.is_none() {
                    return Err(TreeError::CannotRemoveRoot.into());
                }
                let name = node.name.clone();
                self.pending_delete = Some(PendingDelete {
                    target,
                    name: name.clone(),
                });
                Ok(Outcome::DeletePending { target, name })
            }
            Command::ConfirmDelete => {
                let pending = self
                    .pending_delete
                    .clone()
                    .ok_or(WorkbenchError::NoPendingDelete)?;
                let (tree, diff) = self.tree.remove(pending.target)?;
                self.session = self.session.prune_removed(&diff.removed);
                self.pending_delete = None;
                self.commit_tree(tree);
                Ok(Outcome::TreeAndSessionChanged(diff))
            }
            Command::CancelDelete => {
                self.pending_delete
                    .take()
                    .ok_or(WorkbenchError::NoPendingDelete)?;
                Ok(Outcome::DeleteCancelled)
            }
            Command::Open { target } => {
                let node = self
                    .tree
                    .get(target)
                    .ok_or(TreeError::NotFound(target))?;
                if node.is_folder() {
                    return Err(TreeError::NotAFile(target).into());
                }
                self.session = self.session.open(target);
                self.refresh_active();
                Ok(Outcome::SessionChanged)
            }
            Command::Close { target } => {
                self.session = self.session.close(target)?;
                self.refresh_active();
                Ok(Outcome::SessionChanged)
            }
            Command::Select { target } => {
                self.session = self.session.select(target)?;
                self.refresh_active();
                Ok(Outcome::SessionChanged)
            }
            Command::TogglePin { target } => {
                self.session = self.session.toggle_pin(target)?;
                Ok(Outcome::SessionChanged)
            }
            Command::Reorder { from, to } => {
                self.session = self.session.reorder(from, to)?;
                Ok(Outcome::SessionChanged)
            }
            Command::CloseOtherTabs => {
                if self.session.active_id().is_none() {
                    return Ok(Outcome::Unchanged);
                }
                self.session = self.session.close_all_except_active();
                Ok(Outcome::SessionChanged)
            }
            Command::SetSearchQuery { query } => {
                self.search.set_query(query, &self.tree);
                Ok(Outcome::SearchRefreshed {
                    hits: self.search.results().len(),
                })
            }
        }
    }

    fn create(&mut self, context: NodeId, draft: NodeDraft) -> Result<Outcome, WorkbenchError> {
        let parent = self.create_parent(context)?;
        let node = self.tree.create_node(parent, draft)?;
        let (tree, diff) = self.tree.insert(parent, node)?;
        self.commit_tree(tree);
        Ok(Outcome::TreeChanged(diff))
    }

    /// Creation context: folders receive the entry themselves, files place
    /// it next to themselves.
    fn create_parent(&self, context: NodeId) -> Result<NodeId, WorkbenchError> {
        let node = self
            .tree
            .get(context)
            .ok_or(TreeError::NotFound(context))?;
        if node.is_folder() {
            Ok(context)
        } else {
            Ok(self
                .tree
                .parent_of(context)
                .ok_or(TreeError::NotFound(context))?)
        }
    }

    fn commit_tree(&mut self, tree: DocumentTree) {
        self.tree = tree;
        self.search.refresh(&self.tree);
        self.refresh_active();
    }

    fn refresh_active(&mut self) {
        self.active = match self.session.active_id().and_then(|id| {
            self.tree
                .get(id)
                .map(|node| (id, node.name.clone(), node.content().unwrap_or("").to_string()))
        }) {
            Some((id, filename, content)) => ActiveDocument {
                id: Some(id),
                filename,
                content,
            },
            None => ActiveDocument::default(),
        };
    }
}

fn pick_name(name: Option<String>, default: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => default.to_string(),
    }
}

fn seed(tree: DocumentTree, parent: NodeId, draft: NodeDraft) -> (DocumentTree, NodeId) {
    // The sample layout is a trusted constant; expect is safe here.
    let node = tree
        .create_node(parent, draft)
        .expect("sample parent is a folder");
    let id = node.id;
    let (tree, _) = tree.insert(parent, node).expect("sample node is fresh");
    (tree, id)
}

fn sample_tree(root_name: &str) -> DocumentTree {
    let tree = DocumentTree::new(root_name);
    let root = tree.root_id();

    let (tree, src) = seed(tree, root, NodeDraft::folder("src"));
    let (tree, _) = seed(
        tree,
        src,
        NodeDraft::file("index.js").with_content(
            "import { mount } from \"./App\";\n\nmount(document.getElementById(\"root\"));\n",
        ),
    );
    let (tree, _) = seed(
        tree,
        src,
        NodeDraft::file("App.jsx").with_content(
            "export default function App() {\n  return <main>CodeBench</main>;\n}\n",
        ),
    );
    let (tree, components) = seed(tree, src, NodeDraft::folder("components"));
    let (tree, _) = seed(
        tree,
        components,
        NodeDraft::file("Button.jsx").with_content(
            "export function Button({ label }) {\n  return <button>{label}</button>;\n}\n",
        ),
    );
    let (tree, public) = seed(tree, root, NodeDraft::folder("public"));
    let (tree, _) = seed(
        tree,
        public,
        NodeDraft::file("index.html").with_content(
            "<!doctype html>\n<html>\n  <body><div id=\"root\"></div></body>\n</html>\n",
        ),
    );
    let (tree, _) = seed(
        tree,
        root,
        NodeDraft::file("package.json")
            .with_content("{\n  \"name\": \"codebench-sample\",\n  \"private\": true\n}\n"),
    );
    let (tree, _) = seed(
        tree,
        root,
        NodeDraft::file("README.md")
            .with_content("# Sample project\n\nSeed data for the CodeBench preview shells.\n"),
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_with_file() -> (Workbench, NodeId) {
        let mut bench = Workbench::default();
        let root = bench.tree().root_id();
        bench
            .apply(Command::CreateFile {
                context: root,
                name: Some("notes.md".into()),
            })
            .unwrap();
        let id = bench.tree().resolve_path("notes.md").unwrap();
        (bench, id)
    }

    #[test]
    fn create_defaults_names_from_options() {
        let mut bench = Workbench::default();
        let root = bench.tree().root_id();
        bench
            .apply(Command::CreateFile {
                context: root,
                name: None,
            })
            .unwrap();
        bench
            .apply(Command::CreateFolder {
                context: root,
                name: None,
            })
            .unwrap();
        assert!(bench.tree().resolve_path("new-file.txt").is_some());
        assert!(bench.tree().resolve_path("new-folder").is_some());
    }

    #[test]
    fn create_under_a_file_lands_next_to_it() {
        let (mut bench, file) = bench_with_file();
        bench
            .apply(Command::CreateFile {
                context: file,
                name: Some("sibling.md".into()),
            })
            .unwrap();
        let sibling = bench.tree().resolve_path("sibling.md").unwrap();
        assert_eq!(
            bench.tree().parent_of(sibling),
            bench.tree().parent_of(file)
        );
    }

    #[test]
    fn open_rejects_folders() {
        let mut bench = Workbench::default();
        let root = bench.tree().root_id();
        let err = bench.apply(Command::Open { target: root }).unwrap_err();
        assert_eq!(err, WorkbenchError::Tree(TreeError::NotAFile(root)));
        assert_eq!(bench.session().len(), 0);
    }

    #[test]
    fn open_fills_the_active_mirror() {
        let (mut bench, file) = bench_with_file();
        bench.apply(Command::Open { target: file }).unwrap();
        assert_eq!(bench.active().id, Some(file));
        assert_eq!(bench.active().filename, "notes.md");
        assert_eq!(bench.active().content, "");
    }

    #[test]
    fn rename_of_the_active_file_updates_the_mirror() {
        let (mut bench, file) = bench_with_file();
        bench.apply(Command::Open { target: file }).unwrap();
        bench
            .apply(Command::Rename {
                target: file,
                name: "journal.md".into(),
            })
            .unwrap();
        assert_eq!(bench.active().filename, "journal.md");
    }

    #[test]
    fn rename_to_same_name_reports_unchanged() {
        let (mut bench, file) = bench_with_file();
        let snapshot = bench.clone();
        let outcome = bench
            .apply(Command::Rename {
                target: file,
                name: "notes.md".into(),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(bench, snapshot);
    }

    #[test]
    fn edit_updates_tree_and_mirror() {
        let (mut bench, file) = bench_with_file();
        bench.apply(Command::Open { target: file }).unwrap();
        bench
            .apply(Command::Edit {
                target: file,
                content: "# Title".into(),
            })
            .unwrap();
        assert_eq!(bench.active().content, "# Title");
        assert!(bench.tree().get(file).unwrap().edited());
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let (mut bench, file) = bench_with_file();
        let outcome = bench
            .apply(Command::RequestDelete { target: file })
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::DeletePending {
                target: file,
                name: "notes.md".into()
            }
        );
        assert!(bench.tree().contains(file));

        bench.apply(Command::ConfirmDelete).unwrap();
        assert!(!bench.tree().contains(file));
        assert!(bench.pending_delete().is_none());
    }

    #[test]
    fn cancel_keeps_the_tree_intact() {
        let (mut bench, file) = bench_with_file();
        bench
            .apply(Command::RequestDelete { target: file })
            .unwrap();
        let outcome = bench.apply(Command::CancelDelete).unwrap();
        assert_eq!(outcome, Outcome::DeleteCancelled);
        assert!(bench.tree().contains(file));
        assert!(bench.pending_delete().is_none());
    }

    #[test]
    fn second_delete_request_is_rejected_while_one_is_pending() {
        let (mut bench, file) = bench_with_file();
        bench
            .apply(Command::RequestDelete { target: file })
            .unwrap();
        let err = bench
            .apply(Command::RequestDelete { target: file })
            .unwrap_err();
        assert_eq!(
            err,
            WorkbenchError::DeleteAlreadyPending("notes.md".into())
        );
    }

    #[test]
    fn confirm_without_request_is_rejected() {
        let mut bench = Workbench::default();
        assert_eq!(
            bench.apply(Command::ConfirmDelete).unwrap_err(),
            WorkbenchError::NoPendingDelete
        );
        assert_eq!(
            bench.apply(Command::CancelDelete).unwrap_err(),
            WorkbenchError::NoPendingDelete
        );
    }

    #[test]
    fn deleting_the_root_is_rejected_at_request_time() {
        let mut bench = Workbench::default();
        let root = bench.tree().root_id();
        let err = bench
            .apply(Command::RequestDelete { target: root })
            .unwrap_err();
        assert_eq!(err, WorkbenchError::Tree(TreeError::CannotRemoveRoot));
    }

    #[test]
    fn close_others_with_no_tabs_reports_unchanged() {
        let mut bench = Workbench::default();
        assert_eq!(
            bench.apply(Command::CloseOtherTabs).unwrap(),
            Outcome::Unchanged
        );
    }

    #[test]
    fn live_search_refreshes_after_tree_changes() {
        let (mut bench, file) = bench_with_file();
        bench
            .apply(Command::SetSearchQuery {
                query: "notes".into(),
            })
            .unwrap();
        assert_eq!(bench.search().results(), &[file]);

        bench
            .apply(Command::Rename {
                target: file,
                name: "journal.md".into(),
            })
            .unwrap();
        assert!(bench.search().results().is_empty());
    }

    #[test]
    fn rejected_commands_leave_the_workbench_untouched() {
        let (mut bench, file) = bench_with_file();
        bench.apply(Command::Open { target: file }).unwrap();
        let snapshot = bench.clone();

        let ghost = NodeId::new();
        assert!(bench.apply(Command::Open { target: ghost }).is_err());
        assert!(bench.apply(Command::Close { target: ghost }).is_err());
        assert!(bench
            .apply(Command::Rename {
                target: file,
                name: "  ".into()
            })
            .is_err());
        assert!(bench.apply(Command::Reorder { from: 0, to: 9 }).is_err());
        assert!(bench.apply(Command::ConfirmDelete).is_err());
        assert_eq!(bench, snapshot);
    }

    #[test]
    fn sample_project_resolves_expected_paths() {
        let bench = Workbench::with_sample_project();
        assert!(bench.tree().resolve_path("src/index.js").is_some());
        assert!(bench.tree().resolve_path("src/components/Button.jsx").is_some());
        assert!(bench.tree().resolve_path("package.json").is_some());
        assert!(bench.session().is_empty());
    }

    #[test]
    fn editor_payload_carries_a_language_hint() {
        let bench = {
            let mut bench = Workbench::with_sample_project();
            let id = bench.tree().resolve_path("src/App.jsx").unwrap();
            bench.apply(Command::Open { target: id }).unwrap();
            bench
        };
        let payload = bench.editor_payload().unwrap();
        assert_eq!(payload.language_hint, "javascript");
    }
}
