use codebench_tree::NodeId;

/// A single user-level operation dispatched through the workbench.
///
/// `context` for the create commands may be any node: folders receive the
/// new entry as a child, files place it next to themselves. A `name` of
/// `None` falls back to the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateFile {
        context: NodeId,
        name: Option<String>,
    },
    CreateFolder {
        context: NodeId,
        name: Option<String>,
    },
    Rename {
        target: NodeId,
        name: String,
    },
    Edit {
        target: NodeId,
        content: String,
    },
    RequestDelete {
        target: NodeId,
    },
    ConfirmDelete,
    CancelDelete,
    Open {
        target: NodeId,
    },
    Close {
        target: NodeId,
    },
    Select {
        target: NodeId,
    },
    TogglePin {
        target: NodeId,
    },
    Reorder {
        from: usize,
        to: usize,
    },
    CloseOtherTabs,
    SetSearchQuery {
        query: String,
    },
}
