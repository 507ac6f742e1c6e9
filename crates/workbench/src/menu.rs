use codebench_tree::NodeId;

/// Action produced by choosing a context-menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewFile { context: NodeId },
    NewFolder { context: NodeId },
    Rename { target: NodeId },
    Delete { target: NodeId },
    CloseOtherTabs,
}

/// A single entry in an open context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub action: MenuAction,
    pub disabled: bool,
}

impl MenuEntry {
    fn new(label: &'static str, action: MenuAction) -> Self {
        Self {
            label,
            action,
            disabled: false,
        }
    }

    fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Entries offered when right-clicking an explorer node. Deleting the root
/// is never offered as enabled.
pub fn node_menu(target: NodeId, is_root: bool) -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("New File", MenuAction::NewFile { context: target }),
        MenuEntry::new("New Folder", MenuAction::NewFolder { context: target }),
        MenuEntry::new("Rename", MenuAction::Rename { target }),
        MenuEntry::new("Delete", MenuAction::Delete { target }).disabled_if(is_root),
    ]
}

/// Entries offered when right-clicking the tab strip.
pub fn tab_strip_menu(has_active: bool) -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("Close All Except Active", MenuAction::CloseOtherTabs)
            .disabled_if(!has_active),
    ]
}

/// Single-slot context-menu coordinator, owned by the embedding shell.
///
/// Opening a menu replaces whichever menu is currently visible, so at most
/// one menu exists at any time. Invoking an entry closes the menu and hands
/// back its action; disabled entries do nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    entries: Option<Vec<MenuEntry>>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, entries: Vec<MenuEntry>) {
        self.entries = Some(entries);
    }

    pub fn is_open(&self) -> bool {
        self.entries.is_some()
    }

    pub fn entries(&self) -> Option<&[MenuEntry]> {
        self.entries.as_deref()
    }

    pub fn invoke(&mut self, index: usize) -> Option<MenuAction> {
        let entry = self.entries.as_ref()?.get(index)?;
        if entry.disabled {
            return None;
        }
        let action = entry.action;
        self.entries = None;
        Some(action)
    }

    pub fn dismiss(&mut self) {
        self.entries = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_replaces_the_visible_menu() {
        let node = NodeId::new();
        let mut menu = ContextMenu::new();
        menu.open(node_menu(node, false));
        assert_eq!(menu.entries().map(|entries| entries.len()), Some(4));

        menu.open(tab_strip_menu(true));
        assert_eq!(menu.entries().map(|entries| entries.len()), Some(1));
    }

    #[test]
    fn invoking_returns_the_action_and_closes() {
        let node = NodeId::new();
        let mut menu = ContextMenu::new();
        menu.open(node_menu(node, false));

        let action = menu.invoke(0);
        assert_eq!(action, Some(MenuAction::NewFile { context: node }));
        assert!(!menu.is_open());
    }

    #[test]
    fn disabled_entries_do_nothing() {
        let node = NodeId::new();
        let mut menu = ContextMenu::new();
        menu.open(node_menu(node, true));

        assert_eq!(menu.invoke(3), None);
        assert!(menu.is_open());
    }

    #[test]
    fn dismiss_discards_the_menu() {
        let mut menu = ContextMenu::new();
        menu.open(tab_strip_menu(false));
        menu.dismiss();
        assert!(!menu.is_open());
        assert_eq!(menu.invoke(0), None);
    }
}
