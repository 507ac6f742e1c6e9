//! 標籤工作階段狀態機。 / Tab-session state machine for the CodeBench shells.

use codebench_tree::NodeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 單一標籤的工作階段狀態。 / Session state tracked per open tab.
///
/// Display fields such as the file name live in the document tree; a tab
/// carries only the node identifier plus session-local flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub node: NodeId,
    pub pinned: bool,
    pub active: bool,
}

/// 依開啟順序排列的標籤列，最多一個作用中標籤。 / Ordered tab strip with at
/// most one active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    tabs: Vec<Tab>,
}

impl Session {
    /// 建立沒有任何標籤的工作階段。 / Creates a session with no open tabs.
    pub fn new() -> Self {
        Self::default()
    }

    /// 開啟或重新選取標籤；其他標籤轉為非作用中。 / Opens the tab, or
    /// re-activates it when already open; every other tab is deactivated.
    pub fn open(&self, node: NodeId) -> Session {
        let mut tabs: Vec<Tab> = self
            .tabs
            .iter()
            .map(|tab| Tab {
                active: false,
                ..*tab
            })
            .collect();
        match tabs.iter_mut().find(|tab| tab.node == node) {
            Some(tab) => tab.active = true,
            None => tabs.push(Tab {
                node,
                pinned: false,
                active: true,
            }),
        }
        Session { tabs }
    }

    /// 關閉標籤；若關閉作用中標籤，剩餘清單的最後一個接手。 / Closes the tab;
    /// closing the active one promotes the last remaining tab.
    pub fn close(&self, node: NodeId) -> Result<Session, SessionError> {
        if !self.is_open(node) {
            return Err(SessionError::TabNotOpen(node));
        }
        let was_active = self.active_id() == Some(node);
        let mut tabs: Vec<Tab> = self
            .tabs
            .iter()
            .copied()
            .filter(|tab| tab.node != node)
            .collect();
        if was_active {
            if let Some(last) = tabs.last_mut() {
                last.active = true;
            }
        }
        Ok(Session { tabs })
    }

    /// 選取既有標籤為作用中。 / Activates an already-open tab.
    pub fn select(&self, node: NodeId) -> Result<Session, SessionError> {
        if !self.is_open(node) {
            return Err(SessionError::TabNotOpen(node));
        }
        let tabs = self
            .tabs
            .iter()
            .map(|tab| Tab {
                active: tab.node == node,
                ..*tab
            })
            .collect();
        Ok(Session { tabs })
    }

    /// 切換釘選旗標；順序與作用狀態不變。 / Flips the pin flag; order and
    /// activation stay untouched.
    pub fn toggle_pin(&self, node: NodeId) -> Result<Session, SessionError> {
        if !self.is_open(node) {
            return Err(SessionError::TabNotOpen(node));
        }
        let tabs = self
            .tabs
            .iter()
            .map(|tab| {
                if tab.node == node {
                    Tab {
                        pinned: !tab.pinned,
                        ..*tab
                    }
                } else {
                    *tab
                }
            })
            .collect();
        Ok(Session { tabs })
    }

    /// 將標籤自 `from` 移至 `to`（先移除再插入）。 / Moves a tab from `from`
    /// to `to`, removing first and inserting into the shortened list.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Session, SessionError> {
        let len = self.tabs.len();
        if from >= len {
            return Err(SessionError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(SessionError::IndexOutOfRange { index: to, len });
        }
        let mut tabs = self.tabs.clone();
        let tab = tabs.remove(from);
        tabs.insert(to, tab);
        Ok(Session { tabs })
    }

    /// 僅保留作用中標籤；沒有作用中標籤時不做任何事。 / Collapses to the
    /// active tab alone; without one the session is returned unchanged.
    pub fn close_all_except_active(&self) -> Session {
        match self.active_tab() {
            Some(active) => Session { tabs: vec![*active] },
            None => self.clone(),
        }
    }

    /// 清除指向已移除節點的標籤；作用中標籤被清除時由最後一個接手。 /
    /// Drops tabs whose nodes were removed from the tree; if the active tab
    /// is dropped the last remaining tab takes over.
    pub fn prune_removed(&self, removed: &[NodeId]) -> Session {
        let had_active = self.active_id().is_some();
        let mut tabs: Vec<Tab> = self
            .tabs
            .iter()
            .copied()
            .filter(|tab| !removed.contains(&tab.node))
            .collect();
        let active_survived = tabs.iter().any(|tab| tab.active);
        if had_active && !active_survived {
            if let Some(last) = tabs.last_mut() {
                last.active = true;
            }
        }
        Session { tabs }
    }

    /// 依開啟順序列出標籤。 / Tabs in strip order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, node: NodeId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.node == node)
    }

    pub fn is_open(&self, node: NodeId) -> bool {
        self.tabs.iter().any(|tab| tab.node == node)
    }

    /// 目前作用中的標籤。 / The active tab, if any.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.active)
    }

    pub fn active_id(&self) -> Option<NodeId> {
        self.active_tab().map(|tab| tab.node)
    }

    /// 標籤在列表中的位置。 / Strip position of the tab.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.node == node)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// 工作階段操作錯誤類型。 / Session-manipulation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("tab {0} is not open")]
    TabNotOpen(NodeId),
    #[error("tab index {index} out of range for {len} open tabs")]
    IndexOutOfRange { index: usize, len: usize },
}
