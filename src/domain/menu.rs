use generational_arena::{Arena, Index};
use std::fmt;
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::LayerNode;
use crate::domain::error::{DomainError, DomainResult};

/// Handle of an entry in a [`MenuTree`].
pub type MenuItem = Index;

/// What a checkable entry does when its check state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleBinding {
    /// Service header: show or hide the whole service
    Service { service: String },
    /// Sub-layer entry: run the toggle engine for `node`
    Layer { service: String, node: LayerNode },
}

/// Menu entry variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Root of the menu
    Bar { label: String },
    /// Plain row, e.g. one legend swatch
    Leaf { label: String, image: Option<String> },
    /// Checkbox row
    Checkable {
        label: String,
        image: Option<String>,
        checked: bool,
        binding: ToggleBinding,
    },
    /// Opens a submenu
    Popup { label: String },
    /// Checkbox that also opens a submenu
    CheckablePopup {
        label: String,
        checked: bool,
        binding: ToggleBinding,
    },
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Bar { label }
            | MenuEntry::Leaf { label, .. }
            | MenuEntry::Checkable { label, .. }
            | MenuEntry::Popup { label }
            | MenuEntry::CheckablePopup { label, .. } => label,
        }
    }

    pub fn checked(&self) -> Option<bool> {
        match self {
            MenuEntry::Checkable { checked, .. } | MenuEntry::CheckablePopup { checked, .. } => {
                Some(*checked)
            }
            _ => None,
        }
    }

    pub fn binding(&self) -> Option<&ToggleBinding> {
        match self {
            MenuEntry::Checkable { binding, .. } | MenuEntry::CheckablePopup { binding, .. } => {
                Some(binding)
            }
            _ => None,
        }
    }

    fn set_checked(&mut self, value: bool) -> bool {
        match self {
            MenuEntry::Checkable { checked, .. } | MenuEntry::CheckablePopup { checked, .. } => {
                *checked = value;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuEntry::Bar { label } => write!(f, "{}", label),
            MenuEntry::Leaf { label, .. } => write!(f, "· {}", label),
            MenuEntry::Checkable { label, checked, .. } => {
                write!(f, "[{}] {}", if *checked { 'x' } else { ' ' }, label)
            }
            MenuEntry::Popup { label } => write!(f, "{} ▸", label),
            MenuEntry::CheckablePopup { label, checked, .. } => {
                write!(f, "[{}] {} ▸", if *checked { 'x' } else { ' ' }, label)
            }
        }
    }
}

/// Tree node in the arena-based menu.
#[derive(Debug)]
pub struct MenuNode {
    pub entry: MenuEntry,
    /// Index of parent node in the arena, None for the bar
    pub parent: Option<Index>,
    /// Indices of child entries in display order
    pub children: Vec<Index>,
}

/// Arena-based menu: a bar at the root, popups as inner nodes.
#[derive(Debug)]
pub struct MenuTree {
    arena: Arena<MenuNode>,
    root: Index,
}

impl MenuTree {
    pub fn new(label: impl Into<String>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(MenuNode {
            entry: MenuEntry::Bar {
                label: label.into(),
            },
            parent: None,
            children: Vec::new(),
        });
        Self { arena, root }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: MenuItem, entry: MenuEntry) -> MenuItem {
        let node_idx = self.arena.insert(MenuNode {
            entry,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        node_idx
    }

    pub fn root(&self) -> MenuItem {
        self.root
    }

    pub fn get(&self, idx: MenuItem) -> Option<&MenuNode> {
        self.arena.get(idx)
    }

    pub fn entry(&self, idx: MenuItem) -> DomainResult<&MenuEntry> {
        self.arena
            .get(idx)
            .map(|node| &node.entry)
            .ok_or(DomainError::StaleEntry)
    }

    pub fn children(&self, idx: MenuItem) -> &[MenuItem] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() <= 1
    }

    pub fn iter(&self) -> MenuIterator<'_> {
        MenuIterator::new(self)
    }

    /// Update the check mark of a checkable entry. Returns `false` for other variants.
    pub fn set_checked(&mut self, idx: MenuItem, checked: bool) -> DomainResult<bool> {
        self.arena
            .get_mut(idx)
            .map(|node| node.entry.set_checked(checked))
            .ok_or(DomainError::StaleEntry)
    }

    /// Entry bound to the header of `service`.
    pub fn find_service(&self, service: &str) -> Option<MenuItem> {
        self.iter()
            .find(|(_, node)| {
                matches!(
                    node.entry.binding(),
                    Some(ToggleBinding::Service { service: s }) if s == service
                )
            })
            .map(|(idx, _)| idx)
    }

    /// Entries of `service` whose bound node flips `layer` on a self toggle.
    pub fn find_layer(&self, service: &str, layer: i64) -> Vec<MenuItem> {
        self.layer_entries(service)
            .filter(|(_, node)| node.toggle_id() == layer)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// All sub-layer entries of `service` with their bound node.
    pub fn layer_entries<'a>(
        &'a self,
        service: &'a str,
    ) -> impl Iterator<Item = (MenuItem, &'a LayerNode)> + 'a {
        self.iter().filter_map(move |(idx, menu_node)| match menu_node.entry.binding() {
            Some(ToggleBinding::Layer { service: s, node }) if s == service => Some((idx, node)),
            _ => None,
        })
    }

    /// Render as a text tree.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn build(menu: &MenuTree, idx: Index) -> Tree<String> {
            let label = menu
                .get(idx)
                .map(|node| node.entry.to_string())
                .unwrap_or_default();
            Tree::new(label).with_leaves(menu.children(idx).iter().map(|&c| build(menu, c)))
        }
        build(self, self.root)
    }
}

/// Pre-order traversal of a [`MenuTree`], children in display order.
pub struct MenuIterator<'a> {
    menu: &'a MenuTree,
    stack: Vec<Index>,
}

impl<'a> MenuIterator<'a> {
    fn new(menu: &'a MenuTree) -> Self {
        Self {
            menu,
            stack: vec![menu.root],
        }
    }
}

impl<'a> Iterator for MenuIterator<'a> {
    type Item = (Index, &'a MenuNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.menu.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
