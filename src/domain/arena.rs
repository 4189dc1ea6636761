use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::DomainError;

/// Separator between node ids in a category path, e.g. `general.editors`.
pub const PATH_SEPARATOR: char = '.';

/// Tree node in the arena-based page hierarchy.
#[derive(Debug)]
pub struct PageNode<P> {
    /// Node key, unique among its siblings
    pub id: String,
    pub page: P,
    /// Index of parent node in the arena, None for root-level pages
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Arena-based page tree.
///
/// Holds any number of root-level nodes, each of which may carry children.
/// Insertion order is preserved at every level and is the display order.
#[derive(Debug)]
pub struct PreferenceTree<P> {
    arena: Arena<PageNode<P>>,
    roots: Vec<Index>,
}

impl<P> Default for PreferenceTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PreferenceTree<P> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Drops every node.
    pub fn remove_all(&mut self) {
        self.arena.clear();
        self.roots.clear();
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    #[instrument(level = "trace", skip(self, page))]
    pub fn add_to_root(&mut self, id: &str, page: P) -> Index {
        let idx = self.arena.insert(PageNode {
            id: id.to_string(),
            page,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(idx);
        idx
    }

    /// Adds a node under the node found at `category_path`.
    ///
    /// The page is dropped when the path does not resolve.
    #[instrument(level = "trace", skip(self, page))]
    pub fn add_to(&mut self, category_path: &str, id: &str, page: P) -> Result<Index, DomainError> {
        let parent_idx = self
            .find(category_path)
            .ok_or_else(|| DomainError::UnknownCategory {
                category: category_path.to_string(),
                id: id.to_string(),
            })?;

        let idx = self.arena.insert(PageNode {
            id: id.to_string(),
            page,
            parent: Some(parent_idx),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.push(idx);
        }
        Ok(idx)
    }

    /// Resolves a `.`-separated id path starting at the root level.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, path: &str) -> Option<Index> {
        let mut level: &[Index] = &self.roots;
        let mut found = None;
        for segment in path.split(PATH_SEPARATOR) {
            let idx = level
                .iter()
                .copied()
                .find(|&idx| self.arena.get(idx).is_some_and(|n| n.id == segment))?;
            level = &self.arena.get(idx)?.children;
            found = Some(idx);
        }
        found
    }

    pub fn get_node(&self, idx: Index) -> Option<&PageNode<P>> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut PageNode<P>> {
        self.arena.get_mut(idx)
    }

    /// Full `.`-separated path of a node.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = self.arena.get(i)?;
            segments.push(node.id.as_str());
            current = node.parent;
        }
        segments.reverse();
        Some(segments.join(&PATH_SEPARATOR.to_string()))
    }

    /// Pre-order traversal over all roots, left to right.
    pub fn iter(&self) -> TreeIterator<'_, P> {
        TreeIterator::new(self)
    }

    /// Node ids in pre-order.
    pub fn ids(&self) -> Vec<String> {
        self.iter().map(|(_, node)| node.id.clone()).collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct TreeIterator<'a, P> {
    tree: &'a PreferenceTree<P>,
    stack: Vec<Index>,
}

impl<'a, P> TreeIterator<'a, P> {
    fn new(tree: &'a PreferenceTree<P>) -> Self {
        // Reverse so the first root is popped first
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a, P> Iterator for TreeIterator<'a, P> {
    type Item = (Index, &'a PageNode<P>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
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
