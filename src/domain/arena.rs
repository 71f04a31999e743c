use std::fmt;
use std::fmt::Write as _;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

/// Indentation added per level by [`TreeArena::render`].
pub const INDENT: &str = "  ";

/// Tree node in the arena-based family structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Name of the individual, the sole lookup key
    pub name: String,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Borrowed view of a node together with its arena index.
///
/// Equality is node identity (the index), not the name.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub index: Index,
    pub node: &'a TreeNode,
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.node.name
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.node, f)
    }
}

/// Arena-based tree structure holding one family.
///
/// Children are owned through the arena and referenced by index from their parent.
/// The parent link is a plain index back into the same arena, so nodes never own
/// each other. Nodes are append-only: nothing is removed or reparented.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    fn insert_node(&mut self, name: String, parent: Option<Index>) -> Index {
        let node = TreeNode {
            name,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Creates the root node. Only meaningful on an empty arena.
    #[instrument(level = "trace", skip(self))]
    pub fn add_root(&mut self, name: &str) -> Index {
        debug_assert!(self.root.is_none(), "root already established");
        self.insert_node(name.to_string(), None)
    }

    /// Creates a new node under `parent` and appends it to the parent's children.
    ///
    /// No uniqueness check is done here; callers decide whether names may repeat.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: Index, name: &str) -> Index {
        self.insert_node(name.to_string(), Some(parent))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn node_ref(&self, idx: Index) -> Option<NodeRef<'_>> {
        self.arena.get(idx).map(|node| NodeRef { index: idx, node })
    }

    /// Name of the node at `idx`.
    pub fn name(&self, idx: Index) -> Option<&str> {
        self.arena.get(idx).map(|node| node.name.as_str())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order iterator over the whole tree, children left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self, self.root)
    }

    /// First node named `target` in pre-order, searching from the root.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_name(&self, target: &str) -> Option<Index> {
        self.root.and_then(|root| self.find_from(root, target))
    }

    /// First node named `target` in the subtree rooted at `start`.
    ///
    /// The current node is checked before its children, children left to right,
    /// so with repeated names the first one met in pre-order wins.
    pub fn find_from(&self, start: Index, target: &str) -> Option<Index> {
        TreeIterator::new(self, Some(start))
            .find(|(_, node)| node.name == target)
            .map(|(idx, _)| idx)
    }

    /// Ancestors of `idx`, nearest first, root last. Excludes the node itself.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestor_chain(&self, idx: Index) -> Vec<Index> {
        let mut ancestors = Vec::new();
        let mut current = self.get_node(idx).and_then(|node| node.parent);
        while let Some(parent_idx) = current {
            ancestors.push(parent_idx);
            current = self.get_node(parent_idx).and_then(|node| node.parent);
        }
        ancestors
    }

    /// Indented listing of the subtree at `idx`, one line per node.
    ///
    /// `depth` is the indentation level of `idx` itself; each level below adds
    /// [`INDENT`].
    #[instrument(level = "trace", skip(self))]
    pub fn render(&self, idx: Index, depth: usize) -> String {
        let mut out = String::new();
        self.render_into(idx, depth, &mut out);
        out
    }

    fn render_into(&self, idx: Index, depth: usize, out: &mut String) {
        if let Some(node) = self.get_node(idx) {
            let _ = writeln!(out, "{}{}", INDENT.repeat(depth), node.name);
            for &child in &node.children {
                self.render_into(child, depth + 1, out);
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
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

    /// Names of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_names(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.name.clone())
            .collect()
    }

    /// Box-drawing view of the whole tree.
    pub fn to_tree_string(&self) -> Tree<String> {
        match self.root {
            Some(root) => self.subtree(root),
            None => Tree::new("Empty tree".to_string()),
        }
    }

    fn subtree(&self, idx: Index) -> Tree<String> {
        let Some(node) = self.get_node(idx) else {
            return Tree::new(String::new());
        };
        let leaves: Vec<_> = node.children.iter().map(|&c| self.subtree(c)).collect();
        Tree::new(node.name.clone()).with_leaves(leaves)
    }
}

impl fmt::Display for TreeArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => f.write_str(&self.render(root, 0)),
            None => Ok(()),
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TreeArena, Index, Index, Index, Index) {
        let mut tree = TreeArena::new();
        let a = tree.add_root("A");
        let b = tree.add_child(a, "B");
        let c = tree.add_child(a, "C");
        let d = tree.add_child(b, "D");
        (tree, a, b, c, d)
    }

    #[test]
    fn given_children_when_adding_then_order_and_parent_are_kept() {
        let (tree, a, b, c, _) = sample();

        let root = tree.get_node(a).unwrap();
        assert_eq!(root.children, vec![b, c]);
        assert_eq!(tree.get_node(b).unwrap().parent, Some(a));
        assert_eq!(root.parent, None);
        assert_eq!(tree.root(), Some(a));
    }

    #[test]
    fn given_tree_when_iterating_then_visits_preorder() {
        let (tree, ..) = sample();

        let names: Vec<_> = tree.iter().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn given_repeated_name_when_finding_then_preorder_first_wins() {
        let (mut tree, _, b, c, _) = sample();
        let deep = tree.add_child(b, "X");
        let _shallow_right = tree.add_child(c, "X");

        assert_eq!(tree.find_by_name("X"), Some(deep));
    }

    #[test]
    fn given_node_when_collecting_ancestors_then_nearest_first() {
        let (tree, a, b, _, d) = sample();

        assert_eq!(tree.ancestor_chain(d), vec![b, a]);
        assert!(tree.ancestor_chain(a).is_empty());
    }

    #[test]
    fn given_subtree_when_rendering_then_indents_by_depth() {
        let (tree, a, b, ..) = sample();

        assert_eq!(tree.render(a, 0), "A\n  B\n    D\n  C\n");
        assert_eq!(tree.render(b, 1), "  B\n    D\n");
    }

    #[test]
    fn given_tree_when_measuring_then_depth_and_leaves_match() {
        let (tree, ..) = sample();

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_names(), vec!["D", "C"]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn given_empty_tree_when_querying_then_nothing_found() {
        let tree = TreeArena::new();

        assert!(tree.is_empty());
        assert_eq!(tree.find_by_name("A"), None);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.to_string(), "");
    }
}
