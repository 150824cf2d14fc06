//! The state tree and its read-only queries.
//!
//! States are stored in an arena in depth-first pre-order, so the root is
//! always at index `0` and every subtree occupies a contiguous range.
//! Queries never modify the tree; those that depend on the active
//! configuration take the machine's active flags as an argument.

use super::ids::StateId;
use super::state::{NodeIx, State};
use std::collections::HashMap;

/// Arena index of the root state.
pub(crate) const ROOT: NodeIx = 0;

/// Immutable state hierarchy of one machine.
pub struct StateTree<D, P> {
    nodes: Vec<State<D, P>>,
    index: HashMap<StateId, NodeIx>,
}

impl<D, P> StateTree<D, P> {
    /// Build a tree from pre-ordered nodes with parent/child links set.
    /// Ids must already be unique.
    pub(crate) fn from_nodes(nodes: Vec<State<D, P>>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(ix, node)| (node.id, ix))
            .collect();
        Self { nodes, index }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The top-level state.
    pub fn root(&self) -> &State<D, P> {
        &self.nodes[ROOT]
    }

    /// All states in depth-first pre-order.
    pub fn states(&self) -> impl Iterator<Item = &State<D, P>> {
        self.nodes.iter()
    }

    /// Find the unique state with this id.
    pub fn find_by_id(&self, id: StateId) -> Option<&State<D, P>> {
        self.index_of(id).map(|ix| &self.nodes[ix])
    }

    /// Whether `id` names `root` itself or one of its descendants.
    pub fn contains(&self, root: StateId, id: StateId) -> bool {
        match (self.index_of(root), self.index_of(id)) {
            (Some(root), Some(node)) => root == node || self.is_descendant_ix(root, node),
            _ => false,
        }
    }

    /// True iff `node` is reachable from `ancestor` through child links,
    /// excluding `ancestor` itself.
    pub fn is_descendant(&self, ancestor: StateId, node: StateId) -> bool {
        match (self.index_of(ancestor), self.index_of(node)) {
            (Some(ancestor), Some(node)) => self.is_descendant_ix(ancestor, node),
            _ => false,
        }
    }

    /// The immediate parent of `node`; the root has none.
    pub fn ancestor_of(&self, node: StateId) -> Option<StateId> {
        self.index_of(node)
            .and_then(|ix| self.nodes[ix].parent)
            .map(|parent| self.nodes[parent].id)
    }

    /// Ids of the direct children of `id`, in declaration order.
    pub fn children_of(&self, id: StateId) -> Vec<StateId> {
        self.index_of(id)
            .map(|ix| {
                self.nodes[ix]
                    .children
                    .iter()
                    .map(|&child| self.nodes[child].id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn index_of(&self, id: StateId) -> Option<NodeIx> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node(&self, ix: NodeIx) -> &State<D, P> {
        &self.nodes[ix]
    }

    pub(crate) fn id_of(&self, ix: NodeIx) -> StateId {
        self.nodes[ix].id
    }

    pub(crate) fn children(&self, ix: NodeIx) -> &[NodeIx] {
        &self.nodes[ix].children
    }

    pub(crate) fn parent(&self, ix: NodeIx) -> Option<NodeIx> {
        self.nodes[ix].parent
    }

    pub(crate) fn is_descendant_ix(&self, ancestor: NodeIx, node: NodeIx) -> bool {
        let mut cursor = self.nodes[node].parent;
        while let Some(ix) = cursor {
            if ix == ancestor {
                return true;
            }
            cursor = self.nodes[ix].parent;
        }
        false
    }

    /// The child of `current` on the path down to `target`.
    pub(crate) fn child_towards(&self, current: NodeIx, target: NodeIx) -> Option<NodeIx> {
        self.nodes[current]
            .children
            .iter()
            .copied()
            .find(|&child| child == target || self.is_descendant_ix(child, target))
    }

    pub(crate) fn active_child(&self, ix: NodeIx, active: &[bool]) -> Option<NodeIx> {
        self.nodes[ix]
            .children
            .iter()
            .copied()
            .find(|&child| active[child])
    }

    /// Innermost active state below (or at) `root`, or `None` if `root` is
    /// not active.
    pub(crate) fn active_leaf(&self, root: NodeIx, active: &[bool]) -> Option<NodeIx> {
        if !active[root] {
            return None;
        }
        let mut current = root;
        while let Some(child) = self.active_child(current, active) {
            current = child;
        }
        Some(current)
    }

    /// The active path from `ROOT` to the innermost active state.
    pub(crate) fn active_path(&self, active: &[bool]) -> Vec<NodeIx> {
        let mut path = Vec::new();
        if !active[ROOT] {
            return path;
        }
        let mut current = ROOT;
        path.push(current);
        while let Some(child) = self.active_child(current, active) {
            path.push(child);
            current = child;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u16, parent: Option<NodeIx>, children: Vec<NodeIx>) -> State<(), ()> {
        State {
            id: StateId::new(id).unwrap(),
            name: format!("s{id}"),
            parent,
            children,
            initial: None,
            entry: None,
            exit: None,
            data: None,
        }
    }

    // 1 ─┬─ 2
    //    ├─ 3 ── 4
    //    └─ 5 ── 6
    fn thermostat_shape() -> StateTree<(), ()> {
        StateTree::from_nodes(vec![
            node(1, None, vec![1, 2, 4]),
            node(2, Some(0), vec![]),
            node(3, Some(0), vec![3]),
            node(4, Some(2), vec![]),
            node(5, Some(0), vec![5]),
            node(6, Some(4), vec![]),
        ])
    }

    fn id(raw: u16) -> StateId {
        StateId::new(raw).unwrap()
    }

    #[test]
    fn descendant_excludes_self() {
        let tree = thermostat_shape();
        assert!(tree.is_descendant(id(1), id(4)));
        assert!(tree.is_descendant(id(3), id(4)));
        assert!(!tree.is_descendant(id(3), id(3)));
        assert!(!tree.is_descendant(id(4), id(3)));
        assert!(!tree.is_descendant(id(3), id(6)));
    }

    #[test]
    fn find_by_id_returns_unique_state() {
        let tree = thermostat_shape();
        assert_eq!(tree.find_by_id(id(6)).map(State::name), Some("s6"));
        assert!(tree.find_by_id(id(7)).is_none());
        assert!(tree.contains(id(5), id(6)));
        assert!(tree.contains(id(5), id(5)));
        assert!(!tree.contains(id(3), id(6)));
    }

    #[test]
    fn root_has_no_ancestor() {
        let tree = thermostat_shape();
        assert_eq!(tree.ancestor_of(id(1)), None);
        assert_eq!(tree.ancestor_of(id(4)), Some(id(3)));
        assert_eq!(tree.ancestor_of(id(2)), Some(id(1)));
    }

    #[test]
    fn active_leaf_follows_active_children() {
        let tree = thermostat_shape();
        let mut active = vec![false; tree.len()];
        assert_eq!(tree.active_leaf(ROOT, &active), None);

        active[0] = true;
        assert_eq!(tree.active_leaf(ROOT, &active), Some(0));

        active[2] = true;
        active[3] = true;
        assert_eq!(tree.active_leaf(ROOT, &active), Some(3));
        assert_eq!(tree.active_path(&active), vec![0, 2, 3]);
    }

    #[test]
    fn child_towards_picks_branch() {
        let tree = thermostat_shape();
        assert_eq!(tree.child_towards(0, 5), Some(4));
        assert_eq!(tree.child_towards(0, 1), Some(1));
        assert_eq!(tree.child_towards(2, 5), None);
        assert_eq!(tree.children_of(id(1)), vec![id(2), id(3), id(5)]);
    }
}
