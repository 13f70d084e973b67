//! Arena-backed widget tree.
//!
//! Nodes live in a [`SlotMap`]; parent and sibling links are stored as
//! [`NodeId`] fields. A handle to a removed node never resolves again, so
//! stale ids turn into `None` instead of dangling.

use slotmap::SlotMap;

use super::geom::{Pos, Rect};
use super::id::NodeId;
use super::node::Node;

pub struct WidgetTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl WidgetTree {
    /// A tree holding only the root, which is its own parent.
    pub fn new(root_rect: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(|key| {
            let mut node = Node::new(root_rect);
            node.parent = key;
            node
        });
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// Insert `node` as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.nodes.insert_with_key(|key| {
            let mut node = node;
            node.parent = key;
            node.first_child = None;
            node.last_child = None;
            node.prev = None;
            node.next = None;
            node
        });
        self.attach(parent, id);
        Some(id)
    }

    /// Link a detached node as the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, id: NodeId) -> bool {
        if !self.contains(id) || !self.contains(parent) || self.parent(id).is_some() {
            return false;
        }
        if id == self.root || self.is_ancestor_of(id, parent) {
            return false;
        }
        let Some(tail) = self.nodes.get(parent).map(|p| p.last_child) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent;
            node.prev = tail;
            node.next = None;
        }
        match tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(t) => t.next = Some(id),
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.first_child = Some(id);
                }
            }
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            p.last_child = Some(id);
        }
        true
    }

    /// Unlink `id` from its parent and siblings. Its own subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let (prev, next) = match self.nodes.get(id) {
            Some(n) => (n.prev, n.next),
            None => return,
        };

        match prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.next = next,
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.prev = prev,
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.last_child = prev;
                }
            }
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = id;
            node.prev = None;
            node.next = None;
        }
    }

    /// Detach and drop `id` from the arena. Children, if any, become
    /// detached subtrees of their own.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if id == self.root {
            return None;
        }
        self.detach(id);
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.detach(child);
        }
        self.nodes.remove(id)
    }

    /// The parent of `id`; `None` for the root, a detached node, or a stale id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get(id)?.parent;
        (parent != id).then_some(parent)
    }

    /// Whether `id` is connected to the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.ancestors_inclusive(id).last() == Some(self.root)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes.get(id).and_then(|n| n.first_child),
        }
    }

    /// `id`, then its parent, and so on up to the topmost node.
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), move |&n| self.parent(n))
    }

    /// Number of links between `id` and the topmost node.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors_inclusive(id).count().saturating_sub(1)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors_inclusive(id).any(|n| n == ancestor)
    }

    /// Lowest common ancestor. Falls back to the root if the two nodes do not
    /// share a tree.
    pub fn lca(&self, a: NodeId, b: NodeId) -> NodeId {
        if a == self.root || b == self.root || !self.contains(a) || !self.contains(b) {
            return self.root;
        }
        let (mut a, mut b) = (a, b);
        let (mut da, mut db) = (self.depth(a), self.depth(b));
        while da > db {
            a = self.parent(a).unwrap_or(self.root);
            da -= 1;
        }
        while db > da {
            b = self.parent(b).unwrap_or(self.root);
            db -= 1;
        }
        while a != b {
            match (self.parent(a), self.parent(b)) {
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                _ => return self.root,
            }
        }
        a
    }

    /// `from` and its ancestors up to, but excluding, `stop`.
    pub fn path_up(&self, from: NodeId, stop: NodeId) -> Vec<NodeId> {
        self.ancestors_inclusive(from)
            .take_while(|&n| n != stop)
            .collect()
    }

    /// Parent before children, siblings in order.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            let first = stack.len();
            stack.extend(self.children(n));
            stack[first..].reverse();
        }
        out
    }

    /// Children before parent, siblings in order.
    pub fn postorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![(id, false)];
        while let Some((n, expanded)) = stack.pop() {
            if expanded {
                out.push(n);
                continue;
            }
            stack.push((n, true));
            let first = stack.len();
            stack.extend(self.children(n).map(|c| (c, false)));
            stack[first..].reverse();
        }
        out
    }

    /// Deepest node under `pos`, starting at `from`.
    ///
    /// Among overlapping visible children the one with the highest
    /// `focus_time` wins; on a tie the later sibling wins.
    pub fn hit_test(&self, from: NodeId, pos: Pos) -> Option<NodeId> {
        let start = self.nodes.get(from)?;
        if !start.rect.contains(pos) {
            return None;
        }
        let mut current = from;
        loop {
            let mut best: Option<(NodeId, u64)> = None;
            for child in self.children(current) {
                let Some(node) = self.nodes.get(child) else {
                    continue;
                };
                if node.is_hidden() || !node.rect.contains(pos) {
                    continue;
                }
                if best.map_or(true, |(_, t)| node.focus_time >= t) {
                    best = Some((child, node.focus_time));
                }
            }
            match best {
                Some((child, _)) => current = child,
                None => return Some(current),
            }
        }
    }
}

pub struct Children<'a> {
    tree: &'a WidgetTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.nodes.get(id).and_then(|n| n.next);
        Some(id)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/tree.rs"]
mod tests;
