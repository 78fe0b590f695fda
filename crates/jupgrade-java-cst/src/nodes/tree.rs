// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The node arena.
//!
//! Every node lives in a slot addressed by its [`NodeId`] and records its
//! parent. Replacing a node retires its slot and leaves a forwarding entry,
//! so a handle held across a rewrite can still be [`Tree::resolve`]d to the
//! node that took its place.

use thiserror::Error;

use super::codegen::{Codegen, CodegenError, CodegenState};
use super::kinds::{FirstElement, NodeId, NodeKind, NodeTag, Part};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("{0} does not exist or was retired")]
    MissingNode(NodeId),
    #[error("{0} has no parent")]
    Detached(NodeId),
    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone)]
enum Slot {
    Live {
        kind: NodeKind,
        parent: Option<NodeId>,
    },
    Retired {
        replaced_by: Option<NodeId>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of slots ever allocated, live or retired.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a detached node to the arena.
    pub fn alloc(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = NodeId::new(self.slots.len() as u32);
        self.slots.push(Slot::Live {
            kind: kind.into(),
            parent: None,
        });
        id
    }

    /// Adds a node and makes it the parent of all of its children.
    pub fn alloc_with_children(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = self.alloc(kind);
        for child in self.children(id) {
            self.set_parent(child, Some(id));
        }
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        match self.slots.get(id.index()) {
            Some(Slot::Live { kind, .. }) => Some(kind),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Live { kind, .. }) => Some(kind),
            _ => None,
        }
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeKind, TreeError> {
        self.get(id).ok_or(TreeError::MissingNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeKind, TreeError> {
        self.get_mut(id).ok_or(TreeError::MissingNode(id))
    }

    pub fn tag(&self, id: NodeId) -> Option<NodeTag> {
        self.get(id).map(NodeKind::tag)
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.slots.get(id.index()) {
            Some(Slot::Live { parent, .. }) => *parent,
            _ => None,
        }
    }

    pub fn set_parent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if let Some(Slot::Live { parent, .. }) = self.slots.get_mut(id.index()) {
            *parent = new_parent;
        }
    }

    /// Walks parent links from `id` (exclusive) up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent);
        }
        result
    }

    /// The closest ancestor (exclusive) whose tag is `tag`.
    pub fn enclosing(&self, id: NodeId, tag: NodeTag) -> Option<NodeId> {
        self.ancestors(id)
            .into_iter()
            .find(|ancestor| self.tag(*ancestor) == Some(tag))
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        if let Some(kind) = self.get(id) {
            kind.for_each_child(&mut |child| children.push(child));
        }
        children
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        let mut seen = 0;
        let mut found = None;
        if let Some(kind) = self.get(id) {
            kind.for_each_child(&mut |child| {
                if seen == index {
                    found = Some(child);
                }
                seen += 1;
            });
        }
        found
    }

    /// Follows forwarding entries left by [`Tree::replace`].
    pub fn resolve(&self, mut id: NodeId) -> NodeId {
        while let Some(Slot::Retired {
            replaced_by: Some(next),
        }) = self.slots.get(id.index())
        {
            id = *next;
        }
        id
    }

    /// Puts `new` where `old` sits in its parent and retires `old`.
    ///
    /// The children of `old` are left alone, so they can be reused inside
    /// `new`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(old).ok_or(TreeError::Detached(old))?;
        let mut found = false;
        self.node_mut(parent)?.for_each_child_mut(&mut |slot| {
            if *slot == old {
                *slot = new;
                found = true;
            }
        });
        if !found {
            return Err(TreeError::NotAChild { parent, child: old });
        }
        self.set_parent(new, Some(parent));
        self.slots[old.index()] = Slot::Retired {
            replaced_by: Some(new),
        };
        Ok(())
    }

    /// Removes `id` from its parent's list of children and retires it.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(id).ok_or(TreeError::Detached(id))?;
        if !self.node_mut(parent)?.remove_child(id) {
            return Err(TreeError::NotAChild { parent, child: id });
        }
        self.slots[id.index()] = Slot::Retired { replaced_by: None };
        Ok(())
    }

    /// All live nodes under `id`, including `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.is_live(current) {
                continue;
            }
            result.push(current);
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        result
    }

    /// Nodes under `id` (inclusive) whose kind satisfies `pred`, in pre-order.
    pub fn find_all(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|node| self.get(*node).is_some_and(&pred))
            .collect()
    }

    /// Copies the subtree rooted at `id`. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let mut kind = self.node(id)?.clone();
        let mut originals = Vec::new();
        kind.for_each_child(&mut |child| originals.push(child));
        let mut copies = Vec::with_capacity(originals.len());
        for child in originals {
            copies.push(self.deep_clone(child)?);
        }
        let mut copies = copies.into_iter();
        kind.for_each_child_mut(&mut |slot| {
            if let Some(copy) = copies.next() {
                *slot = copy;
            }
        });
        Ok(self.alloc_with_children(kind))
    }

    fn first_token_owner(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            match self.get(id)?.first_element()? {
                FirstElement::Token => return Some(id),
                FirstElement::Node(child) => id = child,
            }
        }
    }

    /// The trivia in front of the first token of `id`.
    pub fn leading_trivia(&self, id: NodeId) -> Option<&str> {
        let owner = self.first_token_owner(id)?;
        let kind = self.get(owner)?;
        match kind {
            NodeKind::CompilationUnit(node) => Some(&node.eof.leading),
            NodeKind::Package(node) => Some(&node.package_kw.leading),
            NodeKind::Import(node) => Some(&node.import_kw.leading),
            NodeKind::ClassDecl(node) => {
                if node.header.is_empty() {
                    node.keyword.first().map(|tok| tok.leading.as_str())
                } else {
                    first_part_leading(&node.header)
                }
            }
            NodeKind::ClassBody(node) => Some(&node.lbrace.leading),
            NodeKind::MethodDecl(node) => {
                if node.header.is_empty() {
                    Some(&node.name.leading)
                } else {
                    first_part_leading(&node.header)
                }
            }
            NodeKind::Annotation(node) => Some(&node.at.leading),
            NodeKind::Block(node) => Some(&node.lbrace.leading),
            NodeKind::Statement(node) => {
                if node.parts.is_empty() {
                    node.semi.as_ref().map(|tok| tok.leading.as_str())
                } else {
                    first_part_leading(&node.parts)
                }
            }
            NodeKind::Expression(node) => first_part_leading(&node.parts),
            NodeKind::Call(node) => Some(&node.name.leading),
            NodeKind::Group(node) => Some(&node.open.leading),
            NodeKind::Literal(node) => Some(&node.token.leading),
        }
    }

    /// Replaces the trivia in front of the first token of `id`. Returns
    /// false when the node has no tokens.
    pub fn set_leading_trivia(&mut self, id: NodeId, trivia: impl Into<String>) -> bool {
        let Some(owner) = self.first_token_owner(id) else {
            return false;
        };
        match self.get_mut(owner).and_then(NodeKind::first_token_mut) {
            Some(tok) => {
                tok.leading = trivia.into();
                true
            }
            None => false,
        }
    }

    /// Takes the trivia in front of the first token of `id`, leaving it empty.
    pub fn take_leading_trivia(&mut self, id: NodeId) -> Option<String> {
        let owner = self.first_token_owner(id)?;
        let tok = self.get_mut(owner)?.first_token_mut()?;
        Some(std::mem::take(&mut tok.leading))
    }

    /// Applies `f` to the leading trivia of every token under `id`.
    pub fn map_trivia(&mut self, id: NodeId, mut f: impl FnMut(&mut String)) {
        for node in self.descendants(id) {
            if let Some(kind) = self.get_mut(node) {
                kind.for_each_token_mut(&mut |tok| f(&mut tok.leading));
            }
        }
    }

    /// Adds `extra` after every line break in the trivia under `id`, shifting
    /// the whole subtree one indentation level to the right.
    pub fn indent(&mut self, id: NodeId, extra: &str) {
        self.map_trivia(id, |leading| {
            if leading.contains('\n') {
                *leading = indent_trivia(leading, extra);
            }
        });
    }

    /// Recomputes every parent link reachable from the root.
    pub fn fix_parents(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        self.set_parent(root, None);
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            for child in self.children(current) {
                self.set_parent(child, Some(current));
                stack.push(child);
            }
        }
    }

    /// Prints the subtree rooted at `id`.
    pub fn node_source(&self, id: NodeId) -> Result<String, CodegenError> {
        let mut state = CodegenState::default();
        id.codegen(self, &mut state)?;
        Ok(state.to_string())
    }

    /// Prints the whole tree.
    pub fn to_source(&self) -> Result<String, CodegenError> {
        match self.root {
            Some(root) => self.node_source(root),
            None => Ok(String::new()),
        }
    }
}

fn first_part_leading(parts: &[Part]) -> Option<&str> {
    match parts.first() {
        Some(Part::Token(tok)) => Some(tok.leading.as_str()),
        _ => None,
    }
}

/// Blank lines stay blank; the indentation in front of the token itself is
/// always extended.
fn indent_trivia(leading: &str, extra: &str) -> String {
    let lines: Vec<&str> = leading.split('\n').collect();
    let last = lines.len() - 1;
    let mut out = String::with_capacity(leading.len() + extra.len() * last);
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
            let blank = line.is_empty() || *line == "\r";
            if !blank || index == last {
                out.push_str(extra);
            }
        }
        out.push_str(line);
    }
    out
}
