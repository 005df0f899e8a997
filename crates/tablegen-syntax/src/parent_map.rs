use rustc_hash::FxHashMap;

use crate::{SyntaxNode, WalkEvent};

/// Side index from a node to its parent.
///
/// The tree itself stores no back references; tools that need to walk
/// upwards build one of these once per tree.
#[derive(Debug, Default)]
pub struct ParentMap<'a> {
    parents: FxHashMap<SyntaxNode<'a>, SyntaxNode<'a>>,
}

impl<'a> ParentMap<'a> {
    pub fn new(root: SyntaxNode<'a>) -> Self {
        let mut parents = FxHashMap::default();
        let mut stack: Vec<SyntaxNode<'a>> = Vec::new();

        for event in root.preorder() {
            match event {
                WalkEvent::Enter(node) => {
                    if let Some(&parent) = stack.last() {
                        parents.insert(node, parent);
                    }
                    stack.push(node);
                }
                WalkEvent::Leave(_) => {
                    stack.pop();
                }
            }
        }

        Self { parents }
    }

    pub fn parent(&self, node: SyntaxNode<'a>) -> Option<SyntaxNode<'a>> {
        self.parents.get(&node).copied()
    }

    /// Iterates ancestors, starting with the immediate parent.
    pub fn ancestors(&self, node: SyntaxNode<'a>) -> impl Iterator<Item = SyntaxNode<'a>> + '_ {
        std::iter::successors(self.parent(node), |&node| self.parent(node))
    }
}
