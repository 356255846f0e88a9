use crate::{Id, Node};

/// Assigns ids to every node whose id is unset, continuing from `next`.
/// Existing ids are kept; `next` is advanced past every id handed out.
pub fn assign_node_ids_from(root: &mut Node, next: &mut u32) {
    let mut stack: Vec<&mut Node> = vec![root];
    while let Some(node) = stack.pop() {
        if node.id() == Id::UNSET {
            node.set_id(Id(*next));
            *next = next.wrapping_add(1);
        }
        if let Some(children) = node.children_mut() {
            stack.extend(children.iter_mut());
        }
    }
}

/// Assigns ids to a freshly built tree, starting at 1 after the largest id already present.
pub fn assign_node_ids(root: &mut Node) -> u32 {
    let mut next = max_node_id(root).0.wrapping_add(1).max(1);
    assign_node_ids_from(root, &mut next);
    next
}

pub fn max_node_id(root: &Node) -> Id {
    let mut max = Id::UNSET;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        max = max.max(node.id());
        stack.extend(node.children());
    }
    max
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|c| find_node_by_id(c, id))
}

pub fn find_node_by_id_mut(node: &mut Node, id: Id) -> Option<&mut Node> {
    if node.id() == id {
        return Some(node);
    }
    node.children_mut()?
        .iter_mut()
        .find_map(|c| find_node_by_id_mut(c, id))
}

/// Finds the parent of the node with `id` and the child position of that node.
pub fn find_parent_mut(node: &mut Node, id: Id) -> Option<(&mut Node, usize)> {
    let pos = node.children().iter().position(|c| c.id() == id);
    match pos {
        Some(pos) => Some((node, pos)),
        None => node
            .children_mut()?
            .iter_mut()
            .find_map(|c| find_parent_mut(c, id)),
    }
}

/// Collects descendant elements named `name`, in document order, not descending
/// into elements named `stop_at` (the root itself is never matched).
pub fn collect_elements<'n>(root: &'n Node, name: &str, stop_at: Option<&str>) -> Vec<&'n Node> {
    fn walk<'n>(node: &'n Node, name: &str, stop_at: Option<&str>, out: &mut Vec<&'n Node>) {
        for c in node.children() {
            if c.is_element_named(name) {
                out.push(c);
            }
            if stop_at.is_some_and(|s| c.is_element_named(s)) {
                continue;
            }
            walk(c, name, stop_at, out);
        }
    }

    let mut out = Vec::new();
    walk(root, name, stop_at, &mut out);
    out
}

/// Ids of [`collect_elements`].
pub fn collect_element_ids(root: &Node, name: &str, stop_at: Option<&str>) -> Vec<Id> {
    collect_elements(root, name, stop_at)
        .into_iter()
        .map(Node::id)
        .collect()
}

/// Pre-order walk over `root` and its descendants in document order. The children of a
/// node are skipped when `f` returns `false` for it.
pub fn walk_mut<F>(root: &mut Node, f: &mut F)
where
    F: FnMut(&mut Node) -> bool,
{
    let mut stack: Vec<&mut Node> = vec![root];
    while let Some(node) = stack.pop() {
        if !f(node) {
            continue;
        }
        if let Some(children) = node.children_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
}

/// Visits every element named `name` mutably, without descending into matches.
pub fn for_each_element_mut<F>(root: &mut Node, name: &str, f: &mut F)
where
    F: FnMut(&mut Node),
{
    if let Some(children) = root.children_mut() {
        for c in children.iter_mut() {
            if c.is_element_named(name) {
                f(c);
            } else {
                for_each_element_mut(c, name, f);
            }
        }
    }
}
