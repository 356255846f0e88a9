use crate::tokenizer::tokenize;
use crate::types::{Id, Node, Token};

/// Parses a complete document into a `Node::Document` tree. Node ids are left unset.
pub fn parse_document(input: &str) -> Node {
    build_dom(&tokenize(input))
}

/// Parses a markup fragment into a list of sibling nodes (used by `Node::set_html`).
pub fn parse_fragment(input: &str) -> Vec<Node> {
    match parse_document(input) {
        Node::Document { children, .. } => children,
        other => vec![other],
    }
}

/// Builds a tree from tokens.
///
/// Table markup is frequently written without closing tags, so opening a `td`/`th`
/// implicitly closes an open cell of the same row, and opening a `tr` closes the open row.
/// End tags without a matching open element are dropped.
pub fn build_dom(tokens: &[Token]) -> Node {
    let mut arena = NodeArena::new();
    let root_index = arena.push(ArenaNode::Document {
        doctype: None,
        children: Vec::new(),
    });

    let mut open_elements: Vec<usize> = Vec::new();

    for token in tokens {
        match token {
            Token::Doctype(s) => arena.set_doctype(root_index, s.clone()),
            Token::Comment(c) => {
                let parent_index = open_elements.last().copied().unwrap_or(root_index);
                arena.add_child(parent_index, ArenaNode::Comment { text: c.clone() });
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    let parent_index = open_elements.last().copied().unwrap_or(root_index);
                    arena.add_child(parent_index, ArenaNode::Text { text: txt.clone() });
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                close_implied(&arena, &mut open_elements, name);
                let parent_index = open_elements.last().copied().unwrap_or(root_index);
                let new_index = arena.add_child(
                    parent_index,
                    ArenaNode::Element {
                        name: name.clone(),
                        attributes: attributes.clone(),
                        children: Vec::new(),
                    },
                );
                if !*self_closing {
                    open_elements.push(new_index);
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = open_elements
                    .iter()
                    .rposition(|&index| arena.is_element_named(index, name))
                {
                    open_elements.truncate(pos);
                }
            }
        }
    }

    arena.into_dom(root_index)
}

fn close_implied(arena: &NodeArena, open_elements: &mut Vec<usize>, starting: &str) {
    let (closes, boundary): (&[&str], &[&str]) = match starting {
        "td" | "th" => (&["td", "th"], &["tr", "table"]),
        "tr" => (&["tr"], &["table", "tbody", "thead", "tfoot"]),
        "tbody" | "thead" | "tfoot" => (&["tbody", "thead", "tfoot"], &["table"]),
        _ => return,
    };
    for pos in (0..open_elements.len()).rev() {
        let index = open_elements[pos];
        if boundary.iter().any(|b| arena.is_element_named(index, b)) {
            return;
        }
        if closes.iter().any(|c| arena.is_element_named(index, c)) {
            open_elements.truncate(pos);
            return;
        }
    }
}

#[derive(Debug)]
enum ArenaNode {
    Document {
        doctype: Option<String>,
        children: Vec<usize>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<usize>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl ArenaNode {
    fn children(&self) -> Option<&[usize]> {
        match self {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                Some(children)
            }
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => None,
        }
    }
}

#[derive(Debug)]
struct NodeArena {
    nodes: Vec<ArenaNode>,
}

impl NodeArena {
    fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: ArenaNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        index
    }

    fn add_child(&mut self, parent_index: usize, child: ArenaNode) -> usize {
        let child_index = self.push(child);
        match &mut self.nodes[parent_index] {
            ArenaNode::Document { children, .. } | ArenaNode::Element { children, .. } => {
                children.push(child_index);
            }
            // Parents are only ever taken from the open-element stack or the root.
            ArenaNode::Text { .. } | ArenaNode::Comment { .. } => {}
        }
        child_index
    }

    fn set_doctype(&mut self, root_index: usize, doctype: String) {
        if let ArenaNode::Document { doctype: dt, .. } = &mut self.nodes[root_index] {
            *dt = Some(doctype);
        }
    }

    fn is_element_named(&self, node_index: usize, target: &str) -> bool {
        match &self.nodes[node_index] {
            ArenaNode::Element { name, .. } => name.eq_ignore_ascii_case(target),
            _ => false,
        }
    }

    /// Converts the arena into an owned tree with an iterative post-order walk, so deeply
    /// nested input cannot overflow the stack.
    fn into_dom(self, root_index: usize) -> Node {
        let mut nodes = self.nodes;
        let mut built: Vec<Node> = Vec::with_capacity(nodes.len());

        fn take_children(n: usize, built: &mut Vec<Node>) -> Vec<Node> {
            let at = built.len().saturating_sub(n);
            built.split_off(at)
        }

        let mut stack: Vec<(usize, bool)> = vec![(root_index, false)];
        while let Some((node_index, visited)) = stack.pop() {
            if !visited {
                stack.push((node_index, true));
                if let Some(children) = nodes[node_index].children() {
                    for &child_index in children.iter().rev() {
                        stack.push((child_index, false));
                    }
                }
                continue;
            }

            let node = match &mut nodes[node_index] {
                ArenaNode::Document { doctype, children } => Node::Document {
                    id: Id::UNSET,
                    doctype: doctype.take(),
                    children: take_children(children.len(), &mut built),
                },
                ArenaNode::Element {
                    name,
                    attributes,
                    children,
                } => Node::Element {
                    id: Id::UNSET,
                    name: std::mem::take(name),
                    attributes: std::mem::take(attributes),
                    children: take_children(children.len(), &mut built),
                },
                ArenaNode::Text { text } => Node::Text {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
                ArenaNode::Comment { text } => Node::Comment {
                    id: Id::UNSET,
                    text: std::mem::take(text),
                },
            };
            built.push(node);
        }

        built.pop().unwrap_or(Node::Document {
            id: Id::UNSET,
            doctype: None,
            children: Vec::new(),
        })
    }
}
