pub type NodeId = u32;

/// Per-tree node identity. `Id(0)` means "not yet assigned".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    pub const UNSET: Id = Id(0);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    /// New element without attributes or children. The name is ASCII-lowercased.
    pub fn element(name: &str) -> Node {
        Node::Element {
            id: Id::UNSET,
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text_node(text: impl Into<String>) -> Node {
        Node::Text {
            id: Id::UNSET,
            text: text.into(),
        }
    }

    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: Id) {
        match self {
            Node::Document { id, .. } => *id = new_id,
            Node::Element { id, .. } => *id = new_id,
            Node::Text { id, .. } => *id = new_id,
            Node::Comment { id, .. } => *id = new_id,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Element name, `None` for non-element nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, target: &str) -> bool {
        self.name().is_some_and(|n| n.eq_ignore_ascii_case(target))
    }

    pub fn attributes(&self) -> &[(String, Option<String>)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Attribute lookup, ASCII case-insensitive on the name. Boolean attributes yield `""`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes()
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    /// Replace the value of an existing attribute or append a new one. No-op on non-elements.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let Node::Element { attributes, .. } = self else {
            return;
        };
        let value = Some(value.into());
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, v)) => *v = value,
            None => attributes.push((key.to_ascii_lowercase(), value)),
        }
    }

    pub fn attr_has_token(&self, key: &str, token: &str) -> bool {
        self.attr(key)
            .is_some_and(|v| v.split_ascii_whitespace().any(|t| t == token))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr_has_token("class", class)
    }

    /// Add a class token if it is not present yet.
    pub fn add_class(&mut self, class: &str) {
        if !matches!(self, Node::Element { .. }) || self.has_class(class) {
            return;
        }
        let merged = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {class}", existing.trim())
            }
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }

    /// Descendant text with whitespace runs collapsed to one space and both ends trimmed.
    pub fn text(&self) -> String {
        fn walk(node: &Node, out: &mut String) {
            match node {
                Node::Text { text, .. } => out.push_str(text),
                Node::Element { name, children, .. } => {
                    if name == "br" {
                        out.push(' ');
                    }
                    for c in children {
                        walk(c, out);
                    }
                }
                Node::Document { children, .. } => {
                    for c in children {
                        walk(c, out);
                    }
                }
                Node::Comment { .. } => {}
            }
        }

        let mut raw = String::new();
        walk(self, &mut raw);
        let mut out = String::with_capacity(raw.len());
        for word in raw.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        if let Some(children) = self.children_mut() {
            children.clear();
            if !text.is_empty() {
                children.push(Node::text_node(text));
            }
        }
    }

    /// Replace all children with the parsed markup fragment.
    pub fn set_html(&mut self, html: &str) {
        if let Some(children) = self.children_mut() {
            *children = crate::dom_builder::parse_fragment(html);
        }
    }

    /// Append the parsed markup fragment after the existing children.
    pub fn append_html(&mut self, html: &str) {
        if let Some(children) = self.children_mut() {
            children.extend(crate::dom_builder::parse_fragment(html));
        }
    }

    pub fn push_child(&mut self, child: Node) {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
    }

    pub fn prepend_child(&mut self, child: Node) {
        self.insert_child(0, child);
    }

    /// Insert at `index`, clamped to the number of children.
    pub fn insert_child(&mut self, index: usize, child: Node) {
        if let Some(children) = self.children_mut() {
            let at = index.min(children.len());
            children.insert(at, child);
        }
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        let children = self.children_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Child elements only, in document order.
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children()
            .iter()
            .filter(|c| matches!(c, Node::Element { .. }))
    }
}
