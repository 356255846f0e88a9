use crate::Node;
use crate::entities::{escape_attr, escape_text};
use crate::tokenizer::is_void_element;

fn is_rawtext_element(name: &str) -> bool {
    name == "script" || name == "style"
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            for c in children {
                write_node(c, false, out);
            }
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                if let Some(v) = v {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) && children.is_empty() {
                return;
            }
            let raw = is_rawtext_element(name);
            for c in children {
                write_node(c, raw, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text { text, .. } => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

/// Serializes the node including its own tag.
pub fn outer_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

/// Serializes only the children of the node.
pub fn inner_html(node: &Node) -> String {
    let raw = node.name().is_some_and(is_rawtext_element);
    let mut out = String::new();
    for c in node.children() {
        write_node(c, raw, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    #[test]
    fn outer_html_round_trips_normalized_markup() {
        let input = r#"<table class="x"><tr><td>a &amp; b</td><td><br><i>c</i></td></tr></table>"#;
        let dom = parse_document(input);
        assert_eq!(outer_html(&dom), input);
    }

    #[test]
    fn outer_html_writes_boolean_attributes_bare() {
        let dom = parse_document("<input disabled value='a\"b'>");
        assert_eq!(outer_html(&dom), r#"<input disabled value="a&quot;b">"#);
    }

    #[test]
    fn outer_html_keeps_script_bodies_verbatim() {
        let input = "<script>if (a < b && c) {}</script>";
        assert_eq!(outer_html(&parse_document(input)), input);
    }

    #[test]
    fn inner_html_skips_own_tag() {
        let dom = parse_document("<td><b>x</b> y</td>");
        assert_eq!(inner_html(&dom.children()[0]), "<b>x</b> y");
    }

    #[test]
    fn outer_html_keeps_doctype_and_comments() {
        let input = "<!DOCTYPE html><!-- keep --><p>x</p>";
        assert_eq!(outer_html(&parse_document(input)), input);
    }
}
