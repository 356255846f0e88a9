use crate::Node;

const INDENT_STEP: &str = "  ";
const PREVIEW_CHARS: usize = 40;

fn push_preview(out: &mut String, s: &str) {
    for (i, ch) in s.chars().enumerate() {
        if i == PREVIEW_CHARS {
            out.push('…');
            break;
        }
        out.push(if ch == '\n' { ' ' } else { ch });
    }
}

/// Indented one-line-per-node outline of a tree, capped at `cap` nodes.
/// Elements show their `id` and `class` attributes; text is trimmed and previewed.
pub fn outline_from_dom(root: &Node, cap: usize) -> Vec<String> {
    fn walk(node: &Node, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let mut line = INDENT_STEP.repeat(depth);
        match node {
            Node::Document { doctype, .. } => match doctype {
                Some(dt) => {
                    line.push_str("<!");
                    line.push_str(dt);
                    line.push('>');
                }
                None => line.push_str("#document"),
            },
            Node::Element { name, .. } => {
                line.push('<');
                line.push_str(name);
                for key in ["id", "class"] {
                    if let Some(value) = node.attr(key).filter(|v| !v.is_empty()) {
                        line.push_str(&format!(r#" {key}="{value}""#));
                    }
                }
                line.push('>');
            }
            Node::Text { text, .. } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return;
                }
                line.push('"');
                push_preview(&mut line, trimmed);
                line.push('"');
            }
            Node::Comment { text, .. } => {
                line.push_str("<!-- ");
                push_preview(&mut line, text);
                line.push_str(" -->");
            }
        }
        out.push(line);
        for c in node.children() {
            walk(c, depth + 1, out, left);
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(root, 0, &mut out, &mut left);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    #[test]
    fn outline_shows_classes_and_text() {
        let dom = parse_document(r#"<table class="right"><tr><td class="wrong">x</td></tr></table>"#);
        assert_eq!(
            outline_from_dom(&dom, 100),
            vec![
                "#document",
                r#"  <table class="right">"#,
                "    <tr>",
                r#"      <td class="wrong">"#,
                r#"        "x""#,
            ]
        );
    }

    #[test]
    fn outline_respects_cap_and_truncates_long_text() {
        let long = "y".repeat(100);
        let dom = parse_document(&format!("<p>{long}</p><p>z</p>"));
        let lines = outline_from_dom(&dom, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("…\""), "got: {:?}", lines[2]);
    }
}
