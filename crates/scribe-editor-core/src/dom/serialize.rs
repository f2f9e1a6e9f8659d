//! HTML serialization matching what `innerHTML`/`outerHTML` produce.

use pulldown_cmark_escape::{escape_html, escape_html_body_text};

use super::{HtmlTree, NodeId, NodeKind};

/// Escape text content. Non-breaking spaces come out as `&nbsp;` the way
/// browsers serialize them.
pub fn escape_text(out: &mut String, text: &str) {
    for (i, part) in text.split('\u{a0}').enumerate() {
        if i > 0 {
            out.push_str("&nbsp;");
        }
        // Writing into a String cannot fail.
        let _ = escape_html_body_text(&mut *out, part);
    }
}

/// [`escape_text`] into a fresh string.
pub fn escaped_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text(&mut out, text);
    out
}

/// Escape an attribute value for use inside double quotes.
pub fn escape_attribute(out: &mut String, value: &str) {
    for (i, part) in value.split('\u{a0}').enumerate() {
        if i > 0 {
            out.push_str("&nbsp;");
        }
        let _ = escape_html(&mut *out, part);
    }
}

/// [`escape_attribute`] into a fresh string.
pub fn escaped_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_attribute(&mut out, value);
    out
}

impl HtmlTree {
    /// Serialized children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_node(&mut out, child);
        }
        out
    }

    /// Serialized `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node);
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        match self.kind(node) {
            NodeKind::Text(text) => {
                let raw_parent = self
                    .parent(node)
                    .and_then(|p| self.element(p))
                    .is_some_and(|el| el.is("script") || el.is("style"));
                if raw_parent {
                    out.push_str(text);
                } else {
                    escape_text(out, text);
                }
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute(out, &attr.value);
                    out.push('"');
                }
                out.push('>');
                if el.is_void() {
                    return;
                }
                for &child in self.children(node) {
                    self.write_node(out, child);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;

    fn normalize(html: &str) -> String {
        let mut tree = HtmlTree::new();
        let roots = parse_fragment(&mut tree, html);
        roots.into_iter().map(|n| tree.outer_html(n)).collect()
    }

    #[test]
    fn serialized_markup_parses_back_identically() {
        let samples = [
            "<p>plain</p>",
            r#"<p style="text-align: center;">a <b>b</b> <i>c</i></p>"#,
            r#"<div contenteditable="false" class="img-wrapper" draggable="true"><img src="x.png"></div>"#,
            "<ul><li>one</li><li>two</li></ul>",
            "a&nbsp;b &amp; c &lt;tag&gt;",
        ];
        for sample in samples {
            assert_eq!(normalize(sample), sample);
        }
    }

    #[test]
    fn self_closing_void_is_normalized() {
        insta::assert_snapshot!(normalize("<img src=\"a.png\" /><br/>"), @r#"<img src="a.png"><br>"#);
    }

    #[test]
    fn attribute_quotes_are_escaped() {
        let mut out = String::new();
        escape_attribute(&mut out, r#"say "hi" & go"#);
        assert_eq!(out, "say &quot;hi&quot; &amp; go");
    }

    #[test]
    fn owned_escapes_for_templates() {
        assert_eq!(escaped_text("a < b\u{a0}& c"), "a &lt; b&nbsp;&amp; c");
        assert_eq!(
            format!(r#"<img src="{}">"#, escaped_attribute(r#"x.png" onerror="y"#)),
            r#"<img src="x.png&quot; onerror=&quot;y">"#
        );
    }
}
