//! Tolerant HTML fragment parser.
//!
//! Handles what the editor itself produces and what users paste in practice:
//! nested elements, quoted/unquoted/bare attributes, void elements, comments,
//! character references, and the common implied end tags (`p`, `li`, table
//! cells and rows). Malformed input never fails; stray end tags are dropped and
//! unclosed elements are closed at the end of input.

use super::{Element, HtmlTree, NodeId, is_void_tag};

/// Parse `html` into detached top-level nodes in `tree`.
pub fn parse_fragment(tree: &mut HtmlTree, html: &str) -> Vec<NodeId> {
    let mut parser = FragmentParser {
        tree,
        src: html,
        pos: 0,
        roots: Vec::new(),
        open: Vec::new(),
    };
    parser.run();
    parser.roots
}

struct FragmentParser<'a, 't> {
    tree: &'t mut HtmlTree,
    src: &'a str,
    pos: usize,
    roots: Vec<NodeId>,
    open: Vec<NodeId>,
}

impl<'a> FragmentParser<'a, '_> {
    fn run(&mut self) {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let Some(lt) = rest.find('<') else {
                self.push_text(rest);
                self.pos = src.len();
                break;
            };
            if lt > 0 {
                self.push_text(&rest[..lt]);
                self.pos += lt;
                continue;
            }

            let rest = &src[self.pos..];
            if rest.starts_with("<!--") {
                self.pos = match rest[4..].find("-->") {
                    Some(end) => self.pos + 4 + end + 3,
                    None => src.len(),
                };
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past('>');
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.start_tag();
            } else {
                self.push_text("<");
                self.pos += 1;
            }
        }
    }

    fn attach(&mut self, node: NodeId) {
        match self.open.last() {
            Some(&parent) => self.tree.append(parent, node),
            None => self.roots.push(node),
        }
    }

    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw);
        let node = self.tree.create_text(text);
        self.attach(node);
    }

    fn skip_past(&mut self, c: char) {
        self.pos = match self.src[self.pos..].find(c) {
            Some(idx) => self.pos + idx + c.len_utf8(),
            None => self.src.len(),
        };
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos += rest.len() - trimmed.len();
    }

    fn take_name(&mut self) -> &'a str {
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/' || c == '=')
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn end_tag(&mut self) {
        self.pos += 2;
        let name = self.take_name().to_ascii_lowercase();
        self.skip_past('>');
        if let Some(idx) = self
            .open
            .iter()
            .rposition(|&n| self.tree.is_tag(n, &name))
        {
            self.open.truncate(idx);
        }
    }

    /// Close elements that a new `tag` implicitly ends.
    fn close_implied(&mut self, tag: &str) {
        let implied: &[&str] = match tag {
            "li" => &["li"],
            "td" | "th" => &["td", "th"],
            "tr" => &["td", "th", "tr"],
            "p" | "div" | "ul" | "ol" | "table" | "blockquote" | "pre" | "h1" | "h2" | "h3"
            | "h4" | "h5" | "h6" | "hr" => &["p"],
            _ => &[],
        };
        while let Some(&top) = self.open.last() {
            if implied.iter().any(|t| self.tree.is_tag(top, t)) {
                self.open.pop();
            } else {
                break;
            }
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let tag = self.take_name().to_ascii_lowercase();
        let mut element = Element::new(tag.as_str());
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('/') || rest.starts_with('=') {
                self.pos += 1;
                continue;
            }

            let name = self.take_name().to_ascii_lowercase();
            self.skip_whitespace();
            let value = if self.src[self.pos..].starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.attr_value()
            } else {
                String::new()
            };
            // First occurrence wins, as in browsers.
            if element.attr(&name).is_none() {
                element.set_attr(&name, value);
            }
        }

        self.close_implied(&tag);
        let node = self.tree.create_element(element);
        self.attach(node);

        if self_closing || is_void_tag(&tag) {
            return;
        }
        if tag == "script" || tag == "style" || tag == "textarea" || tag == "title" {
            self.raw_text(node, &tag);
            return;
        }
        self.open.push(node);
    }

    fn attr_value(&mut self) -> String {
        let src = self.src;
        let rest = &src[self.pos..];
        let raw = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &rest[1..];
                match body.find(q) {
                    Some(end) => {
                        self.pos += 1 + end + 1;
                        &body[..end]
                    }
                    None => {
                        self.pos = src.len();
                        body
                    }
                }
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += len;
                &rest[..len]
            }
        };
        decode_entities(raw)
    }

    /// Elements whose content is not markup.
    fn raw_text(&mut self, node: NodeId, tag: &str) {
        let src = self.src;
        let rest = &src[self.pos..];
        let close = format!("</{tag}");
        let end = rest
            .to_ascii_lowercase()
            .find(&close)
            .unwrap_or(rest.len());
        if end > 0 {
            let text = self.tree.create_text(&rest[..end]);
            self.tree.append(node, text);
        }
        self.pos += end;
        if self.pos < src.len() {
            self.skip_past('>');
        }
    }
}

/// Decode character references in text or attribute values.
///
/// Unknown named references are left as written.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..].find(';').and_then(|semi| {
            let name = &rest[1..1 + semi];
            decode_reference(name).map(|c| (c, semi + 2))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> (HtmlTree, Vec<NodeId>) {
        let mut tree = HtmlTree::new();
        let roots = parse_fragment(&mut tree, html);
        (tree, roots)
    }

    #[test]
    fn parses_nested_elements_and_attributes() {
        let (tree, roots) = parse(r#"<p class="lead">Hi <b>there</b></p>"#);
        assert_eq!(roots.len(), 1);
        let p = roots[0];
        let el = tree.element(p).unwrap();
        assert!(el.is("p"));
        assert_eq!(el.attr("class"), Some("lead"));
        assert_eq!(tree.children(p).len(), 2);
        assert_eq!(tree.text_content(p), "Hi there");
    }

    #[test]
    fn void_and_self_closing_elements_take_no_children() {
        let (tree, roots) = parse(r#"<div><img src="a.png" />after<br>end</div>"#);
        let div = roots[0];
        let kids = tree.children(div);
        assert_eq!(kids.len(), 4);
        assert!(tree.is_tag(kids[0], "img"));
        assert_eq!(tree.text(kids[1]), Some("after"));
        assert!(tree.is_tag(kids[2], "br"));
    }

    #[test]
    fn attribute_forms() {
        let (tree, roots) =
            parse("<td colspan=2 data-x='a b' hidden title=\"&quot;q&quot;\"></td>");
        let el = tree.element(roots[0]).unwrap();
        assert_eq!(el.attr("colspan"), Some("2"));
        assert_eq!(el.attr("data-x"), Some("a b"));
        assert_eq!(el.attr("hidden"), Some(""));
        assert_eq!(el.attr("title"), Some("\"q\""));
    }

    #[test]
    fn entities_decode() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
    }

    #[test]
    fn stray_end_tags_and_comments_are_dropped() {
        let (tree, roots) = parse("a</span><!-- note -->b");
        assert_eq!(roots.len(), 2);
        assert_eq!(tree.text(roots[0]), Some("a"));
        assert_eq!(tree.text(roots[1]), Some("b"));
    }

    #[test]
    fn implied_end_tags() {
        let (tree, roots) = parse("<ul><li>one<li>two</ul><p>a<p>b");
        assert_eq!(roots.len(), 3);
        assert_eq!(tree.children(roots[0]).len(), 2);
        assert_eq!(tree.text_content(roots[1]), "a");
        assert_eq!(tree.text_content(roots[2]), "b");
    }

    #[test]
    fn unclosed_markup_does_not_panic() {
        let (tree, roots) = parse("<div><span>open <a href=\"x");
        assert_eq!(roots.len(), 1);
        assert_eq!(tree.text_content(roots[0]), "open ");
        let (_, roots) = parse("1 < 2");
        assert_eq!(roots.len(), 3);
    }
}
