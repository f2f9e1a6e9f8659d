//! The editor facade the toolbar talks to.

use crate::command::CommandEngine;
use crate::dom::escaped_attribute;

/// Rows and columns used when a table dimension is missing or unusable.
pub const DEFAULT_TABLE_DIMENSION: usize = 2;

const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; border: 1px solid #ccc;";
const CELL_STYLE: &str = "border: 1px solid #ccc; padding: 12px; min-width: 100px;";

/// Wraps a [`CommandEngine`] with the composite insertions and lifecycle
/// operations of the editing surface.
///
/// Every operation is best effort. A command the engine refuses is logged and
/// otherwise ignored, so callers never see an error from here.
#[derive(Debug, Clone, Default)]
pub struct Editor<E> {
    engine: E,
}

impl<E: CommandEngine> Editor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run a named formatting command on the current selection, then hand
    /// focus back to the editable root.
    pub fn cmd(&mut self, command: &str, value: Option<&str>) {
        if !self.engine.execute(command, value) {
            tracing::debug!(command, ?value, "editor command had no effect");
        }
        self.engine.focus();
    }

    /// Link the selection to `url`, adding `https://` when it carries no
    /// http(s) scheme.
    pub fn insert_link(&mut self, url: &str) {
        let href = link_href(url);
        self.cmd("createLink", Some(&href));
    }

    /// Insert a draggable, non-editable image block at the caret.
    pub fn insert_image(&mut self, url: &str) {
        let html = image_wrapper_html(url);
        self.cmd("insertHTML", Some(&html));
    }

    /// Insert a `rows` x `cols` table at the caret. Zero falls back to the
    /// default dimension.
    pub fn insert_table(&mut self, rows: usize, cols: usize) {
        let html = table_html(rows, cols);
        self.cmd("insertHTML", Some(&html));
    }

    /// Strip inline formatting and links from the selection.
    pub fn clear(&mut self) {
        self.cmd("removeFormat", None);
        self.cmd("unlink", None);
    }

    /// Discard all content.
    pub fn reset(&mut self) {
        tracing::debug!("resetting editor content");
        self.engine.set_html("");
    }

    /// Live serialized content of the editable root.
    pub fn html(&self) -> String {
        self.engine.html()
    }
}

/// Prefix `https://` unless `url` already starts with `http://` or
/// `https://` (ASCII case-insensitive).
pub fn link_href(url: &str) -> String {
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if has_scheme {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Markup for an embedded image block.
pub fn image_wrapper_html(url: &str) -> String {
    format!(
        r#"<div contenteditable="false" class="img-wrapper" draggable="true"><img src="{}"></div>"#,
        escaped_attribute(url)
    )
}

/// Markup for an empty bordered table.
pub fn table_html(rows: usize, cols: usize) -> String {
    let rows = if rows == 0 { DEFAULT_TABLE_DIMENSION } else { rows };
    let cols = if cols == 0 { DEFAULT_TABLE_DIMENSION } else { cols };

    let mut html = format!(r#"<table style="{TABLE_STYLE}">"#);
    for _ in 0..rows {
        html.push_str("<tr>");
        for _ in 0..cols {
            html.push_str(&format!(r#"<td style="{CELL_STYLE}">&nbsp;</td>"#));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

/// Read a table dimension from prompt input.
///
/// Like `parseInt`: leading whitespace is skipped and the leading run of
/// digits is used, so `"3 rows"` is 3. Missing, non-numeric, negative or zero
/// input gives the default.
pub fn parse_dimension(input: Option<&str>) -> usize {
    let Some(input) = input else {
        return DEFAULT_TABLE_DIMENSION;
    };
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: &str = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| &unsigned[..i])
        .unwrap_or(unsigned);
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_TABLE_DIMENSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{HtmlTree, parse_fragment};
    use crate::engine::ModelEngine;

    /// Engine that records calls instead of editing anything.
    #[derive(Default)]
    struct Recording {
        calls: Vec<(String, Option<String>)>,
        focused: usize,
        html: String,
    }

    impl CommandEngine for Recording {
        fn execute(&mut self, command: &str, value: Option<&str>) -> bool {
            self.calls
                .push((command.to_string(), value.map(str::to_string)));
            false
        }

        fn focus(&mut self) {
            self.focused += 1;
        }

        fn html(&self) -> String {
            self.html.clone()
        }

        fn set_html(&mut self, html: &str) {
            self.html = html.to_string();
        }
    }

    #[test]
    fn links_get_a_scheme() {
        assert_eq!(link_href("example.com"), "https://example.com");
        assert_eq!(link_href("http://example.com"), "http://example.com");
        assert_eq!(link_href("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(link_href("ftp://x"), "https://ftp://x");
        assert_eq!(link_href("htt"), "https://htt");
    }

    #[test]
    fn cmd_refocuses_even_when_ignored() {
        let mut editor = Editor::new(Recording::default());
        editor.cmd("bogus", None);
        assert_eq!(editor.engine().focused, 1);
        assert_eq!(editor.engine().calls, vec![("bogus".to_string(), None)]);
    }

    #[test]
    fn clear_runs_both_commands() {
        let mut editor = Editor::new(Recording::default());
        editor.clear();
        let names: Vec<_> = editor
            .engine()
            .calls
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["removeFormat", "unlink"]);
    }

    #[test]
    fn insert_link_goes_through_create_link() {
        let mut editor = Editor::new(Recording::default());
        editor.insert_link("docs.rs");
        assert_eq!(
            editor.engine().calls,
            vec![(
                "createLink".to_string(),
                Some("https://docs.rs".to_string())
            )]
        );
    }

    #[test]
    fn image_wrapper_markup() {
        insta::assert_snapshot!(
            image_wrapper_html("cat.png?a=1&b=2"),
            @r#"<div contenteditable="false" class="img-wrapper" draggable="true"><img src="cat.png?a=1&amp;b=2"></div>"#
        );
    }

    #[test]
    fn table_has_requested_shape() {
        let mut tree = HtmlTree::new();
        let nodes = parse_fragment(&mut tree, &table_html(3, 4));
        assert_eq!(nodes.len(), 1);
        let table = nodes[0];
        let rows: Vec<_> = tree
            .descendants(table)
            .into_iter()
            .filter(|&n| tree.is_tag(n, "tr"))
            .collect();
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(tree.children(row).len(), 4);
            assert!(tree.children(row).iter().all(|&c| tree.is_tag(c, "td")));
        }
    }

    #[test]
    fn zero_sized_table_falls_back() {
        assert_eq!(table_html(0, 0), table_html(2, 2));
        insta::assert_snapshot!(
            table_html(1, 1),
            @r#"<table style="border-collapse: collapse; width: 100%; border: 1px solid #ccc;"><tr><td style="border: 1px solid #ccc; padding: 12px; min-width: 100px;">&nbsp;</td></tr></table>"#
        );
    }

    #[test]
    fn dimensions_parse_like_parse_int() {
        assert_eq!(parse_dimension(Some("3")), 3);
        assert_eq!(parse_dimension(Some("  5 rows")), 5);
        assert_eq!(parse_dimension(Some("+4")), 4);
        assert_eq!(parse_dimension(Some("0")), 2);
        assert_eq!(parse_dimension(Some("-3")), 2);
        assert_eq!(parse_dimension(Some("many")), 2);
        assert_eq!(parse_dimension(Some("")), 2);
        assert_eq!(parse_dimension(None), 2);
    }

    #[test]
    fn model_backed_editor_round_trip() {
        let mut editor = Editor::new(ModelEngine::new());
        editor.insert_image("a.png");
        assert_eq!(
            editor.html(),
            r#"<div contenteditable="false" class="img-wrapper" draggable="true"><img src="a.png"></div>"#
        );
        assert!(editor.engine().is_focused());

        editor.insert_table(0, 0);
        let html = editor.html();
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td ").count(), 4);

        editor.reset();
        assert_eq!(editor.html(), "");
    }

    #[test]
    fn insert_link_over_selection() {
        let mut editor = Editor::new(ModelEngine::from_html("<p>read this</p>"));
        assert!(editor.engine_mut().document_mut().select_text("this"));
        editor.insert_link("example.org");
        assert_eq!(
            editor.html(),
            r#"<p>read <a href="https://example.org">this</a></p>"#
        );

        editor.clear();
        assert_eq!(editor.html(), "<p>read this</p>");
    }
}
