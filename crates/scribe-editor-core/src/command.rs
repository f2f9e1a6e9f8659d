//! Formatting commands and the engine interface that executes them.
//!
//! `Command` names the rich-text operations the toolbar can issue, using the
//! same identifiers as the browser's `execCommand`. `CommandEngine` is the
//! capability the editor talks to: in the browser it is backed by the native
//! editing engine, natively by [`ModelEngine`](crate::ModelEngine).

use smol_str::SmolStr;

/// Semantic rich-text commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // === Inline formatting ===
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Subscript,
    Superscript,
    RemoveFormat,

    // === Links ===
    CreateLink,
    Unlink,

    // === Insertion ===
    InsertHtml,
    InsertText,
    InsertImage,
    InsertHorizontalRule,
    InsertLineBreak,

    // === Blocks ===
    FormatBlock,
    InsertOrderedList,
    InsertUnorderedList,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,

    // === Editing ===
    Delete,
    ForwardDelete,
    SelectAll,

    // === History ===
    Undo,
    Redo,

    /// Unrecognized command name.
    Unknown(SmolStr),
}

impl Command {
    /// Parse an `execCommand`-style name. Matching is case-insensitive, as in
    /// browsers.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "strikethrough" => Self::StrikeThrough,
            "subscript" => Self::Subscript,
            "superscript" => Self::Superscript,
            "removeformat" => Self::RemoveFormat,
            "createlink" => Self::CreateLink,
            "unlink" => Self::Unlink,
            "inserthtml" => Self::InsertHtml,
            "inserttext" => Self::InsertText,
            "insertimage" => Self::InsertImage,
            "inserthorizontalrule" => Self::InsertHorizontalRule,
            "insertlinebreak" => Self::InsertLineBreak,
            "formatblock" => Self::FormatBlock,
            "insertorderedlist" => Self::InsertOrderedList,
            "insertunorderedlist" => Self::InsertUnorderedList,
            "justifyleft" => Self::JustifyLeft,
            "justifycenter" => Self::JustifyCenter,
            "justifyright" => Self::JustifyRight,
            "justifyfull" => Self::JustifyFull,
            "delete" => Self::Delete,
            "forwarddelete" => Self::ForwardDelete,
            "selectall" => Self::SelectAll,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            _ => Self::Unknown(SmolStr::new(name)),
        }
    }

    /// The canonical `execCommand` name.
    pub fn name(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::StrikeThrough => "strikeThrough",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
            Self::RemoveFormat => "removeFormat",
            Self::CreateLink => "createLink",
            Self::Unlink => "unlink",
            Self::InsertHtml => "insertHTML",
            Self::InsertText => "insertText",
            Self::InsertImage => "insertImage",
            Self::InsertHorizontalRule => "insertHorizontalRule",
            Self::InsertLineBreak => "insertLineBreak",
            Self::FormatBlock => "formatBlock",
            Self::InsertOrderedList => "insertOrderedList",
            Self::InsertUnorderedList => "insertUnorderedList",
            Self::JustifyLeft => "justifyLeft",
            Self::JustifyCenter => "justifyCenter",
            Self::JustifyRight => "justifyRight",
            Self::JustifyFull => "justifyFull",
            Self::Delete => "delete",
            Self::ForwardDelete => "forwardDelete",
            Self::SelectAll => "selectAll",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Unknown(name) => name,
        }
    }

    /// Commands that change the document (and so get an undo step).
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::SelectAll | Self::Undo | Self::Redo | Self::Unknown(_)
        )
    }

    /// The inline element a formatting toggle wraps runs in, and the tags
    /// that count as already carrying that format.
    pub fn inline_format(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::Bold => Some(("b", &["b", "strong"])),
            Self::Italic => Some(("i", &["i", "em"])),
            Self::Underline => Some(("u", &["u", "ins"])),
            Self::StrikeThrough => Some(("strike", &["strike", "s", "del"])),
            Self::Subscript => Some(("sub", &["sub"])),
            Self::Superscript => Some(("sup", &["sup"])),
            _ => None,
        }
    }

    /// Alignment keyword for the justify commands.
    pub fn alignment(&self) -> Option<&'static str> {
        match self {
            Self::JustifyLeft => Some("left"),
            Self::JustifyCenter => Some("center"),
            Self::JustifyRight => Some("right"),
            Self::JustifyFull => Some("justify"),
            _ => None,
        }
    }
}

/// The rich-text editing capability behind an [`Editor`](crate::Editor).
///
/// Implementations apply commands to whatever holds the current selection.
/// Unsupported or failing commands return `false` and leave the content alone.
pub trait CommandEngine {
    /// Run a named command with an optional value. Returns whether it applied.
    fn execute(&mut self, command: &str, value: Option<&str>) -> bool;

    /// Give focus back to the editable root.
    fn focus(&mut self) {}

    /// Current serialized content of the editable root.
    fn html(&self) -> String;

    /// Replace the whole content.
    fn set_html(&mut self, html: &str);
}
