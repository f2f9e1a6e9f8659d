//! Line-oriented edit scripts for `scribe run`.
//!
//! One step per line, `#` starts a comment:
//!
//! ```text
//! select world
//! cmd bold
//! caret-end
//! table 3 2
//! ```

use miette::Diagnostic;
use scribe_editor_core::{Editor, ModelEngine, UndoManager, parse_dimension};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
#[error("script line {line}: {reason}")]
#[diagnostic(code(scribe::script))]
pub struct ScriptError {
    pub line: usize,
    pub reason: String,
}

impl ScriptError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    SelectAll,
    Select(String),
    CaretEnd,
    Cmd { name: String, value: Option<String> },
    Link(String),
    Image(String),
    Table { rows: usize, cols: usize },
    Clear,
    Reset,
    Undo,
    Redo,
}

/// A parsed script. Steps keep their 1-based source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<(usize, Step)>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            steps.push((line, parse_step(line, text)?));
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().map(|(_, step)| step)
    }

    /// Apply every step in order. Stops at the first step that cannot run.
    pub fn run(&self, editor: &mut Editor<ModelEngine>) -> Result<(), ScriptError> {
        for (line, step) in &self.steps {
            let _span = tracing::debug_span!("step", line).entered();
            apply(editor, step).map_err(|reason| ScriptError::new(*line, reason))?;
        }
        Ok(())
    }
}

fn parse_step(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (verb, rest) = match text.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (text, ""),
    };
    let required = |what: &str| {
        if rest.is_empty() {
            Err(ScriptError::new(line, format!("`{verb}` needs {what}")))
        } else {
            Ok(rest.to_string())
        }
    };
    let no_args = |step: Step| {
        if rest.is_empty() {
            Ok(step)
        } else {
            Err(ScriptError::new(line, format!("`{verb}` takes no arguments")))
        }
    };

    match verb {
        "select-all" => no_args(Step::SelectAll),
        "select" => required("the text to select").map(Step::Select),
        "caret-end" => no_args(Step::CaretEnd),
        "cmd" => {
            let args = required("a command name")?;
            let (name, value) = match args.split_once(char::is_whitespace) {
                Some((name, value)) => (name.to_string(), Some(value.trim().to_string())),
                None => (args, None),
            };
            Ok(Step::Cmd { name, value })
        }
        "link" => required("a URL").map(Step::Link),
        "image" => required("an image URL").map(Step::Image),
        "table" => {
            let mut dims = rest.split_whitespace();
            let rows = parse_dimension(dims.next());
            let cols = parse_dimension(dims.next());
            if dims.next().is_some() {
                return Err(ScriptError::new(line, "`table` takes at most two sizes"));
            }
            Ok(Step::Table { rows, cols })
        }
        "clear" => no_args(Step::Clear),
        "reset" => no_args(Step::Reset),
        "undo" => no_args(Step::Undo),
        "redo" => no_args(Step::Redo),
        other => Err(ScriptError::new(line, format!("unknown step `{other}`"))),
    }
}

fn apply(editor: &mut Editor<ModelEngine>, step: &Step) -> Result<(), String> {
    match step {
        Step::SelectAll => editor.engine_mut().document_mut().select_all(),
        Step::Select(needle) => {
            if !editor.engine_mut().document_mut().select_text(needle) {
                return Err(format!("text {needle:?} not found"));
            }
        }
        Step::CaretEnd => editor.engine_mut().document_mut().caret_at_end(),
        Step::Cmd { name, value } => editor.cmd(name, value.as_deref()),
        Step::Link(url) => editor.insert_link(url),
        Step::Image(url) => editor.insert_image(url),
        Step::Table { rows, cols } => editor.insert_table(*rows, *cols),
        Step::Clear => editor.clear(),
        Step::Reset => editor.reset(),
        Step::Undo => {
            if !editor.engine_mut().undo() {
                tracing::debug!("nothing to undo");
            }
        }
        Step::Redo => {
            if !editor.engine_mut().redo() {
                tracing::debug!("nothing to redo");
            }
        }
    }
    Ok(())
}
