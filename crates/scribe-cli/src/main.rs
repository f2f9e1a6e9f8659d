use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr};
use scribe_editor_core::{
    CommandEngine, Composition, DirectorySink, Editor, Exporter, ModelEngine, ScribeConfig,
    TextPdfRenderer,
};

mod config;
mod script;

use script::Script;

#[derive(Parser)]
#[command(version, about = "Scribe - rich-text documents from the command line", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "SCRIBE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export an HTML document as .doc or .pdf
    Export {
        /// HTML content to export
        source: PathBuf,

        /// Document title, also names the output file
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        author: String,

        #[arg(long, value_enum, default_value_t = Format::Pdf)]
        format: Format,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the preview composition (title, author, content)
    Preview {
        source: PathBuf,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        author: String,
    },
    /// Apply an edit script to an HTML document
    Run {
        source: PathBuf,

        /// Edit script, one step per line
        script: PathBuf,

        /// Write the result back to the source instead of printing it
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Doc,
    Pdf,
}

fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = config::load(&config_path)?;
    init_tracing(&config);

    match cli.command {
        Commands::Export {
            source,
            title,
            author,
            format,
            out,
        } => export(&config, &source, &title, &author, format, out)?,
        Commands::Preview {
            source,
            title,
            author,
        } => {
            let editor = load_editor(&config, &source)?;
            let content = editor.html();
            println!("{}", Composition::new(&title, &author, &content).to_html());
        }
        Commands::Run {
            source,
            script,
            write,
        } => run_script(&config, &source, &script, write)?,
    }

    Ok(())
}

fn load_editor(config: &ScribeConfig, source: &Path) -> Result<Editor<ModelEngine>> {
    let html = fs::read_to_string(source)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", source.display()))?;
    let mut engine = ModelEngine::with_history_depth(config.history_depth);
    engine.set_html(&html);
    Ok(Editor::new(engine))
}

fn export(
    config: &ScribeConfig,
    source: &Path,
    title: &str,
    author: &str,
    format: Format,
    out: PathBuf,
) -> Result<()> {
    let editor = load_editor(config, source)?;
    let content = editor.html();
    let mut exporter = Exporter::new(
        DirectorySink::new(out),
        TextPdfRenderer::new(config.pdf.clone()),
    );
    let file_name = match format {
        Format::Doc => exporter.try_export_doc(title, author, &content)?,
        Format::Pdf => exporter.try_export_pdf(title, author, &content)?,
    };
    let path = exporter.sink().dir().join(&file_name);
    println!("Exported {}", path.display());
    Ok(())
}

fn run_script(config: &ScribeConfig, source: &Path, script: &Path, write: bool) -> Result<()> {
    let mut editor = load_editor(config, source)?;
    let text = fs::read_to_string(script)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", script.display()))?;
    let script = Script::parse(&text)?;
    tracing::debug!(steps = script.steps().count(), "running edit script");
    script.run(&mut editor)?;

    let html = editor.html();
    if write {
        fs::write(source, &html).into_diagnostic()?;
        tracing::info!(path = %source.display(), "wrote edited document");
    } else {
        println!("{html}");
    }
    Ok(())
}

fn init_tracing(config: &ScribeConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
