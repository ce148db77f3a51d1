//! Wren CLI
//!
//! Parse markup, lay it out, and print the tree and display list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use wren_browser::{FontdueMeasurer, LoadedDocument, load_document, parse_html_string};
use wren_dom::NodeId;
use wren_html::print_tree;
use wren_layout::constants::DEFAULT_WIDTH;
use wren_layout::{ApproximateMeasurer, DisplayList};

/// Wren - lay out markup into a display list
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Lay out a file with approximate metrics
    wren ./index.html

    # Parse inline HTML and show the node tree too
    wren --tree --html '<h1 class="title">Hi</h1><p>Text'

    # Use real font metrics and dump JSON
    wren --font DejaVuSans.ttf --json page.html

    # Inline document as a data URL
    wren 'data:text/html,<b>bold</b>'
"#)]
struct Cli {
    /// Path to an HTML file or a data:text/html URL
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse HTML string directly instead of file/URL
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Window width in layout units
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: f32,

    /// Regular font file; without it, approximate metrics are used
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Bold font file
    #[arg(long, value_name = "FILE", requires = "font")]
    bold_font: Option<PathBuf>,

    /// Italic font file
    #[arg(long, value_name = "FILE", requires = "font")]
    italic_font: Option<PathBuf>,

    /// Bold-italic font file
    #[arg(long, value_name = "FILE", requires = "font")]
    bold_italic_font: Option<PathBuf>,

    /// Print the node tree and parse issues
    #[arg(long)]
    tree: bool,

    /// Print the display list as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let doc = load_doc(&cli)?;
    if cli.tree {
        print_document(&doc);
    }

    let display_list = match &cli.font {
        Some(regular) => {
            let measurer = FontdueMeasurer::from_files(
                regular,
                cli.bold_font.as_deref(),
                cli.italic_font.as_deref(),
                cli.bold_italic_font.as_deref(),
            )?;
            doc.layout(cli.width, measurer)?
        }
        None => {
            log::info!("no font given, using approximate metrics");
            doc.layout(cli.width, ApproximateMeasurer)?
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&display_list)
            .context("failed to serialize display list")?;
        println!("{json}");
    } else {
        print_display_list(&display_list, cli.width);
    }
    Ok(())
}

/// Load document from CLI arguments
fn load_doc(cli: &Cli) -> Result<LoadedDocument> {
    if let Some(ref html_string) = cli.html {
        Ok(parse_html_string(html_string))
    } else if let Some(ref path) = cli.path {
        load_document(path).with_context(|| format!("failed to load {path}"))
    } else {
        anyhow::bail!("a file path, data URL, or --html is required")
    }
}

fn print_document(doc: &LoadedDocument) {
    println!("{}", "=== Node Tree ===".bold().cyan());
    print_tree(&doc.tree, NodeId::ROOT);

    if !doc.parse_issues.is_empty() {
        println!("\n{}", "=== Parse Issues ===".bold().cyan());
        for issue in &doc.parse_issues {
            println!("  - {issue}");
        }
    }
    println!();
}

fn print_display_list(display_list: &DisplayList, width: f32) {
    println!(
        "{}",
        format!("=== Display List (width: {width}) ===").bold().cyan()
    );
    for item in display_list {
        let style = &item.style;
        println!(
            "  x={:<8.1} y={:<8.1} {} {} {} {} {:>3}  {}",
            item.x,
            item.y,
            style.font_weight,
            style.font_style,
            style.text_align,
            style.vertical_align,
            style.font_size,
            format!("{:?}", item.text).green()
        );
    }
    println!(
        "\n{} items, max y {:.1}",
        display_list.len(),
        display_list.max_y()
    );
}
