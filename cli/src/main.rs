//! fragmark CLI - HTML / content-fragment transcoding tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use fragmark::{
    build_page, parse_html, resolve_to_html, to_html, BuildOptions, FragmentSink, Node, Reference,
    RenderOptions,
};

mod store;

use store::JsonStore;

#[derive(Parser)]
#[command(name = "fragmark")]
#[command(version)]
#[command(about = "Transcode rendered HTML pages to and from content-fragment stores", long_about = None)]
struct Cli {
    /// Input HTML or tree JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse rendered HTML into a tree JSON document
    Parse {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render a tree JSON document (or re-render HTML) back to HTML
    #[command(alias = "html")]
    Render {
        /// Input tree JSON or HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Author instance base URL for asset links
        #[arg(long, env = "FRAGMARK_AUTHOR_URL", value_name = "URL")]
        base_url: Option<String>,
    },

    /// Decompose a page into fragment records in a local store file
    Build {
        /// Input HTML or tree JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Store file to write records into
        #[arg(long, value_name = "FILE", default_value = "fragments.json")]
        store: PathBuf,

        /// Page path the root record is registered under
        #[arg(long, value_name = "PATH", default_value = "/index")]
        page_path: String,

        /// Prefix for generated fragment titles
        #[arg(long, value_name = "PREFIX", default_value = "page")]
        title_prefix: String,

        /// Repository folder new fragments are created under
        #[arg(long, value_name = "PATH", default_value = "/content/fragments")]
        parent_path: String,
    },

    /// Resolve a fragment graph from a store file and render it as HTML
    Resolve {
        /// Store file to read records from
        #[arg(long, value_name = "FILE", default_value = "fragments.json")]
        store: PathBuf,

        /// Page path to resolve
        #[arg(long, value_name = "PATH", default_value = "/index")]
        page_path: String,

        /// Resolve an explicit root reference instead of a page path
        #[arg(long, value_name = "REF")]
        root: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Author instance base URL for asset links
        #[arg(long, env = "FRAGMARK_AUTHOR_URL", value_name = "URL")]
        base_url: Option<String>,
    },

    /// Show tree information
    Info {
        /// Input HTML or tree JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            output,
            compact,
        }) => cmd_parse(&input, output.as_deref(), compact),
        Some(Commands::Render {
            input,
            output,
            base_url,
        }) => cmd_render(&input, output.as_deref(), base_url),
        Some(Commands::Build {
            input,
            store,
            page_path,
            title_prefix,
            parent_path,
        }) => cmd_build(&input, &store, &page_path, &title_prefix, &parent_path),
        Some(Commands::Resolve {
            store,
            page_path,
            root,
            output,
            base_url,
        }) => cmd_resolve(&store, &page_path, root, output.as_deref(), base_url),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: parse if input is provided
            if let Some(input) = cli.input {
                cmd_parse(&input, cli.output.as_deref(), false)
            } else {
                println!("{}", "Usage: fragmark <FILE> [OUTPUT]".yellow());
                println!("       fragmark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read a tree from disk, accepting either interchange JSON or raw HTML.
fn load_tree(input: &Path) -> Result<Node, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(input)?;
    let is_json = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Ok(serde_json::from_str(&raw)?)
    } else {
        Ok(parse_html(&raw))
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_parse(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(input)?;

    let json = if compact {
        serde_json::to_string(&tree)?
    } else {
        serde_json::to_string_pretty(&tree)?
    };

    write_or_print(output, &json)
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    base_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(input)?;

    let mut options = RenderOptions::new();
    if let Some(url) = base_url {
        options = options.with_author_base_url(url);
    }

    let html = to_html(&tree, &options)?;

    write_or_print(output, &html)
}

fn cmd_build(
    input: &Path,
    store_path: &Path,
    page_path: &str,
    title_prefix: &str,
    parent_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(input)?;

    let store = JsonStore::open(store_path)?;
    store.ensure_page(page_path)?;

    let options = BuildOptions::new()
        .with_page_path(page_path)
        .with_title_prefix(title_prefix)
        .with_parent_path(parent_path);

    let rt = tokio::runtime::Runtime::new()?;
    let root = rt.block_on(build_page(&store, &tree, &options))?;

    store.save()?;

    println!("{} {}", "Root updated:".green(), root);
    println!(
        "\n{} {} records in {}",
        "Done!".green().bold(),
        store.record_count()?,
        store_path.display()
    );

    Ok(())
}

fn cmd_resolve(
    store_path: &Path,
    page_path: &str,
    root: Option<String>,
    output: Option<&Path>,
    base_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(store_path)?;

    let mut options = RenderOptions::new();
    if let Some(url) = base_url {
        options = options.with_author_base_url(url);
    }

    let rt = tokio::runtime::Runtime::new()?;
    let html = rt.block_on(async {
        let reference = match root {
            Some(path) => Reference::new(path),
            None => store.lookup(page_path).await?,
        };
        resolve_to_html(&store, &reference, &options).await
    })?;

    write_or_print(output, &html)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_tree(input)?;

    let mut stats = TreeStats::default();
    collect_stats(&tree, &mut stats);

    println!("{}", "Tree Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Root".bold(), tree.kind());
    println!("{}: {}", "Nodes".bold(), tree.node_count());
    println!("{}: {}", "Sections".bold(), stats.sections);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Titles".bold(), stats.titles);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraphs);
    println!("{}: {}", "Blocks".bold(), stats.blocks);
    println!("{}: {}", "Block rows".bold(), stats.rows);
    println!("{}: {}", "Block columns".bold(), stats.columns);
    println!("{}: {}", "Images".bold(), stats.images);
    println!("{}: {}", "Characters".bold(), stats.characters);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "fragmark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("HTML / content-fragment transcoding tool");
    println!();
    println!("License: MIT");
}

#[derive(Default)]
struct TreeStats {
    sections: usize,
    titles: usize,
    paragraphs: usize,
    blocks: usize,
    rows: usize,
    columns: usize,
    images: usize,
    characters: usize,
}

fn collect_stats(node: &Node, stats: &mut TreeStats) {
    match node {
        Node::Page { .. } => {}
        Node::Section { .. } => stats.sections += 1,
        Node::Block { .. } => stats.blocks += 1,
        Node::BlockRow { .. } => stats.rows += 1,
        Node::BlockColumn { text } => {
            stats.columns += 1;
            stats.characters += text.len();
        }
        Node::Title { text, .. } => {
            stats.titles += 1;
            stats.characters += text.len();
        }
        Node::Paragraph { text } => {
            stats.paragraphs += 1;
            stats.characters += text.len();
        }
        Node::Image { .. } => stats.images += 1,
    }
    for child in node.children() {
        collect_stats(child, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tree_detects_json() {
        let dir = tempfile::tempdir().unwrap();

        let html_path = dir.path().join("page.html");
        fs::write(&html_path, "<main><div><h1>Hi</h1></div></main>").unwrap();
        let tree = load_tree(&html_path).unwrap();
        assert_eq!(tree.node_count(), 3);

        let json_path = dir.path().join("page.json");
        fs::write(&json_path, serde_json::to_string(&tree).unwrap()).unwrap();
        assert_eq!(load_tree(&json_path).unwrap(), tree);
    }

    #[test]
    fn test_stats_walk() {
        let tree = parse_html(
            "<main><div><h2>Hi</h2><p>Body</p>\
             <div class=\"columns\"><div><div>a</div><div>b</div></div></div>\
             </div></main>",
        );
        let mut stats = TreeStats::default();
        collect_stats(&tree, &mut stats);

        assert_eq!(stats.sections, 1);
        assert_eq!(stats.titles, 1);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.blocks, 1);
        assert_eq!(stats.rows, 1);
        assert_eq!(stats.columns, 2);
        assert_eq!(stats.images, 0);
    }
}
