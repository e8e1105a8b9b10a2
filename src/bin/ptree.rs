//! ptree - Property tree CLI tool
//!
//! Converts serialized property trees between JSON, YAML and XML, and merges
//! one document into another through a live tree of dynamic objects.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use property_tree::format::{from_xml, Format, FormatError, XmlElement, XmlOptions};
use property_tree::merge::{deserialize, ObjectFactory, SerializeOptions};
use property_tree::reflect::{DynamicObject, BASE_TYPE_TAG};
use property_tree::value::{Map, Value};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Property tree conversion and merge tool
#[derive(Parser, Debug)]
#[command(name = "ptree")]
#[command(version)]
struct Cli {
    /// Raise the log level; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a document to another format
    Convert(ConvertArgs),
    /// Merge PATCH into BASE and write the result
    Merge(MergeArgs),
}

/// Document format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Xml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
            OutputFormat::Xml => Format::Xml,
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Output format. Defaults to the output extension, or JSON on stdout
    #[arg(long)]
    to: Option<OutputFormat>,

    /// Write this key as an XML attribute
    #[arg(long = "attribute", value_name = "KEY")]
    attributes: Vec<String>,

    /// Write every scalar as an XML attribute
    #[arg(long)]
    all_attributes: bool,

    /// Keep empty values in XML output
    #[arg(long)]
    keep_empty: bool,
}

impl OutputArgs {
    fn format(&self) -> CliResult<Format> {
        if let Some(to) = self.to {
            return Ok(to.into());
        }
        if self.output == "-" {
            return Ok(Format::Json);
        }
        format_of(Path::new(&self.output))
    }

    fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            attribute_keys: self.attributes.clone(),
            all_properties_as_attributes: self.all_attributes,
            skip_empty: !self.keep_empty,
        }
    }

    fn emit(&self, data: &Map, root_tag: &str) -> CliResult<()> {
        let format = self.format()?;
        let text = format.render(data, root_tag, &self.xml_options())?;
        if self.output == "-" {
            println!("{}", text.trim_end());
        } else {
            fs::write(&self.output, text).map_err(|e| FormatError::file(&self.output, e))?;
            info!(path = %self.output, %format, "wrote document");
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input document (.json, .yaml, .yml or .xml)
    input: PathBuf,

    /// Root element tag for XML output. Defaults to the input's root tag
    #[arg(long)]
    root_tag: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Document providing the initial tree
    base: PathBuf,

    /// Document merged into the tree built from BASE
    patch: PathBuf,

    /// Treat entries under this key as child objects
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Only treat keys given with --tag as child objects
    #[arg(long)]
    no_infer_tags: bool,

    /// Levels of children to include in the output
    #[arg(long)]
    max_depth: Option<usize>,

    /// Leave read-only properties out of the output
    #[arg(long)]
    writable_only: bool,

    #[command(flatten)]
    output: OutputArgs,
}

/// A parsed input document.
struct Document {
    data: Map,
    /// Root element tag, for XML input.
    root_tag: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("property_tree={level},ptree={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> CliResult<()> {
    match command {
        Command::Convert(args) => convert(args),
        Command::Merge(args) => merge(args),
    }
}

fn convert(args: ConvertArgs) -> CliResult<()> {
    let doc = read_document(&args.input)?;
    let root_tag = args
        .root_tag
        .or(doc.root_tag)
        .unwrap_or_else(|| BASE_TYPE_TAG.to_string());
    args.output.emit(&doc.data, &root_tag)
}

fn merge(args: MergeArgs) -> CliResult<()> {
    let base = read_document(&args.base)?;
    let patch = read_document(&args.patch)?;

    let mut tags: BTreeSet<String> = args.tags.iter().cloned().collect();
    if !args.no_infer_tags {
        collect_object_keys(&base.data, &mut tags);
        collect_object_keys(&patch.data, &mut tags);
    }
    let mut factory = ObjectFactory::new();
    for tag in &tags {
        factory.register_dynamic(tag.as_str());
    }
    debug!(tags = ?tags, "registered child tags");

    let mut root = DynamicObject::with_tag(base.root_tag.as_deref().unwrap_or(BASE_TYPE_TAG));
    deserialize(&mut root, &base.data, &factory);
    deserialize(&mut root, &patch.data, &factory);

    let data = SerializeOptions::new()
        .max_depth(args.max_depth)
        .include_read_only(!args.writable_only)
        .serialize(&root);
    args.output.emit(&data, property_tree::format::root_tag(&root))
}

fn format_of(path: &Path) -> CliResult<Format> {
    Format::from_path(path)
        .ok_or_else(|| format!("cannot tell the format of {:?} from its extension", path).into())
}

fn read_document(path: &Path) -> CliResult<Document> {
    let format = format_of(path)?;
    let text = fs::read_to_string(path).map_err(|e| FormatError::file(path, e))?;
    let doc = match format {
        Format::Xml => {
            let root = XmlElement::parse(&text)?;
            Document {
                data: from_xml(&root),
                root_tag: Some(root.tag),
            }
        }
        _ => Document {
            data: format.parse(&text)?,
            root_tag: None,
        },
    };
    debug!(path = %path.display(), %format, entries = doc.data.len(), "read document");
    Ok(doc)
}

/// Adds every key, at any depth, that holds a map or a list with a map.
fn collect_object_keys(data: &Map, keys: &mut BTreeSet<String>) {
    for (key, value) in data {
        match value {
            Value::Map(child) => {
                keys.insert(key.clone());
                collect_object_keys(child, keys);
            }
            Value::List(items) => {
                for child in items.iter().filter_map(Value::as_map) {
                    keys.insert(key.clone());
                    collect_object_keys(child, keys);
                }
            }
            _ => {}
        }
    }
}
