use anyhow::{Context, Result, anyhow, bail};
use folio_config::Config;
use folio_engine::editing::{Attrs, Format, OpPair, Paragraph, UpdateAttrs, UpdateHints};
use folio_engine::models::{ParagraphKind, ParagraphRecord, UuidAllocator};
use folio_engine::{HtmlRenderer, Renderer};
use std::path::Path;
use std::{env, fs, process};

const USAGE: &str = "\
Usage: folio-cli <record-name> <command> [args]

Commands:
  new [text]                              create a record
  show                                    print the HTML and segments
  insert <index> <text>                   insert text at a UTF-16 index
  remove <index> <count>                  remove code units
  format <type> <from> <to> [key=value]   toggle or apply a format
  kind <p|h1|h2|h3|blockquote|pre|figcaption|li>";

/// One CLI invocation against a record file
#[derive(Debug, Clone, PartialEq)]
enum Command {
    New { text: String },
    Show,
    Insert { index: usize, text: String },
    Remove { index: usize, count: usize },
    Format { format: Format },
    Kind { kind: ParagraphKind },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("missing command");
        };

        match (name.as_str(), rest) {
            ("new", text) => Ok(Command::New {
                text: text.join(" "),
            }),
            ("show", []) => Ok(Command::Show),
            ("insert", [index, text @ ..]) if !text.is_empty() => Ok(Command::Insert {
                index: parse_number("index", index)?,
                text: text.join(" "),
            }),
            ("remove", [index, count]) => Ok(Command::Remove {
                index: parse_number("index", index)?,
                count: parse_number("count", count)?,
            }),
            ("format", [tag, from, to, attrs @ ..]) => {
                let mut format = Format::new(
                    tag.as_str(),
                    parse_number("from", from)?,
                    parse_number("to", to)?,
                );
                if !attrs.is_empty() {
                    format = format.with_attrs(parse_attrs(attrs)?);
                }
                Ok(Command::Format { format })
            }
            ("kind", [kind]) => Ok(Command::Kind {
                kind: kind.parse()?,
            }),
            (other, _) => bail!("unknown command or wrong arguments: {other}"),
        }
    }

    fn is_mutation(&self) -> bool {
        !matches!(self, Command::Show)
    }
}

fn parse_number(what: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("{what} must be a non-negative integer, got '{value}'"))
}

fn parse_attrs(pairs: &[String]) -> Result<Attrs> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("format attributes must look like key=value, got '{pair}'"))
        })
        .collect()
}

fn load_paragraph(config: &Config, path: &Path) -> Result<Paragraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record at {}", path.display()))?;
    let record = ParagraphRecord::from_json(&json)
        .with_context(|| format!("Failed to parse record at {}", path.display()))?;

    Ok(Paragraph::from_record(record)?
        .with_overlap_policy(config.overlap_policy)
        .with_placeholder(config.placeholder_text.clone()))
}

fn save_paragraph(path: &Path, paragraph: &Paragraph) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, paragraph.to_record().to_json_pretty()?)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

fn describe(paragraph: &Paragraph) -> String {
    let mut lines = vec![HtmlRenderer.render(paragraph)];
    for segment in paragraph.segments() {
        let tags: Vec<&str> = segment.formats.iter().map(|f| f.tag.as_str()).collect();
        lines.push(format!(
            "{}..{} {:?} [{}]",
            segment.from,
            segment.to,
            segment.text,
            tags.join(", ")
        ));
    }
    lines.join("\n")
}

/// Run `command` against the record called `name` and return what to print
fn execute(config: &Config, name: &str, command: Command) -> Result<String> {
    let path = config.record_path(name);

    let mut paragraph = match &command {
        Command::New { text } => {
            if path.exists() {
                bail!("Record '{name}' already exists at {}", path.display());
            }
            Paragraph::new(&mut UuidAllocator, text)
                .with_kind(config.default_paragraph_type)
                .with_placeholder(config.placeholder_text.clone())
                .with_overlap_policy(config.overlap_policy)
        }
        _ => load_paragraph(config, &path)?,
    };

    let ops: Vec<OpPair> = match command {
        Command::New { .. } => paragraph.insert_ops(name, 0),
        Command::Show => return Ok(describe(&paragraph)),
        Command::Insert { index, text } => paragraph.insert_chars(index, &text)?,
        Command::Remove { index, count } => paragraph.remove_chars(index, count)?,
        Command::Format { format } => paragraph.apply_format(format)?,
        Command::Kind { kind } => {
            paragraph.update(UpdateAttrs::paragraph_type(kind), UpdateHints::default())?
        }
    };

    save_paragraph(&path, &paragraph)?;
    Ok(serde_json::to_string_pretty(&ops)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let command = match Command::parse(&args[2..]) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!(
                "No config file at {}, using defaults",
                Config::config_path().display()
            );
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if command.is_mutation() {
        log::info!("{}: {command:?}", args[1]);
    }
    let output = execute(&config, &args[1], command)?;
    println!("{output}");
    Ok(())
}
