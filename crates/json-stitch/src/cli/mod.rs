//! `json-stitch` — replay a recorded fragment stream through a
//! [`DocumentRegistry`] and print the reconstructed documents.
//!
//! Input is NDJSON, one [`StreamEvent`] per line:
//!
//! ```text
//! {"type":"fragments","documentId":"m1:call_1","updates":[{"path":"root","type":"StartObject"}]}
//! {"type":"raw","documentId":"m1:call_2","delta":"{\"q\":"}
//! {"type":"complete","documentId":"m1:call_1"}
//! {"type":"finalize","messageId":"m1","toolCallIds":["call_1"]}
//! ```
//!
//! Output is NDJSON snapshots: `{"documentId":..,"value":..,"complete":..}`.

use std::io::{BufRead, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fallback::RawArguments;
use crate::fragment::FragmentUpdate;
use crate::options::{StitchOptions, MAX_INDEX_GAP};
use crate::registry::{document_id, DocumentRegistry};

pub const USAGE: &str = "\
Usage: json-stitch [--final] [--config <file.toml>] [--max-index-gap <n>] [--max-depth <n>] [-v]

Reads NDJSON stream events from stdin and writes document snapshots to stdout.

  --final              print one snapshot per document at end of input only
  --config <path>      load limits from a TOML file
  --max-index-gap <n>  most null padding a single array write may add
  --max-depth <n>      deepest path a write may target
  -v, --verbose        debug logging on stderr (RUST_LOG overrides)
  -h, --help           show this help";

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// An input line that is not a valid stream event (1-based line number).
    Line { line: usize, source: serde_json::Error },
    Config(String),
    Usage(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Json(e) => write!(f, "{e}"),
            CliError::Line { line, source } => write!(f, "line {line}: {source}"),
            CliError::Config(e) => write!(f, "Invalid config: {e}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self { CliError::Io(e) }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self { CliError::Json(e) }
}

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayArgs {
    pub final_only: bool,
    pub verbose: bool,
    pub help: bool,
    pub options: StitchOptions,
}

/// Parse command-line arguments (without the program name).
///
/// `--config` is loaded first; `--max-*` flags override it regardless of order.
pub fn parse_args<I>(args: I) -> Result<ReplayArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = ReplayArgs::default();
    let mut config = None;
    let mut max_index_gap = None;
    let mut max_depth = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--final" => parsed.final_only = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" => parsed.help = true,
            "--config" => config = Some(flag_value(&arg, args.next())?),
            "--max-index-gap" => {
                let gap = parse_count(&arg, args.next())?;
                if gap > MAX_INDEX_GAP {
                    return Err(CliError::Usage(format!("{arg} must be at most {MAX_INDEX_GAP}")));
                }
                max_index_gap = Some(gap);
            }
            "--max-depth" => max_depth = Some(parse_count(&arg, args.next())?),
            other => return Err(CliError::Usage(format!("Unknown argument: {other}"))),
        }
    }

    if let Some(path) = config {
        parsed.options = load_options(Path::new(&path))?;
    }
    if let Some(gap) = max_index_gap {
        parsed.options.max_index_gap = gap;
    }
    if let Some(depth) = max_depth {
        parsed.options.max_depth = depth;
    }
    Ok(parsed)
}

fn flag_value(flag: &str, value: Option<String>) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::Usage(format!("{flag} requires a value")))
}

fn parse_count(flag: &str, value: Option<String>) -> Result<usize, CliError> {
    let value = flag_value(flag, value)?;
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("{flag} expects a non-negative integer, got {value:?}")))
}

/// Load [`StitchOptions`] from a TOML file.
pub fn load_options(path: &Path) -> Result<StitchOptions, CliError> {
    let text = std::fs::read_to_string(path)?;
    let options: StitchOptions =
        toml::from_str(&text).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    if options.max_index_gap > MAX_INDEX_GAP {
        return Err(CliError::Config(format!(
            "{}: max_index_gap must be at most {MAX_INDEX_GAP}",
            path.display()
        )));
    }
    Ok(options)
}

// ── Events ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    #[serde(rename_all = "camelCase")]
    Fragments {
        document_id: String,
        updates: Vec<FragmentUpdate>,
    },
    #[serde(rename_all = "camelCase")]
    Raw { document_id: String, delta: String },
    #[serde(rename_all = "camelCase")]
    Complete { document_id: String },
    #[serde(rename_all = "camelCase")]
    Delete { document_id: String },
    #[serde(rename_all = "camelCase")]
    Finalize {
        message_id: String,
        #[serde(default)]
        tool_call_ids: Option<Vec<String>>,
    },
    Clear,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub document_id: &'a str,
    pub value: Option<&'a Value>,
    pub complete: bool,
}

// ── Replay ────────────────────────────────────────────────────────────────

/// Registry plus the raw-text fallback documents, driven one event at a time.
#[derive(Debug, Default)]
pub struct Replay {
    registry: DocumentRegistry,
    raw: IndexMap<String, RawArguments>,
    final_only: bool,
}

impl Replay {
    pub fn new(options: StitchOptions, final_only: bool) -> Self {
        Self {
            registry: DocumentRegistry::with_options(options),
            raw: IndexMap::new(),
            final_only,
        }
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn handle<W: Write>(&mut self, event: StreamEvent, out: &mut W) -> Result<(), CliError> {
        match event {
            StreamEvent::Fragments { document_id, updates } => {
                self.registry.apply(&document_id, updates);
                if !self.final_only {
                    self.write_snapshot(&document_id, out)?;
                }
            }
            StreamEvent::Raw { document_id, delta } => {
                if self.registry.is_complete(&document_id) {
                    tracing::debug!(document_id = %document_id, "dropping raw delta for completed document");
                } else {
                    self.raw.entry(document_id.clone()).or_default().push(&delta);
                }
                if !self.final_only {
                    self.write_snapshot(&document_id, out)?;
                }
            }
            StreamEvent::Complete { document_id } => self.registry.complete(&document_id),
            StreamEvent::Delete { document_id } => {
                self.registry.delete(&document_id);
                self.raw.shift_remove(&document_id);
            }
            StreamEvent::Finalize { message_id, tool_call_ids } => {
                let children: Option<Vec<&str>> = tool_call_ids
                    .as_ref()
                    .map(|ids| ids.iter().map(String::as_str).collect());
                self.registry.finalize_message(&message_id, children.as_deref());
                match &children {
                    Some(children) => {
                        for child in children {
                            self.raw.shift_remove(&document_id(&message_id, child));
                        }
                    }
                    None => {
                        let prefix = format!("{message_id}:");
                        self.raw.retain(|id, _| !id.starts_with(&prefix));
                    }
                }
            }
            StreamEvent::Clear => {
                self.registry.clear();
                self.raw.clear();
            }
        }
        Ok(())
    }

    /// In `--final` mode, print every still-tracked document.
    pub fn finish<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        if !self.final_only {
            return Ok(());
        }
        for id in self.registry.ids() {
            self.write_snapshot(id, out)?;
        }
        let raw_only = self.raw.keys().filter(|id| !self.registry.contains(id));
        for id in raw_only {
            self.write_snapshot(id, out)?;
        }
        Ok(())
    }

    fn write_snapshot<W: Write>(&self, id: &str, out: &mut W) -> Result<(), CliError> {
        let snapshot = Snapshot {
            document_id: id,
            value: self
                .registry
                .value(id)
                .or_else(|| self.raw.get(id).and_then(RawArguments::value)),
            complete: self.registry.is_complete(id),
        };
        serde_json::to_writer(&mut *out, &snapshot)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Replay every event in `input`, returning the number of events handled.
pub fn replay<R: BufRead, W: Write>(input: R, out: &mut W, args: &ReplayArgs) -> Result<usize, CliError> {
    let mut replay = Replay::new(args.options.clone(), args.final_only);
    let mut events = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| CliError::Line {
            line: index + 1,
            source,
        })?;
        replay.handle(event, out)?;
        events += 1;
    }
    replay.finish(out)?;
    tracing::debug!(events, documents = replay.registry().len(), "replay finished");
    Ok(events)
}
