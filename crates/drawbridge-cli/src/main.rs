use drawbridge::generate::{Gns3Server, links_playbook, load_template_catalog, machines_playbook};
use drawbridge::{Engine, manifest};
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Extract(drawbridge::Error),
    Gen(drawbridge::generate::GenError),
    Json(serde_json::Error),
    EmptyIntake(PathBuf),
    NoProjectName,
    KindMismatch {
        expected: drawbridge::SourceKind,
        found: drawbridge::SourceKind,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Extract(err) => write!(f, "{err}"),
            CliError::Gen(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::EmptyIntake(dir) => {
                write!(f, "no diagram files (.xml/.svg/.drawio) in {}", dir.display())
            }
            CliError::NoProjectName => write!(
                f,
                "cannot derive a project name from stdin input; pass --project <name>"
            ),
            CliError::KindMismatch { expected, found } => {
                write!(f, "expected a {expected} document, found {found}")
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<drawbridge::Error> for CliError {
    fn from(value: drawbridge::Error) -> Self {
        Self::Extract(value)
    }
}

impl From<drawbridge::generate::GenError> for CliError {
    fn from(value: drawbridge::generate::GenError) -> Self {
        Self::Gen(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Extract,
    Detect,
    Machines,
    LinksPlaybook,
    MachinesPlaybook,
    Renumber,
}

/// Source-kind constraint from `--kind`: `auto` sniffs, the other two insist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum KindFilter {
    #[default]
    Auto,
    Xml,
    Svg,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    latest_dir: Option<String>,
    kind: KindFilter,
    pretty: bool,
    connections_only: bool,
    server_details: Option<String>,
    project: Option<String>,
    templates: Option<String>,
    manifest: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "drawbridge-cli\n\
\n\
USAGE:\n\
  drawbridge-cli [extract] [--pretty] [--connections-only] [--kind xml|svg|auto] [--out <path>] [<path>|-]\n\
  drawbridge-cli detect [<path>|-]\n\
  drawbridge-cli machines [--out <path>] [<path>|-]\n\
  drawbridge-cli links-playbook --server <details-file> [--project <name>] [--manifest <json>] [--out <path>] [<path>|-]\n\
  drawbridge-cli machines-playbook --server <details-file> --templates <json> [--project <name>] [--out <path>] [<path>|-]\n\
  drawbridge-cli renumber [--out <path>] [<manifest.json>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --latest <dir> selects the newest .xml/.svg/.drawio file in <dir> instead of <path>;\n\
    with --kind it only considers files of that kind.\n\
  - --kind rejects inputs that do not decode as the named variant; auto (the default) sniffs.\n\
  - extract prints devices and connections as JSON; --connections-only prints the manifest list.\n\
  - --project defaults to the input file name without its extension.\n\
  - Playbooks print to stdout by default; use --out to write a file.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "extract" => args.command = Command::Extract,
            "detect" => args.command = Command::Detect,
            "machines" => args.command = Command::Machines,
            "links-playbook" => args.command = Command::LinksPlaybook,
            "machines-playbook" => args.command = Command::MachinesPlaybook,
            "renumber" => args.command = Command::Renumber,
            "--pretty" => args.pretty = true,
            "--kind" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.kind = match kind.as_str() {
                    "xml" => KindFilter::Xml,
                    "svg" => KindFilter::Svg,
                    "auto" => KindFilter::Auto,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "--connections-only" => args.connections_only = true,
            "--latest" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.latest_dir = Some(dir.clone());
            }
            "--server" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.server_details = Some(path.clone());
            }
            "--project" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.project = Some(name.clone());
            }
            "--templates" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.templates = Some(path.clone());
            }
            "--manifest" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.manifest = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.input.is_some() && args.latest_dir.is_some() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

/// Newest diagram file in the intake directory, by modification time.
fn latest_upload(dir: &Path, kind: KindFilter) -> Result<PathBuf, CliError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let accepted = match kind {
            KindFilter::Auto => matches!(ext.as_deref(), Some("xml" | "svg" | "drawio")),
            KindFilter::Xml => matches!(ext.as_deref(), Some("xml" | "drawio")),
            KindFilter::Svg => matches!(ext.as_deref(), Some("svg")),
        };
        if !accepted {
            continue;
        }
        let mtime = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(t, _)| mtime > *t) {
            newest = Some((mtime, path));
        }
    }
    newest
        .map(|(_, path)| path)
        .ok_or_else(|| CliError::EmptyIntake(dir.to_path_buf()))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

/// Project name: explicit flag, else the input file name without extension.
fn project_name(args: &Args, input: Option<&str>) -> Result<String, CliError> {
    if let Some(name) = &args.project {
        return Ok(name.clone());
    }
    match input {
        Some(path) if path != "-" => Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or(CliError::NoProjectName),
        _ => Err(CliError::NoProjectName),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn read_server(args: &Args) -> Result<Gns3Server, CliError> {
    let Some(path) = &args.server_details else {
        return Err(CliError::Usage(usage()));
    };
    let text = std::fs::read_to_string(path)?;
    Ok(Gns3Server::parse_details(&text)?)
}

fn run(args: Args) -> Result<(), CliError> {
    let input = match &args.latest_dir {
        Some(dir) => {
            let path = latest_upload(Path::new(dir), args.kind)?;
            tracing::info!(path = %path.display(), "selected newest intake file");
            Some(path.to_string_lossy().to_string())
        }
        None => args.input.clone(),
    };
    let engine = Engine::new();

    match args.command {
        Command::Detect => {
            let text = read_input(input.as_deref())?;
            let kind = block_on(engine.detect_kind(&text))?;
            println!("{kind}");
            Ok(())
        }
        Command::Extract => {
            let text = read_input(input.as_deref())?;
            let extraction = block_on(engine.extract(&text))?;
            let expected = match args.kind {
                KindFilter::Auto => None,
                KindFilter::Xml => Some(drawbridge::SourceKind::Xml),
                KindFilter::Svg => Some(drawbridge::SourceKind::Svg),
            };
            if let Some(expected) = expected {
                if extraction.kind != expected {
                    return Err(CliError::KindMismatch {
                        expected,
                        found: extraction.kind,
                    });
                }
            }
            if extraction.devices.is_empty() {
                tracing::warn!("no devices found in the diagram");
            }

            if let Some(out) = &args.out {
                std::fs::write(out, manifest::write_manifest(&extraction.connections)?)?;
            }
            if args.connections_only {
                write_json(&extraction.connections, args.pretty)?;
            } else {
                write_json(&extraction, args.pretty)?;
            }
            Ok(())
        }
        Command::Machines => {
            let text = read_input(input.as_deref())?;
            let extraction = block_on(engine.extract(&text))?;
            let listing = drawbridge::generate::machine_names_listing(&extraction.devices);
            write_text(&listing, args.out.as_deref())?;
            Ok(())
        }
        Command::LinksPlaybook => {
            let server = read_server(&args)?;
            let project = project_name(&args, input.as_deref())?;
            let connections = match &args.manifest {
                Some(path) => manifest::read_manifest(&std::fs::read_to_string(path)?)?,
                None => {
                    let text = read_input(input.as_deref())?;
                    block_on(engine.extract(&text))?.connections
                }
            };
            let yaml = links_playbook(&connections, &server, &project)?;
            write_text(&yaml, args.out.as_deref())?;
            Ok(())
        }
        Command::MachinesPlaybook => {
            let server = read_server(&args)?;
            let Some(templates_path) = &args.templates else {
                return Err(CliError::Usage(usage()));
            };
            let templates = load_template_catalog(&std::fs::read_to_string(templates_path)?)?;
            let project = project_name(&args, input.as_deref())?;

            let text = read_input(input.as_deref())?;
            let extraction = block_on(engine.extract(&text))?;
            let machine_names: Vec<String> = extraction
                .devices
                .iter()
                .map(|d| d.unique_name.clone())
                .collect();

            let yaml = machines_playbook(&machine_names, &templates, &server, &project)?;
            write_text(&yaml, args.out.as_deref())?;
            Ok(())
        }
        Command::Renumber => {
            let text = read_input(input.as_deref())?;
            let mut connections = manifest::read_manifest(&text)?;
            manifest::renumber_connections(&mut connections);
            let json = manifest::write_manifest(&connections)?;
            write_text(&json, args.out.as_deref())?;
            Ok(())
        }
    }
}

fn main() {
    // Keep stdout clean for piped artifacts; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
