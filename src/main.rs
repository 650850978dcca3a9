//! Property Constraints CLI
//!
//! Usage:
//!   property-constraints [OPTIONS] [FILE]
//!
//! Options:
//!   -f, --format <FORMAT>              Output syntax: owl (default) or ntriples
//!   -i, --input-format <FORMAT>        tsv (default) or page
//!   -p, --property <ID>                Property a page input belongs to
//!   -c, --config <FILE>                Configuration file (TOML format)
//!   -o, --output <FILE>                Output file (stdout if not provided)
//!       --unknown-parameters <POLICY>  ignore, warn or reject
//!       --prelude                      Write prefix declarations first
//!       --list-kinds                   List supported constraint kinds
//!   -v, --verbose                      Debug logging
//!   -h, --help                         Print help

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::{Parser, ValueEnum};

use property_constraints::renderer::{Backend, FunctionalSyntax, NTriples};
use property_constraints::template::scan;
use property_constraints::{
    render_all, CompileError, Compiler, CompilerConfig, Constraint, ConstraintTag, PropertyId,
    RenderError, RenderSummary, Renderer, UnknownParameterPolicy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// OWL 2 functional syntax
    Owl,
    /// N-Triples
    Ntriples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// One `<property>\t<declaration>` per line
    Tsv,
    /// A property talk page; requires --property
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Ignore,
    Warn,
    Reject,
}

impl From<PolicyArg> for UnknownParameterPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Ignore => UnknownParameterPolicy::Ignore,
            PolicyArg::Warn => UnknownParameterPolicy::Warn,
            PolicyArg::Reject => UnknownParameterPolicy::Reject,
        }
    }
}

#[derive(Parser)]
#[command(name = "property-constraints")]
#[command(about = "Compile property constraint templates into OWL or N-Triples")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output syntax
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Owl)]
    format: OutputFormat,

    /// Input layout
    #[arg(short, long, value_enum, default_value_t = InputFormat::Tsv)]
    input_format: InputFormat,

    /// Property the page input belongs to
    #[arg(short, long)]
    property: Option<PropertyId>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with parameters a constraint kind does not know
    #[arg(long, value_enum)]
    unknown_parameters: Option<PolicyArg>,

    /// Write prefix declarations before the first axiom
    #[arg(long)]
    prelude: bool,

    /// List supported constraint kinds and exit
    #[arg(long)]
    list_kinds: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

/// A declaration read from the input, with where it came from
struct Entry {
    property: PropertyId,
    declaration: String,
    origin: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    // Load configuration, then let flags override it
    let mut config = match &cli.config {
        Some(path) => match CompilerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => CompilerConfig::default(),
    };
    if let Some(policy) = cli.unknown_parameters {
        config.builder.unknown_parameters = policy.into();
    }
    if cli.prelude {
        config.render.prelude = true;
    }

    let compiler = Compiler::with_config(&config);

    if cli.list_kinds {
        print_kinds(&compiler, &config);
        return ExitCode::SUCCESS;
    }

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::from(2);
                }
            }
        }
    };

    let (entries, mut failures) = match cli.input_format {
        InputFormat::Tsv => read_tsv(&source),
        InputFormat::Page => match &cli.property {
            Some(property) => (read_page(&source, property), 0),
            None => {
                eprintln!("Error: --input-format page requires --property");
                return ExitCode::from(2);
            }
        },
    };

    let sources: Vec<(PropertyId, &str)> = entries
        .iter()
        .map(|e| (e.property.clone(), e.declaration.as_str()))
        .collect();
    let results = compiler.compile_all(&sources);

    let mut constraints: Vec<Constraint> = Vec::with_capacity(results.len());
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(constraint) => constraints.push(constraint),
            Err(err) => {
                failures += 1;
                report_failure(entry, &err);
            }
        }
    }

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("Error creating '{}': {}", path.display(), e);
                return ExitCode::from(2);
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let rendered = match cli.format {
        OutputFormat::Owl => render(sink, FunctionalSyntax::new(&config.render), &constraints),
        OutputFormat::Ntriples => render(sink, NTriples::new(&config.render), &constraints),
    };

    match rendered {
        Ok(summary) => {
            tracing::info!(
                declarations = entries.len(),
                rendered = summary.rendered,
                skipped = summary.skipped(),
                failed = failures,
                "done"
            );
            if failures > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn render<B: Backend>(
    sink: Box<dyn Write>,
    backend: B,
    constraints: &[Constraint],
) -> Result<RenderSummary, RenderError> {
    let unsupported: Vec<String> = ConstraintTag::ALL
        .iter()
        .filter(|tag| !backend.supports(**tag))
        .map(|tag| tag.to_string())
        .collect();
    if !unsupported.is_empty() {
        tracing::info!(backend = backend.name(), kinds = ?unsupported, "constraint kinds without output rule");
    }

    let cancel = AtomicBool::new(false);
    let mut renderer = Renderer::new(sink, backend);
    let summary = render_all(&mut renderer, constraints, &cancel)?;
    renderer.finish()?;
    Ok(summary)
}

/// Parse `<property>\t<declaration>` lines; `#` comments and blank lines are skipped
fn read_tsv(source: &str) -> (Vec<Entry>, usize) {
    let mut entries = Vec::new();
    let mut failures = 0;

    for (i, line) in source.lines().enumerate() {
        let origin = format!("line {}", i + 1);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((property, declaration)) = trimmed.split_once('\t') else {
            tracing::warn!(%origin, "expected <property>\\t<declaration>");
            failures += 1;
            continue;
        };
        match property.parse::<PropertyId>() {
            Ok(property) => entries.push(Entry {
                property,
                declaration: declaration.to_string(),
                origin,
            }),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "invalid property");
                failures += 1;
            }
        }
    }

    (entries, failures)
}

fn read_page(source: &str, property: &PropertyId) -> Vec<Entry> {
    scan::declarations(source)
        .map(|d| Entry {
            property: property.clone(),
            declaration: d.text.to_string(),
            origin: format!("offset {}", d.offset),
        })
        .collect()
}

fn report_failure(entry: &Entry, err: &CompileError) {
    tracing::warn!(
        property = %entry.property,
        origin = %entry.origin,
        declaration = %entry.declaration,
        error = %err,
        "declaration failed"
    );
    if let CompileError::Syntax(syntax) = err {
        eprint!("{}", syntax.report(&entry.declaration, &entry.origin));
    }
}

fn print_kinds(compiler: &Compiler, config: &CompilerConfig) {
    let owl = FunctionalSyntax::new(&config.render);
    let ntriples = NTriples::new(&config.render);

    for tag in ConstraintTag::ALL {
        let name = tag.template_name();
        let shape = compiler
            .registry()
            .accepted_shape(name)
            .map(|t| t.to_string())
            .unwrap_or_default();
        let mark = |supported: bool| if supported { "yes" } else { "no" };
        println!(
            "{:<22} owl={:<3} ntriples={:<3} {}",
            name,
            mark(owl.supports(tag)),
            mark(ntriples.supports(tag)),
            shape
        );
    }
}
