pub mod check;
pub mod hash;
pub mod translate;

use std::path::{Path, PathBuf};
use std::process;

use ir2graph::config::{Manifest, OutputFormat, Overrides, Settings};
use ir2graph::diagnostic::{render_diagnostics, Diagnostic};
use ir2graph::graph::Graph;
use ir2graph::ir::Function;
use ir2graph::TranslateError;

/// Options shared by every subcommand that translates a function.
#[derive(clap::Args, Clone, Debug)]
pub struct FunctionArgs {
    /// Input IR file (.ll)
    pub input: PathBuf,
    /// Function to translate (default: manifest name, or the only function)
    #[arg(long)]
    pub name: Option<String>,
    /// Number of dynamic parameters (leading entries of the input buffer)
    #[arg(long)]
    pub dynamic: Option<usize>,
    /// Number of independent variables
    #[arg(long)]
    pub variables: Option<usize>,
    /// Number of dependent variables
    #[arg(long)]
    pub dependent: Option<usize>,
}

impl FunctionArgs {
    fn overrides(&self, format: Option<OutputFormat>) -> Overrides {
        Overrides {
            function: self.name.clone(),
            dynamic: self.dynamic,
            variables: self.variables,
            dependent: self.dependent,
            format,
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let directive = if verbose { "ir2graph=debug" } else { "ir2graph=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(diag: &Diagnostic) -> ! {
    eprintln!("error: {}", diag.message);
    for note in &diag.notes {
        eprintln!("  note: {}", note);
    }
    if let Some(help) = &diag.help {
        eprintln!("  help: {}", help);
    }
    process::exit(1);
}

/// Merge the nearest ir2graph.toml (if any) with command-line values.
pub fn resolve_settings(args: &FunctionArgs, format: Option<OutputFormat>) -> Settings {
    let start = args.input.parent().unwrap_or(Path::new("."));
    let manifest = match Manifest::find(start) {
        Some(toml_path) => {
            tracing::debug!(manifest = %toml_path.display(), "using manifest");
            Manifest::load(&toml_path).unwrap_or_else(|e| exit_with(&e))
        }
        None => Manifest::default(),
    };
    manifest
        .merge(&args.overrides(format))
        .unwrap_or_else(|e| exit_with(&e))
}

/// IR text and the function selected from it.
pub struct Loaded {
    pub filename: String,
    pub source: String,
    pub function: Function,
}

/// Read and parse the input, then pick the function to translate.
pub fn load_function(path: &Path, wanted: Option<&str>) -> Loaded {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    };
    let filename = path.to_string_lossy().to_string();

    let mut module = match ir2graph::parse_module(&source) {
        Ok(m) => m,
        Err(errors) => {
            render_diagnostics(&errors, &filename, &source);
            process::exit(1);
        }
    };

    let index = match wanted {
        Some(name) => module.functions.iter().position(|f| f.name == name),
        None if module.functions.len() == 1 => Some(0),
        None => None,
    };
    let Some(index) = index else {
        match wanted {
            Some(name) => eprintln!(
                "error: no function '{}' in '{}' (found: {})",
                name,
                path.display(),
                module.names().join(", ")
            ),
            None => {
                eprintln!(
                    "error: '{}' defines {} functions, select one with --name",
                    path.display(),
                    module.functions.len()
                );
            }
        }
        process::exit(1);
    };

    Loaded {
        filename,
        source,
        function: module.functions.swap_remove(index),
    }
}

/// Point a translation error at the offending instruction when possible.
pub fn translation_diagnostic(error: &TranslateError, function: &Function) -> Diagnostic {
    let insts = function.instructions();
    let culprit = match error {
        TranslateError::UnsupportedOpcode { opcode } => {
            insts.iter().find(|inst| inst.opcode.name() == opcode.as_str())
        }
        TranslateError::UnresolvedCallee { name } => insts.iter().find(|inst| {
            inst.callee()
                .and_then(|callee| function.symbol_name(callee))
                .is_some_and(|callee| callee == name.as_str())
        }),
        _ => error.instruction().and_then(|i| insts.get(i)),
    };
    let span = culprit.map(|inst| inst.span).unwrap_or_default();
    Diagnostic::error(error.to_string(), span)
        .with_note(format!("while translating function '{}'", function.name))
}

/// Translate the loaded function, rendering the failure and exiting on error.
pub fn translate_or_exit(loaded: &Loaded, settings: &Settings) -> Graph {
    let ctx = settings.context(&loaded.function.name);
    match ir2graph::translate_to_graph(&loaded.function, &ctx) {
        Ok(graph) => graph,
        Err(e) => {
            translation_diagnostic(&e, &loaded.function).render(&loaded.filename, &loaded.source);
            process::exit(1);
        }
    }
}
