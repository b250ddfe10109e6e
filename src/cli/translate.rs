use std::path::PathBuf;
use std::process;

use ir2graph::config::OutputFormat;
use ir2graph::graph::{DataflowView, Graph};

use super::{load_function, resolve_settings, translate_or_exit, FunctionArgs};

fn render(graph: &Graph, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n", graph),
        OutputFormat::Json => match graph.to_json() {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("error: cannot serialize graph: {}", e);
                process::exit(1);
            }
        },
        OutputFormat::Dot => DataflowView::from_graph(graph).to_dot(),
    }
}

pub fn cmd_translate(args: FunctionArgs, format: Option<OutputFormat>, output: Option<PathBuf>) {
    let settings = resolve_settings(&args, format);
    let loaded = load_function(&args.input, settings.function.as_deref());
    let graph = translate_or_exit(&loaded, &settings);
    tracing::info!(
        function = %loaded.function.name,
        operators = graph.operator_count(),
        nodes = graph.n_node(),
        "translated"
    );

    let text = render(&graph, settings.format);
    match output {
        Some(out_path) => {
            if let Err(e) = std::fs::write(&out_path, &text) {
                eprintln!("error: cannot write '{}': {}", out_path.display(), e);
                process::exit(1);
            }
            eprintln!("Translated {} -> {}", loaded.function.name, out_path.display());
        }
        None => print!("{}", text),
    }
}
