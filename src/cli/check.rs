use super::{load_function, resolve_settings, translate_or_exit, FunctionArgs};

pub fn cmd_check(args: FunctionArgs) {
    let settings = resolve_settings(&args, None);
    let loaded = load_function(&args.input, settings.function.as_deref());
    let graph = translate_or_exit(&loaded, &settings);
    eprintln!(
        "OK: {} ({} operators, {} nodes)",
        loaded.function.name,
        graph.operator_count(),
        graph.n_node()
    );
}
