use super::{load_function, resolve_settings, translate_or_exit, FunctionArgs};

pub fn cmd_hash(args: FunctionArgs, full: bool) {
    let settings = resolve_settings(&args, None);
    let loaded = load_function(&args.input, settings.function.as_deref());
    let graph = translate_or_exit(&loaded, &settings);

    let hash = graph.fingerprint();
    if full {
        println!("{} {}", hash.to_hex(), loaded.function.name);
    } else {
        println!("{} {}", hash, loaded.function.name);
    }
}
