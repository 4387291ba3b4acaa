use std::path::PathBuf;

use inkpond::core::logging;
use inkpond::render::window;
use inkpond::scene::DioramaConfig;

fn main() {
    logging::init();
    log::info!("Inkpond starting...");

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_config_arg(&args).unwrap_or_else(|| PathBuf::from("inkpond.json"));
    let config = DioramaConfig::load_or_default(&config_path);

    if let Err(e) = window::run(config) {
        log::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--config" || args[i] == "-c" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}
