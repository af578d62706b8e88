//! Error output for the CLI.

use looper_core::LooperError;

pub fn debug_enabled() -> bool {
    std::env::var_os("LOOPER_DEBUG").is_some_and(|v| !v.is_empty())
}

/// One line by default, the whole context chain in debug mode. Configuration
/// errors get a pointer to `--help`.
fn format_error(err: &anyhow::Error, debug: bool) -> String {
    let mut out = if debug {
        format!("error: {err:#}")
    } else {
        format!("error: {err}")
    };
    if err.downcast_ref::<LooperError>().is_some_and(LooperError::is_config) {
        out.push_str("\nhint: see `looper --help` for the available options");
    }
    out
}

pub fn print_error(err: &anyhow::Error) {
    eprintln!("{}", format_error(err, debug_enabled()));
}
