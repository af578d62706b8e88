use std::path::Path;
use std::process::Command;

use super::{file_uri, run_tool};

const SCHEMA: &str = "org.gnome.desktop.background";

pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    let uri = file_uri(image_abs)?;

    run_tool("gsettings", ["set", SCHEMA, "picture-uri", uri.as_str()])?;

    // GNOME 42+ keeps a separate key for the dark style; older releases reject it.
    let _ = Command::new("gsettings")
        .args(["set", SCHEMA, "picture-uri-dark", uri.as_str()])
        .status();

    Ok(())
}
