use std::path::Path;

use anyhow::anyhow;

use super::run_tool;

pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    let path = image_abs
        .to_str()
        .ok_or_else(|| anyhow!("path is not valid UTF-8"))?;
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    let script = format!(
        "tell application \"System Events\" to tell every desktop to set picture to POSIX file \"{escaped}\""
    );
    run_tool("osascript", ["-e", script.as_str()])
}
