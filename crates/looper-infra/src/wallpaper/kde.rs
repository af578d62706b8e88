use std::path::Path;
use std::process::Command;

use anyhow::anyhow;

use super::{file_uri, run_tool};

fn find_qdbus() -> Option<&'static str> {
    // Plasma 6 ships qdbus6, Plasma 5 qdbus or qdbus-qt5.
    ["qdbus6", "qdbus", "qdbus-qt5"]
        .into_iter()
        .find(|exe| Command::new(exe).arg("--version").output().is_ok())
}

fn plasma_script(uri: &str) -> String {
    format!(
        "var allDesktops = desktops();\n\
         for (var i = 0; i < allDesktops.length; i++) {{\n\
           var d = allDesktops[i];\n\
           d.wallpaperPlugin = 'org.kde.image';\n\
           d.currentConfigGroup = ['Wallpaper', 'org.kde.image', 'General'];\n\
           d.writeConfig('Image', '{uri}');\n\
         }}\n"
    )
}

pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    let qdbus = find_qdbus().ok_or_else(|| anyhow!("qdbus not found (qdbus6/qdbus/qdbus-qt5)"))?;
    let uri = file_uri(image_abs)?;
    let script = plasma_script(&uri);

    run_tool(
        qdbus,
        [
            "org.kde.plasmashell",
            "/PlasmaShell",
            "org.kde.PlasmaShell.evaluateScript",
            script.as_str(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_targets_every_desktop() {
        let s = plasma_script("file:///pics/a.png");
        assert!(s.contains("desktops()"));
        assert!(s.contains("writeConfig('Image', 'file:///pics/a.png')"));
    }
}
