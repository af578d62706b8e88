//! Desktop environment detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopKind {
    Cosmic,
    Gnome,
    Kde,
    Other,
}

/// Classify the running desktop from `XDG_CURRENT_DESKTOP`, falling back to `DESKTOP_SESSION`.
pub fn detect_desktop() -> DesktopKind {
    let raw = std::env::var("XDG_CURRENT_DESKTOP")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("DESKTOP_SESSION").ok())
        .unwrap_or_default();
    classify(&raw)
}

fn classify(raw: &str) -> DesktopKind {
    // XDG_CURRENT_DESKTOP is a colon-separated list, e.g. "ubuntu:GNOME".
    for part in raw.split(':') {
        let part = part.trim().to_ascii_lowercase();
        if part.contains("cosmic") {
            return DesktopKind::Cosmic;
        }
        if part.contains("gnome") || part == "unity" || part == "budgie" {
            return DesktopKind::Gnome;
        }
        if part.contains("kde") || part.contains("plasma") {
            return DesktopKind::Kde;
        }
    }
    DesktopKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_desktops() {
        assert_eq!(classify("ubuntu:GNOME"), DesktopKind::Gnome);
        assert_eq!(classify("KDE"), DesktopKind::Kde);
        assert_eq!(classify("plasmawayland"), DesktopKind::Kde);
        assert_eq!(classify("COSMIC"), DesktopKind::Cosmic);
        assert_eq!(classify("i3"), DesktopKind::Other);
        assert_eq!(classify(""), DesktopKind::Other);
    }
}
