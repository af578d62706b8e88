use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use anyhow::anyhow;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    SPI_SETDESKWALLPAPER, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SystemParametersInfoW,
};

pub(super) fn set_wallpaper(image_abs: &Path) -> anyhow::Result<()> {
    let mut wide: Vec<u16> = image_abs
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // SAFETY: `wide` is NUL-terminated and outlives the call.
    let ok = unsafe {
        SystemParametersInfoW(
            SPI_SETDESKWALLPAPER,
            0,
            wide.as_mut_ptr().cast(),
            SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
        )
    };
    if ok == 0 {
        return Err(anyhow!(
            "SystemParametersInfoW failed: {}",
            std::io::Error::last_os_error()
        ));
    }
    Ok(())
}
