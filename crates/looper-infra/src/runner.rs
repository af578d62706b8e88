//! The rotation loop: select, apply, record, sleep.

use chrono::Utc;
use looper_core::LooperError;
use looper_core::metadata::MetadataEntry;
use looper_core::rotation::Rotation;
use rand::Rng;

use crate::metadata_log::MetadataLog;
use crate::signal::{Sleeper, Wake};
use crate::wallpaper::WallpaperSetter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub applied: u64,
    pub failed: u64,
    pub interrupted: bool,
}

pub struct Looper<S, Z> {
    setter: S,
    sleeper: Z,
    preview: bool,
}

impl<S: WallpaperSetter, Z: Sleeper> Looper<S, Z> {
    pub fn new(setter: S, sleeper: Z) -> Self {
        Self {
            setter,
            sleeper,
            preview: false,
        }
    }

    /// In preview mode selections are logged but the setter is never called.
    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Run until the rotation is exhausted or the sleeper reports a stop.
    ///
    /// Setter failures are logged and do not end the run.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        rotation: &mut Rotation,
        log: &mut MetadataLog,
        rng: &mut R,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        loop {
            if self.sleeper.interrupted() {
                summary.interrupted = true;
                break;
            }
            let Some(tick) = rotation.next_tick(rng) else {
                break;
            };
            let path = &tick.image.path;
            tracing::debug!(
                tick = tick.number,
                index = tick.index,
                "selected {}",
                path.display()
            );

            let applied = if self.preview {
                false
            } else {
                match self.setter.apply(path) {
                    Ok(()) => true,
                    Err(err) => {
                        let err = LooperError::Platform(format!("{err:#}"));
                        tracing::warn!(tick = tick.number, "{err}");
                        summary.failed += 1;
                        false
                    }
                }
            };
            if applied {
                summary.applied += 1;
            }
            summary.ticks += 1;

            log.append(MetadataEntry::from_tick(&tick, Utc::now(), self.preview, applied));

            let next = tick
                .interval
                .map_or_else(|| "last".to_string(), |d| format!("next in {}s", d.as_secs()));
            if self.preview {
                tracing::info!("[{}] preview: {} ({next})", tick.number, path.display());
            } else {
                tracing::info!(
                    "[{}] set: {} (success={applied}) ({next})",
                    tick.number,
                    path.display()
                );
            }

            if let Some(interval) = tick.interval
                && self.sleeper.sleep(interval) == Wake::Interrupted
            {
                summary.interrupted = true;
                break;
            }
        }

        summary
    }
}
