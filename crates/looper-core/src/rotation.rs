//! Rotation state: which image comes next and how long it stays.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::LooperError;
use crate::image::ImageRef;

/// How the image list is ordered across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPolicy {
    /// Keep the list as given.
    #[default]
    Sequential,
    /// Permute again at the start of every pass.
    ShuffleEachCycle,
}

impl OrderPolicy {
    /// `--shuffle` and `--randomize-order` both reshuffle on every pass.
    pub fn from_flags(shuffle: bool, randomize_order: bool) -> Self {
        if shuffle || randomize_order {
            Self::ShuffleEachCycle
        } else {
            Self::Sequential
        }
    }
}

/// Delay between ticks, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalPolicy {
    Fixed(u64),
    Random { min: u64, max: u64 },
}

impl IntervalPolicy {
    pub fn random(min: u64, max: u64) -> Result<Self, LooperError> {
        if min > max {
            return Err(LooperError::config(format!(
                "min interval ({min}s) is greater than max interval ({max}s)"
            )));
        }
        Ok(Self::Random { min, max })
    }

    /// Draw the next delay. Random bounds are inclusive.
    pub fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let secs = match *self {
            Self::Fixed(secs) => secs,
            Self::Random { min, max } => rng.random_range(min..=max),
        };
        Duration::from_secs(secs)
    }
}

/// One selection made by [`Rotation::next_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// 1-based tick number.
    pub number: u64,
    /// Position of `image` in the list at selection time.
    pub index: usize,
    pub image: ImageRef,
    /// Sleep before the next tick. `None` after the last tick of a bounded run.
    pub interval: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Rotation {
    images: Vec<ImageRef>,
    index: usize,
    remaining: Option<u64>,
    ticks: u64,
    order: OrderPolicy,
    interval: IntervalPolicy,
}

impl Rotation {
    /// `count` is the number of ticks to run; `None` runs until stopped.
    pub fn new(
        images: Vec<ImageRef>,
        order: OrderPolicy,
        interval: IntervalPolicy,
        count: Option<u64>,
    ) -> Result<Self, LooperError> {
        if images.is_empty() {
            return Err(LooperError::config("no images available"));
        }
        if count == Some(0) {
            return Err(LooperError::config("--count must be at least 1"));
        }
        Ok(Self {
            images,
            index: 0,
            remaining: count,
            ticks: 0,
            order,
            interval,
        })
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Select the next image and advance. Returns `None` once the count is used up.
    pub fn next_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tick> {
        if self.is_finished() {
            return None;
        }

        if self.index == 0 && self.order == OrderPolicy::ShuffleEachCycle {
            self.images.shuffle(rng);
        }

        let index = self.index;
        let image = self.images[index].clone();

        self.ticks += 1;
        if let Some(left) = self.remaining.as_mut() {
            *left -= 1;
        }
        self.index = (self.index + 1) % self.images.len();

        let interval = if self.is_finished() {
            None
        } else {
            Some(self.interval.next(rng))
        };

        Some(Tick {
            number: self.ticks,
            index,
            image,
            interval,
        })
    }
}
