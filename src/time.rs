use std::fmt;
use std::num::NonZeroU32;
use std::ops::{Add, Sub};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Timestamp(u64);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Duration(u64);

impl Duration {
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl Timestamp {
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms)
    }

    /// Builds a timestamp from the `H:MM:SS:mmm` components used by `*.idx` files.
    ///
    /// Components are not range checked (`0:90:00:000` is accepted as 90 minutes),
    /// only overflow is rejected.
    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes.checked_mul(60_000)?)?
            .checked_add(seconds.checked_mul(1_000)?)?
            .checked_add(millis)
            .map(Self)
    }

    /// The time at which `frame` starts at `fps` frames per second, truncated to the
    /// millisecond.
    pub fn from_frame(frame: u64, fps: NonZeroU32) -> Self {
        Self(frame.saturating_mul(1000) / u64::from(fps.get()))
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Formats as `HH<d>MM<d>SS<d>mmm`.
    pub fn delimited(self, delimiter: char) -> String {
        let ms = self.as_millis();
        format!(
            "{:02}{d}{:02}{d}{:02}{d}{:03}",
            ms / (1000 * 60 * 60),
            (ms / (1000 * 60)) % 60,
            (ms / 1000) % 60,
            ms % 1000,
            d = delimiter
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.as_millis();
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            ms / (1000 * 60 * 60),
            (ms / (1000 * 60)) % 60,
            (ms / 1000) % 60,
            ms % 1000
        )
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis()))
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, duration: Duration) -> Self {
        Self(self.0.saturating_sub(duration.as_millis()))
    }
}
