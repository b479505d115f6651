use std::fmt;
use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// pre-generated resolution levels a photo may have on the server, ordered
/// from lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    AsRefStr, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Quality {
    #[strum(to_string = "thumb", serialize = "thumbnail")]
    Thumbnail,
    #[strum(to_string = "thumb2x", serialize = "thumbnail2x")]
    Thumbnail2x,
    #[strum(serialize = "small")]
    Small,
    #[strum(serialize = "small2x")]
    Small2x,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "medium2x")]
    Medium2x,
    #[strum(to_string = "full", serialize = "original")]
    Full,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown quality tier \"{0}\"")]
pub struct InvalidQuality(pub String);

impl Quality {
    pub fn parse<S>(given: S) -> Result<Self, InvalidQuality>
    where
        S: AsRef<str>
    {
        Quality::from_str(given.as_ref().trim())
            .map_err(|_| InvalidQuality(given.as_ref().to_owned()))
    }

    /// the next tier up the scale. Full is the top and has nothing above it
    pub fn higher(&self) -> Option<Quality> {
        match self {
            Quality::Thumbnail => Some(Quality::Thumbnail2x),
            Quality::Thumbnail2x => Some(Quality::Small),
            Quality::Small => Some(Quality::Small2x),
            Quality::Small2x => Some(Quality::Medium),
            Quality::Medium => Some(Quality::Medium2x),
            Quality::Medium2x => Some(Quality::Full),
            Quality::Full => None,
        }
    }

    /// value of the `kind` parameter when downloading a photo at this tier
    pub fn archive_kind(&self) -> &'static str {
        match self {
            Quality::Thumbnail => "THUMB",
            Quality::Thumbnail2x => "THUMB2x",
            Quality::Small => "SMALL",
            Quality::Small2x => "SMALL2x",
            Quality::Medium => "MEDIUM",
            Quality::Medium2x => "MEDIUM2x",
            Quality::Full => "FULL",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Full
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_ref(), f)
    }
}

/// set of tiers that actually exist on the server for a single photo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tiers(u8);

impl Tiers {
    pub fn new() -> Self {
        Tiers(0)
    }

    pub fn insert(&mut self, quality: Quality) {
        self.0 |= quality.bit();
    }

    pub fn contains(&self, quality: Quality) -> bool {
        self.0 & quality.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Quality> + '_ {
        Quality::iter().filter(|q| self.contains(*q))
    }
}

impl FromIterator<Quality> for Tiers {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Quality>
    {
        let mut rtn = Tiers::new();

        for quality in iter {
            rtn.insert(quality);
        }

        rtn
    }
}

impl<const N: usize> From<[Quality; N]> for Tiers {
    fn from(list: [Quality; N]) -> Self {
        list.into_iter().collect()
    }
}

/// picks the tier a photo will be served at. walks up from the requested tier
/// until one the server has is found. Full is always considered available and
/// ends the walk, so the result is never lower than requested.
pub fn resolve(requested: Quality, available: &Tiers) -> Quality {
    if requested == Quality::Full {
        return Quality::Full;
    }

    let mut current = requested;

    loop {
        if available.contains(current) {
            return current;
        }

        match current.higher() {
            Some(next) => current = next,
            None => return Quality::Full,
        }
    }
}
