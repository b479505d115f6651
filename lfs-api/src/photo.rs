use chrono::{DateTime, Utc};
use lfs_lib::ids;
use lfs_lib::quality::{Quality, Tiers};
use lfs_lib::serde::{int_id, null_default};
use serde::{Serialize, Deserialize};
use strum::IntoEnumIterator;

use crate::time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    #[serde(with = "int_id")]
    pub id: ids::PhotoId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizeVariant {
    #[serde(default)]
    pub filesize: Option<u64>,
}

/// pre-generated versions of a photo. a missing or null entry means the server
/// never generated that tier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizeVariants {
    #[serde(default)]
    pub original: Option<SizeVariant>,
    #[serde(default)]
    pub medium2x: Option<SizeVariant>,
    #[serde(default)]
    pub medium: Option<SizeVariant>,
    #[serde(default)]
    pub small2x: Option<SizeVariant>,
    #[serde(default)]
    pub small: Option<SizeVariant>,
    #[serde(default)]
    pub thumb2x: Option<SizeVariant>,
    #[serde(default)]
    pub thumb: Option<SizeVariant>,
}

impl SizeVariants {
    pub fn get(&self, quality: Quality) -> Option<&SizeVariant> {
        match quality {
            Quality::Thumbnail => self.thumb.as_ref(),
            Quality::Thumbnail2x => self.thumb2x.as_ref(),
            Quality::Small => self.small.as_ref(),
            Quality::Small2x => self.small2x.as_ref(),
            Quality::Medium => self.medium.as_ref(),
            Quality::Medium2x => self.medium2x.as_ref(),
            Quality::Full => self.original.as_ref(),
        }
    }

    pub fn set(&mut self, quality: Quality, variant: Option<SizeVariant>) {
        let slot = match quality {
            Quality::Thumbnail => &mut self.thumb,
            Quality::Thumbnail2x => &mut self.thumb2x,
            Quality::Small => &mut self.small,
            Quality::Small2x => &mut self.small2x,
            Quality::Medium => &mut self.medium,
            Quality::Medium2x => &mut self.medium2x,
            Quality::Full => &mut self.original,
        };

        *slot = variant;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    #[serde(with = "int_id")]
    pub id: ids::PhotoId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "null_default")]
    pub size_variants: SizeVariants,
}

impl Photo {
    /// tiers present on the server. the original is always there even when
    /// the server leaves it out of the variants
    pub fn tiers(&self) -> Tiers {
        let mut rtn: Tiers = Quality::iter()
            .filter(|q| self.size_variants.get(*q).is_some())
            .collect();

        rtn.insert(Quality::Full);
        rtn
    }

    /// byte size of the original file
    pub fn original_size(&self) -> u64 {
        self.filesize
            .or_else(|| self.size_variants.original.as_ref().and_then(|v| v.filesize))
            .unwrap_or(0)
    }
}
