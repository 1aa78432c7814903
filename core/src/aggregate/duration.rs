//! Duration buckets × popularity bands, the table behind the stream chart.

use strum::{Display, IntoStaticStr};

use crate::track::DurationTrack;

/// A half-open range of track durations, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
pub enum DurationBucket {
    /// `[0, 2)`
    #[strum(serialize = "0-2")]
    UnderTwo,
    /// `[2, 3)`
    #[strum(serialize = "2-3")]
    TwoToThree,
    /// `[3, 4)`
    #[strum(serialize = "3-4")]
    ThreeToFour,
    /// `[4, 5)`
    #[strum(serialize = "4-5")]
    FourToFive,
    /// `[5, ∞)`
    #[strum(serialize = "5+")]
    FivePlus,
}

impl DurationBucket {
    /// Every bucket, in axis order.
    pub const ALL: [Self; 5] = [
        Self::UnderTwo,
        Self::TwoToThree,
        Self::ThreeToFour,
        Self::FourToFive,
        Self::FivePlus,
    ];

    #[must_use]
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes < 2.0 {
            Self::UnderTwo
        } else if minutes < 3.0 {
            Self::TwoToThree
        } else if minutes < 4.0 {
            Self::ThreeToFour
        } else if minutes < 5.0 {
            Self::FourToFive
        } else {
            Self::FivePlus
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Position on the axis.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
pub enum PopularityBand {
    /// Below 40.
    Low,
    /// 40 up to (not including) 70.
    Medium,
    /// 70 and above.
    High,
}

impl PopularityBand {
    /// Every band, bottom of the stack first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub fn from_popularity(popularity: f64) -> Self {
        if popularity < 40.0 {
            Self::Low
        } else if popularity < 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Track counts per popularity band for one duration bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRow {
    pub bucket: DurationBucket,
    /// Indexed by [`PopularityBand::index`].
    pub counts: [usize; 3],
}

impl DurationRow {
    #[must_use]
    pub const fn count(&self, band: PopularityBand) -> usize {
        self.counts[band.index()]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// One row per duration bucket, always all five, in axis order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTable {
    pub rows: [DurationRow; 5],
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            rows: DurationBucket::ALL.map(|bucket| DurationRow {
                bucket,
                counts: [0; 3],
            }),
        }
    }
}

impl DurationTable {
    #[must_use]
    pub const fn row(&self, bucket: DurationBucket) -> &DurationRow {
        &self.rows[bucket.index()]
    }

    /// The largest per-bucket total, the top of the stack.
    #[must_use]
    pub fn max_total(&self) -> usize {
        self.rows.iter().map(DurationRow::total).max().unwrap_or_default()
    }

    /// How many tracks the table counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(DurationRow::total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Count tracks into the duration × popularity table.
#[must_use]
pub fn duration_table<'a>(tracks: impl IntoIterator<Item = &'a DurationTrack>) -> DurationTable {
    let mut table = DurationTable::default();
    for track in tracks {
        let bucket = DurationBucket::from_minutes(track.duration_minutes);
        let band = PopularityBand::from_popularity(track.popularity);
        table.rows[bucket.index()].counts[band.index()] += 1;
    }
    table
}
