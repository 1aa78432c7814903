//! Interaction state shared between charts.

/// The artist picked in the bar chart, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistSelection(Option<String>);

impl ArtistSelection {
    #[must_use]
    pub const fn new(artist: Option<String>) -> Self {
        Self(artist)
    }

    /// Select `artist`, or clear the selection if `artist` is already selected.
    pub fn toggle(&mut self, artist: &str) {
        if self.is_selected(artist) {
            self.0 = None;
        } else {
            self.0 = Some(artist.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn is_selected(&self, artist: &str) -> bool {
        self.get() == Some(artist)
    }

    #[must_use]
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

/// The heatmap's revealed year, always one of the observed years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestepCursor {
    years: Vec<u16>,
    index: usize,
}

impl TimestepCursor {
    /// Start at the earliest of `years`, `None` if there are none.
    #[must_use]
    pub fn new(years: impl IntoIterator<Item = u16>) -> Option<Self> {
        let mut years: Vec<u16> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        (!years.is_empty()).then_some(Self { years, index: 0 })
    }

    #[must_use]
    pub fn year(&self) -> u16 {
        self.years[self.index]
    }

    #[must_use]
    pub fn years(&self) -> &[u16] {
        &self.years
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Move to the observed year nearest to `year`, the earlier one on a tie.
    pub fn seek(&mut self, year: u16) -> u16 {
        self.index = match self.years.binary_search(&year) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) if i == self.years.len() => i - 1,
            Err(i) => {
                if year - self.years[i - 1] <= self.years[i] - year {
                    i - 1
                } else {
                    i
                }
            }
        };
        self.year()
    }

    /// Move to the `index`-th observed year, clamped to the last.
    pub fn seek_index(&mut self, index: usize) -> u16 {
        self.index = index.min(self.years.len() - 1);
        self.year()
    }

    /// Move `delta` observed years forward (or backward), stopping at either end.
    pub fn step(&mut self, delta: isize) -> u16 {
        self.index = self
            .index
            .saturating_add_signed(delta)
            .min(self.years.len() - 1);
        self.year()
    }
}
