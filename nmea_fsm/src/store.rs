use crate::{
    constants::{HUNDREDTHS_LEN, LATITUDE_TEXT_LEN, LONGITUDE_TEXT_LEN, SENTINEL, TIME_LEN},
    flags::Flags,
};

/// One of the buffers held by the [`FieldStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Latitude text as received, `DDMM.mmm`
    LatitudeDegMin,
    /// First two fractional digits of the latitude minutes
    LatitudeHundredths,
    /// Longitude text as received, `DDDMM.mmm`
    LongitudeDegMin,
    /// First two fractional digits of the longitude minutes
    LongitudeHundredths,
    /// UTC time of the fix, `hhmmss`
    Time,
    /// Fix quality code as an ASCII digit
    Quality,
}

impl Field {
    pub const fn capacity(self) -> usize {
        match self {
            Field::LatitudeDegMin => LATITUDE_TEXT_LEN,
            Field::LongitudeDegMin => LONGITUDE_TEXT_LEN,
            Field::LatitudeHundredths | Field::LongitudeHundredths => HUNDREDTHS_LEN,
            Field::Time => TIME_LEN,
            Field::Quality => 1,
        }
    }
}

/// Fixed-capacity character buffer. Characters past the capacity are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Text<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for Text<N> {
    fn default() -> Self {
        Self {
            buf: [SENTINEL; N],
            len: 0,
        }
    }
}

impl<const N: usize> Text<N> {
    pub(crate) fn push(&mut self, byte: u8) {
        if self.len < N {
            self.buf[self.len] = byte;
            self.len += 1;
        }
    }

    /// Contents padded with [`SENTINEL`]
    pub(crate) fn padded(&self) -> [u8; N] {
        self.buf
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Which sentence a pending fix is being read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceKind {
    /// `$GPGGA`: time, position and quality
    Gga,
    /// `$GPRMC`: time and position
    Rmc,
}

/// Fields staged while a sentence is in progress. Nothing here is visible
/// to the responder until [`FieldStore::commit`] copies it across.
#[derive(Debug, Clone, Default)]
pub(crate) struct PendingFix {
    pub(crate) kind: Option<SentenceKind>,
    pub(crate) time: Text<TIME_LEN>,
    pub(crate) latitude: Text<LATITUDE_TEXT_LEN>,
    pub(crate) latitude_hundredths: Text<HUNDREDTHS_LEN>,
    pub(crate) longitude: Text<LONGITUDE_TEXT_LEN>,
    pub(crate) longitude_hundredths: Text<HUNDREDTHS_LEN>,
    pub(crate) quality: Option<u8>,
    pub(crate) hemisphere: Flags,
}

impl PendingFix {
    pub(crate) fn begin(kind: SentenceKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// The fields of the last complete sentence.
///
/// Every buffer starts out filled with [`SENTINEL`]. A commit replaces all tracked
/// fields at once; RMC sentences carry no quality so the stored quality is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStore {
    latitude: [u8; LATITUDE_TEXT_LEN],
    latitude_hundredths: [u8; HUNDREDTHS_LEN],
    longitude: [u8; LONGITUDE_TEXT_LEN],
    longitude_hundredths: [u8; HUNDREDTHS_LEN],
    time: [u8; TIME_LEN],
    quality: u8,
    commits: u32,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self {
            latitude: [SENTINEL; LATITUDE_TEXT_LEN],
            latitude_hundredths: [SENTINEL; HUNDREDTHS_LEN],
            longitude: [SENTINEL; LONGITUDE_TEXT_LEN],
            longitude_hundredths: [SENTINEL; HUNDREDTHS_LEN],
            time: [SENTINEL; TIME_LEN],
            quality: SENTINEL,
            commits: 0,
        }
    }
}

impl FieldStore {
    pub(crate) fn commit(&mut self, fix: &PendingFix) {
        self.latitude = fix.latitude.padded();
        self.latitude_hundredths = fix.latitude_hundredths.padded();
        self.longitude = fix.longitude.padded();
        self.longitude_hundredths = fix.longitude_hundredths.padded();
        self.time = fix.time.padded();
        if let Some(quality) = fix.quality {
            self.quality = quality;
        }
        self.commits = self.commits.saturating_add(1);
    }

    /// Character `index` of `field`, or [`SENTINEL`] when `index` is past the field's capacity.
    /// The quality field has a single position, so only index 0 returns it.
    pub fn read(&self, field: Field, index: u8) -> u8 {
        self.field(field)
            .get(usize::from(index))
            .copied()
            .unwrap_or(SENTINEL)
    }

    /// The whole buffer behind `field`
    pub fn field(&self, field: Field) -> &[u8] {
        match field {
            Field::LatitudeDegMin => &self.latitude,
            Field::LatitudeHundredths => &self.latitude_hundredths,
            Field::LongitudeDegMin => &self.longitude,
            Field::LongitudeHundredths => &self.longitude_hundredths,
            Field::Time => &self.time,
            Field::Quality => core::slice::from_ref(&self.quality),
        }
    }

    /// Number of sentences committed so far, stopping at `u32::MAX`
    pub fn commits(&self) -> u32 {
        self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.commits == 0
    }
}
