//! Segment enumeration, the role of a single grid cell in a plant structure, and its
//! raw id/metadata encoding used by chunk storage.


/// Maturity of a bud that no longer grows.
pub const MAX_MATURITY: u8 = 5;


/// Internal macro to easily define the segment ids registry.
macro_rules! segments {
    (
        $($ident:ident / $id:literal : $name:literal),* $(,)?
    ) => {

        static NAMES: [&'static str; 4] = {
            let mut arr = [""; 4];
            $(arr[$id as usize] = $name;)*
            arr
        };

        $(pub const $ident: u8 = $id;)*

    };
}

segments! {
    EMPTY/0:        "empty",
    SUBSTRATE/1:    "substrate",
    STEM/2:         "stem",
    BUD/3:          "bud",
}

/// Get the name of a raw segment id, empty string if the id is not known.
#[inline]
pub fn name(id: u8) -> &'static str {
    NAMES.get(id as usize).copied().unwrap_or("")
}


/// The content of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Segment {
    /// Nothing in this cell.
    #[default]
    Empty,
    /// Anchor material that unconditionally supports a stem above it.
    Substrate,
    /// An intermediate segment of a plant.
    Stem,
    /// A terminal segment, it grows while its maturity is below [`MAX_MATURITY`].
    Bud {
        maturity: u8,
    },
}

impl Segment {

    /// Construct a bud with the given maturity. Panics if the maturity is greater than
    /// [`MAX_MATURITY`].
    #[inline]
    pub fn bud(maturity: u8) -> Self {
        assert!(maturity <= MAX_MATURITY, "invalid bud maturity {maturity}");
        Self::Bud { maturity }
    }

    /// A bud that is fully grown and will never change again.
    #[inline]
    pub fn mature_bud() -> Self {
        Self::Bud { maturity: MAX_MATURITY }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    #[inline]
    pub fn is_stem(self) -> bool {
        self == Self::Stem
    }

    #[inline]
    pub fn is_bud(self) -> bool {
        matches!(self, Self::Bud { .. })
    }

    /// Return true if this segment belongs to a plant, stem or bud.
    #[inline]
    pub fn is_plant(self) -> bool {
        matches!(self, Self::Stem | Self::Bud { .. })
    }

    /// Return the maturity of the segment if this is a bud.
    #[inline]
    pub fn maturity(self) -> Option<u8> {
        match self {
            Self::Bud { maturity } => Some(maturity),
            _ => None,
        }
    }

    /// Encode this segment into its raw id and metadata.
    #[inline]
    pub fn to_raw(self) -> (u8, u8) {
        match self {
            Self::Empty => (EMPTY, 0),
            Self::Substrate => (SUBSTRATE, 0),
            Self::Stem => (STEM, 0),
            Self::Bud { maturity } => (BUD, maturity),
        }
    }

    /// Decode a segment from its raw id and metadata, unknown ids and out of range
    /// maturities are rejected.
    #[inline]
    pub fn from_raw(id: u8, metadata: u8) -> Option<Self> {
        Some(match id {
            EMPTY => Self::Empty,
            SUBSTRATE => Self::Substrate,
            STEM => Self::Stem,
            BUD if metadata <= MAX_MATURITY => Self::Bud { maturity: metadata },
            _ => return None,
        })
    }

}
