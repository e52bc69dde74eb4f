/// Engine colour: a 32-bit "long" packed as `0xAABBGGRR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ColourDesired(pub u32);

impl ColourDesired {
    /// Pack individual channels.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32)
    }

    /// Opaque colour from channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }

    #[inline]
    pub const fn as_long(self) -> u32 {
        self.0
    }

    /// Same RGB with a replaced alpha channel.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }
}

impl From<u32> for ColourDesired {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Host colour, packed RGBA with the same `0xAABBGGRR` layout.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct HostColor(pub u32);

// Both sides share the layout, so the conversion is a plain copy.
impl From<ColourDesired> for HostColor {
    #[inline]
    fn from(colour: ColourDesired) -> Self {
        Self(colour.as_long())
    }
}
