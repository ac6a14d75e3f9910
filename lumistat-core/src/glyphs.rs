//! Fixed bitmap tables: mood/clock icons and the two-digit numeral font.

/// Happy-mood comfort band: temperature in degrees Celsius
const HAPPY_TEMP: (f32, f32) = (19.0, 27.0);
/// Happy-mood comfort band: relative humidity percent
const HAPPY_HUMIDITY: (f32, f32) = (35.0, 65.0);
/// Outside these bounds the room is uncomfortable
const SAD_TEMP: (f32, f32) = (16.0, 30.0);
const SAD_HUMIDITY: (f32, f32) = (25.0, 80.0);

/// The closed set of 8x8 icons the panel can show.
///
/// Each bitmap is stored top-to-bottom, one byte per row, MSB =
/// leftmost pixel. [`crate::draw::draw_icon`] flips rows vertically to
/// match the physical mounting orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    /// Flat-mouthed face
    Neutral,
    /// Smiling face, shown inside the comfort band
    Happy,
    /// Frowning face, shown outside the tolerable band
    Sad,
    /// Clock face for the clock mode
    Clock,
}

const ICON_NEUTRAL: [u8; 8] = [0x3C, 0x42, 0xA5, 0x81, 0xBD, 0x81, 0x42, 0x3C];
const ICON_HAPPY: [u8; 8] = [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C];
const ICON_SAD: [u8; 8] = [0x3C, 0x42, 0xA5, 0x81, 0x99, 0xA5, 0x42, 0x3C];
const ICON_CLOCK: [u8; 8] = [0x7E, 0x81, 0x91, 0x91, 0x9D, 0x81, 0x81, 0x7E];

impl Icon {
    /// Bitmap rows for this icon
    pub const fn bitmap(self) -> &'static [u8; 8] {
        match self {
            Self::Neutral => &ICON_NEUTRAL,
            Self::Happy => &ICON_HAPPY,
            Self::Sad => &ICON_SAD,
            Self::Clock => &ICON_CLOCK,
        }
    }

    /// Pick the mood icon for the given room readings.
    ///
    /// Happy wins when both readings sit inside the comfort band; sad
    /// when either is outside the tolerable band; neutral otherwise.
    /// NaN readings (sensor absent or not yet sampled) compare false
    /// everywhere and therefore fall through to neutral.
    pub fn for_comfort(temperature_c: f32, humidity_pct: f32) -> Self {
        let happy = temperature_c >= HAPPY_TEMP.0
            && temperature_c <= HAPPY_TEMP.1
            && humidity_pct >= HAPPY_HUMIDITY.0
            && humidity_pct <= HAPPY_HUMIDITY.1;
        let sad = temperature_c < SAD_TEMP.0
            || temperature_c > SAD_TEMP.1
            || humidity_pct < SAD_HUMIDITY.0
            || humidity_pct > SAD_HUMIDITY.1;

        if happy {
            Self::Happy
        } else if sad {
            Self::Sad
        } else {
            Self::Neutral
        }
    }
}

/// 3x5 digit font: 3 bytes per digit, one byte per column left to
/// right, the top 5 bits of each byte running top to bottom.
pub const FONT_3X5: [[u8; 3]; 10] = [
    [0xF8, 0x88, 0xF8], // 0
    [0x10, 0xF8, 0x00], // 1
    [0xE8, 0xA8, 0xB8], // 2
    [0xA8, 0xA8, 0xF8], // 3
    [0x38, 0x20, 0xF8], // 4
    [0xB8, 0xA8, 0xE8], // 5
    [0xF8, 0xA8, 0xE8], // 6
    [0x08, 0x08, 0xF8], // 7
    [0xF8, 0xA8, 0xF8], // 8
    [0xB8, 0xA8, 0xF8], // 9
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comfort_band_is_happy() {
        assert_eq!(Icon::for_comfort(22.0, 50.0), Icon::Happy);
        assert_eq!(Icon::for_comfort(19.0, 35.0), Icon::Happy);
        assert_eq!(Icon::for_comfort(27.0, 65.0), Icon::Happy);
    }

    #[test]
    fn test_cold_room_is_sad_regardless_of_humidity() {
        assert_eq!(Icon::for_comfort(10.0, 50.0), Icon::Sad);
        assert_eq!(Icon::for_comfort(10.0, 99.0), Icon::Sad);
        assert_eq!(Icon::for_comfort(15.9, 45.0), Icon::Sad);
    }

    #[test]
    fn test_extremes_are_sad() {
        assert_eq!(Icon::for_comfort(31.0, 50.0), Icon::Sad);
        assert_eq!(Icon::for_comfort(22.0, 20.0), Icon::Sad);
        assert_eq!(Icon::for_comfort(22.0, 85.0), Icon::Sad);
    }

    #[test]
    fn test_in_between_is_neutral() {
        assert_eq!(Icon::for_comfort(17.0, 50.0), Icon::Neutral);
        assert_eq!(Icon::for_comfort(29.0, 50.0), Icon::Neutral);
        assert_eq!(Icon::for_comfort(22.0, 30.0), Icon::Neutral);
    }

    #[test]
    fn test_missing_readings_are_neutral() {
        assert_eq!(Icon::for_comfort(f32::NAN, f32::NAN), Icon::Neutral);
        assert_eq!(Icon::for_comfort(f32::NAN, 50.0), Icon::Neutral);
    }

    #[test]
    fn test_every_digit_uses_only_the_top_five_bits() {
        for digit in FONT_3X5 {
            for column in digit {
                assert_eq!(column & 0b0000_0111, 0);
            }
        }
    }
}
