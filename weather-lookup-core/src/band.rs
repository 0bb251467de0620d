use std::fmt;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Background before the first successful lookup.
    pub const NEUTRAL: Rgb = Rgb(0xf7, 0xf7, 0xf7);

    pub const fn from_u32(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Celsius range that picks the background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureBand {
    Cold,
    Pleasant,
    Hot,
}

impl TemperatureBand {
    pub const COLD_MAX_C: f64 = 10.0;
    pub const PLEASANT_MAX_C: f64 = 25.0;

    /// `t <= 10` is cold, `10 < t <= 25` is pleasant, everything else is hot.
    pub fn classify(temperature_c: f64) -> Self {
        if temperature_c <= Self::COLD_MAX_C {
            TemperatureBand::Cold
        } else if temperature_c <= Self::PLEASANT_MAX_C {
            TemperatureBand::Pleasant
        } else {
            TemperatureBand::Hot
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            TemperatureBand::Cold => Rgb::from_u32(0xa2d2ff),
            TemperatureBand::Pleasant => Rgb::from_u32(0xd9f99d),
            TemperatureBand::Hot => Rgb::from_u32(0xffadad),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureBand::Cold => "cold",
            TemperatureBand::Pleasant => "pleasant",
            TemperatureBand::Hot => "hot",
        }
    }
}

impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(TemperatureBand::classify(10.0), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::classify(10.01), TemperatureBand::Pleasant);
        assert_eq!(TemperatureBand::classify(25.0), TemperatureBand::Pleasant);
        assert_eq!(TemperatureBand::classify(25.0001), TemperatureBand::Hot);
    }

    #[test]
    fn band_extremes() {
        assert_eq!(TemperatureBand::classify(-40.0), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::classify(f64::NEG_INFINITY), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::classify(48.5), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::classify(f64::INFINITY), TemperatureBand::Hot);
    }

    #[test]
    fn bands_partition_a_sweep() {
        // Every sampled temperature lands in exactly the band its predicate says.
        let mut t = -30.0;
        while t <= 45.0 {
            let expected = if t <= 10.0 {
                TemperatureBand::Cold
            } else if t > 10.0 && t <= 25.0 {
                TemperatureBand::Pleasant
            } else {
                TemperatureBand::Hot
            };
            assert_eq!(TemperatureBand::classify(t), expected, "t = {t}");
            t += 0.25;
        }
    }

    #[test]
    fn band_colors() {
        assert_eq!(TemperatureBand::Cold.color().to_string(), "#a2d2ff");
        assert_eq!(TemperatureBand::Pleasant.color().to_string(), "#d9f99d");
        assert_eq!(TemperatureBand::Hot.color().to_string(), "#ffadad");
        assert_eq!(Rgb::NEUTRAL.to_string(), "#f7f7f7");
    }
}
