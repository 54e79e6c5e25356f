use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque 8-bit RGB colour, written as `#rrggbb` in config files and the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("`{}` is not a #rrggbb colour", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }
}

/// Colours used to draw a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: ThemeName,
    /// Canvas background, also used behind measurement labels.
    pub background: Rgb,
    pub grid_major: Rgb,
    pub grid_minor: Rgb,
    pub axis: Rgb,
    pub text_primary: Rgb,
    /// Watermark colour.
    pub text_secondary: Rgb,
    /// Data points and measurement overlays.
    pub accent: Rgb,
    /// Colours handed out to new equations, in order, cycling.
    pub palette: [Rgb; 6],
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: ThemeName::Light,
            background: Rgb::new(0xff, 0xff, 0xff),
            grid_major: Rgb::new(0xd0, 0xd4, 0xdb),
            grid_minor: Rgb::new(0xee, 0xf0, 0xf3),
            axis: Rgb::new(0x33, 0x3a, 0x45),
            text_primary: Rgb::new(0x1f, 0x29, 0x37),
            text_secondary: Rgb::new(0x6b, 0x72, 0x80),
            accent: Rgb::new(0x25, 0x63, 0xeb),
            palette: [
                Rgb::new(0xe7, 0x4c, 0x3c),
                Rgb::new(0x34, 0x98, 0xdb),
                Rgb::new(0x2e, 0xcc, 0x71),
                Rgb::new(0x9b, 0x59, 0xb6),
                Rgb::new(0xf3, 0x9c, 0x12),
                Rgb::new(0x1a, 0xbc, 0x9c),
            ],
        }
    }

    pub fn dark() -> Self {
        Self {
            name: ThemeName::Dark,
            background: Rgb::new(0x11, 0x18, 0x27),
            grid_major: Rgb::new(0x37, 0x41, 0x51),
            grid_minor: Rgb::new(0x1f, 0x29, 0x37),
            axis: Rgb::new(0xd1, 0xd5, 0xdb),
            text_primary: Rgb::new(0xf3, 0xf4, 0xf6),
            text_secondary: Rgb::new(0x9c, 0xa3, 0xaf),
            accent: Rgb::new(0x60, 0xa5, 0xfa),
            palette: [
                Rgb::new(0xff, 0x6b, 0x6b),
                Rgb::new(0x4d, 0xab, 0xf7),
                Rgb::new(0x51, 0xcf, 0x66),
                Rgb::new(0xcc, 0x5d, 0xe8),
                Rgb::new(0xfc, 0xc4, 0x19),
                Rgb::new(0x20, 0xc9, 0x97),
            ],
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Theme::light(),
            ThemeName::Dark => Theme::dark(),
        }
    }

    /// The palette colour for the `index`-th equation ever added.
    pub fn function_color(&self, index: usize) -> Rgb {
        self.palette[index % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c: Rgb = "#1aBC9c".parse().unwrap();
        assert_eq!(c, Rgb::new(0x1a, 0xbc, 0x9c));
        assert_eq!(c.to_string(), "#1abc9c");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#12345g".parse::<Rgb>().is_err());
    }

    #[test]
    fn palette_cycles() {
        let theme = Theme::light();
        assert_eq!(theme.function_color(0), theme.function_color(6));
        assert_ne!(theme.function_color(0), theme.function_color(1));
    }
}
