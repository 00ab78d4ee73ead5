use crate::shape::Tag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_u8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    /// Nearest colour in the 6x6x6 cube of the xterm 256-colour palette.
    pub fn ansi256(self) -> u8 {
        let level = |v: f32| (v.clamp(0.0, 1.0) * 5.0).round() as u8;
        16 + 36 * level(self.r) + 6 * level(self.g) + level(self.b)
    }
}

/// Colour per tag, indexed by tag value. Tag `0` is the empty colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colours: Vec<Rgb>,
}

impl Default for Palette {
    /// Colours of the physical puzzle pieces.
    fn default() -> Self {
        Self {
            colours: vec![
                Rgb::new(0.0, 0.0, 0.0), // empty
                Rgb::new(0.4, 0.7, 1.0), // blue
                Rgb::new(1.0, 1.0, 0.5), // yellow
                Rgb::new(1.0, 0.6, 0.2), // orange
                Rgb::new(0.5, 1.0, 1.0), // cyan
                Rgb::new(0.6, 1.0, 0.5), // green
                Rgb::new(1.0, 0.3, 0.5), // red
            ],
        }
    }
}

impl Palette {
    pub fn new(colours: Vec<Rgb>) -> Self {
        Self { colours }
    }

    pub fn colour(&self, tag: Tag) -> Option<Rgb> {
        self.colours.get(tag as usize).copied()
    }

    /// Highest tag with a colour.
    pub fn max_tag(&self) -> Tag {
        self.colours.len().saturating_sub(1).min(Tag::MAX as usize) as Tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_covers_six_tags() {
        let palette = Palette::default();
        assert_eq!(palette.max_tag(), 6);
        assert_eq!(palette.colour(0), Some(Rgb::new(0.0, 0.0, 0.0)));
        assert_eq!(palette.colour(6), Some(Rgb::new(1.0, 0.3, 0.5)));
        assert_eq!(palette.colour(7), None);
    }

    #[test]
    fn test_colour_conversions() {
        let orange = Rgb::new(1.0, 0.6, 0.2);
        assert_eq!(orange.to_u8(), (255, 153, 51));
        assert_eq!(orange.ansi256(), 16 + 36 * 5 + 6 * 3 + 1);
        assert_eq!(Rgb::new(0.0, 0.0, 0.0).ansi256(), 16);
        assert_eq!(Rgb::new(1.0, 1.0, 1.0).ansi256(), 231);
    }
}
