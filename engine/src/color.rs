//! RGBA color and the built-in palette

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GREY: Self = Self::rgb(125, 125, 125);
    pub const RED: Self = Self::rgb(240, 20, 30);
    pub const GREEN: Self = Self::rgb(30, 255, 20);
    pub const BLUE: Self = Self::rgb(100, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Look up a palette color by name, ignoring case
    pub fn named(name: &str) -> Option<Self> {
        PALETTE
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    /// Random color. Fully opaque unless `random_alpha` is set.
    pub fn random(random_alpha: bool) -> Self {
        Self::random_with(&mut rand::thread_rng(), random_alpha)
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, random_alpha: bool) -> Self {
        let [r, g, b] = rng.gen::<[u8; 3]>();
        let a = if random_alpha { rng.gen() } else { 255 };
        Self::new(r, g, b, a)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Named colors, in declaration order
pub const PALETTE: [(&str, Color); 7] = [
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("grey", Color::GREY),
    ("red", Color::RED),
    ("green", Color::GREEN),
    ("blue", Color::BLUE),
    ("yellow", Color::YELLOW),
];
