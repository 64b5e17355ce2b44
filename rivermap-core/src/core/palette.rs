//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Colourblind friendly colour schemes from MetBrewer

use crate::error::{Error, Result};
use std::fmt;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub fn new(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Result<Colour> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::config(format!("Invalid colour '{}'", hex)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::config(format!("Invalid colour '{}'", hex)))
        };
        Ok(Colour::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Ordered colour list. Index 0 is reserved for unmatched features.
#[derive(Clone, PartialEq, Debug)]
pub struct Palette {
    pub name: String,
    pub colours: Vec<Colour>,
}

static METBREWER: &[(&str, &[&str])] = &[
    ("Archambault", &["#88a0dc", "#381a61", "#7c4b73", "#ed968c", "#ab3329", "#e78429", "#f9d14a"]),
    ("Cassatt1", &["#b1615c", "#d88782", "#e3aba7", "#edd7d9", "#c9c9dd", "#9d9dc7", "#8282aa", "#5a5a83"]),
    ("Cassatt2", &["#2d223c", "#574571", "#90719f", "#b695bc", "#dec5da", "#c1d1aa", "#7fa074", "#466c4b", "#2c4b27", "#0e2810"]),
    ("Demuth", &["#591c19", "#9b332b", "#b64f32", "#d39a2d", "#f7c267", "#b9b9b8", "#8b8b99", "#5d6174", "#41485f", "#262d42"]),
    ("Derain", &["#efc86e", "#97c684", "#6f9969", "#aab5d5", "#808fe1", "#5c66a8", "#454a74"]),
    ("Egypt", &["#dd5129", "#0f7ba2", "#43b284", "#fab255"]),
    ("Greek", &["#3c0d03", "#8d1c06", "#e67424", "#ed9b49", "#f5c34d"]),
    ("Hiroshige", &["#e76254", "#ef8a47", "#f7aa58", "#ffd06f", "#ffe6b7", "#aadce0", "#72bcd5", "#528fad", "#376795", "#1e466e"]),
    ("Hokusai2", &["#abc9c8", "#72aeb6", "#4692b0", "#2f70a1", "#134b73", "#0a3351"]),
    ("Hokusai3", &["#d8d97a", "#95c36e", "#74c8c3", "#5a97c1", "#295384", "#0a2e57"]),
    ("Ingres", &["#041d2c", "#06314e", "#18527e", "#2e77ab", "#d1b252", "#a97f2f", "#7e5522", "#472c0b"]),
    ("Isfahan1", &["#4e3910", "#845d29", "#d8c29d", "#4fb6ca", "#178f92", "#175f5d", "#1d1f54"]),
    ("Isfahan2", &["#d7aca1", "#ddc000", "#79ad41", "#34b6c6", "#4063a3"]),
    ("Java", &["#663171", "#cf3a36", "#ea7428", "#e2998a", "#0c7156"]),
    ("Johnson", &["#a00e00", "#d04e00", "#f6c200", "#0086a8", "#132b69"]),
    ("Kandinsky", &["#3b7c70", "#ce9642", "#898e9f", "#3b3a3e"]),
    ("Morgenstern", &["#7c668c", "#b08ba5", "#dfbbc8", "#ffc680", "#ffb178", "#db8872", "#a56457"]),
    ("OKeeffe1", &["#6b200c", "#973d21", "#da6c42", "#ee956a", "#fbc2a9", "#f6f2ee", "#bad6f9", "#7db0ea", "#447fdd", "#225bb2", "#133e7e"]),
    ("OKeeffe2", &["#fbe3c2", "#f2c88f", "#ecb27d", "#e69c6b", "#d37750", "#b9563f", "#92351e"]),
    ("Pillement", &["#a9845b", "#697852", "#738e8e", "#44636f", "#2b4655", "#0f252f"]),
    ("Tam", &["#ffd353", "#ffb242", "#ef8737", "#de4f33", "#bb292c", "#9f2d55", "#62205f", "#341648"]),
    ("Troy", &["#421401", "#6c1d0e", "#8b3a2b", "#c27668", "#7ba0b4", "#44728c", "#235070", "#0a2d46"]),
    ("VanGogh3", &["#e7e5cc", "#c2d6a4", "#9cc184", "#669d62", "#447243", "#1f5b25", "#1e3d14", "#192813"]),
    ("Veronese", &["#67322e", "#99610a", "#c38f16", "#6e948c", "#2c6b67", "#175449", "#122c43"]),
];

/// Names of all schemes in the catalog
pub fn palette_names() -> Vec<&'static str> {
    METBREWER.iter().map(|(name, _)| *name).collect()
}

impl Palette {
    pub fn new(name: &str, colours: Vec<Colour>) -> Palette {
        Palette {
            name: name.to_string(),
            colours,
        }
    }

    /// Look up a colour scheme from the catalog
    pub fn by_name(name: &str) -> Result<Palette> {
        let (name, hexcodes) = METBREWER
            .iter()
            .find(|(scheme, _)| *scheme == name)
            .ok_or_else(|| {
                Error::config(format!(
                    "Unknown colour scheme '{}'. Available: {}",
                    name,
                    palette_names().join(", ")
                ))
            })?;
        let colours = hexcodes
            .iter()
            .map(|hex| Colour::from_hex(hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Palette::new(name, colours))
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Colour for features without a matching basin
    pub fn fallback(&self) -> Option<Colour> {
        self.colours.first().copied()
    }
}
