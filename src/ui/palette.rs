//! Agent color assignment.
//!
//! By default an agent's color follows its position in the per-agent stats
//! list, so the stats table and the chart agree. The hashed mode derives the
//! color from the agent id instead, which keeps colors fixed when the
//! backend reorders agents.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Series palette; assignment wraps after eight agents.
pub const AGENT_COLORS: [Color; 8] = [
    Color::Rgb(0x3b, 0x82, 0xf6), // blue
    Color::Rgb(0x10, 0xb9, 0x81), // emerald
    Color::Rgb(0xf5, 0x9e, 0x0b), // amber
    Color::Rgb(0x8b, 0x5c, 0xf6), // violet
    Color::Rgb(0xec, 0x48, 0x99), // pink
    Color::Rgb(0x06, 0xb6, 0xd4), // cyan
    Color::Rgb(0xf9, 0x73, 0x16), // orange
    Color::Rgb(0x14, 0xb8, 0xa6), // teal
];

/// How agents are mapped onto [`AGENT_COLORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Index in the stats list, modulo the palette size.
    #[default]
    Positional,
    /// FNV-1a hash of the agent id, modulo the palette size.
    Hashed,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Positional => f.write_str("positional"),
            ColorMode::Hashed => f.write_str("hashed"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" | "index" => Ok(ColorMode::Positional),
            "hashed" | "hash" => Ok(ColorMode::Hashed),
            other => Err(format!(
                "unknown color mode '{}', expected 'positional' or 'hashed'",
                other
            )),
        }
    }
}

/// 32-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

pub fn color_for_position(index: usize) -> Color {
    AGENT_COLORS[index % AGENT_COLORS.len()]
}

pub fn color_for_hash(agent_id: &str) -> Color {
    AGENT_COLORS[fnv1a(agent_id.as_bytes()) as usize % AGENT_COLORS.len()]
}

/// Color of `agent_id` given the ids of the stats list in order.
///
/// Agents missing from the list (e.g. only present in history) fall back to
/// the hashed color.
pub fn color_for_agent<'a, I>(agent_id: &str, ordered_ids: I, mode: ColorMode) -> Color
where
    I: IntoIterator<Item = &'a str>,
{
    match mode {
        ColorMode::Hashed => color_for_hash(agent_id),
        ColorMode::Positional => ordered_ids
            .into_iter()
            .position(|id| id == agent_id)
            .map_or_else(|| color_for_hash(agent_id), color_for_position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_wraps() {
        assert_eq!(color_for_position(0), AGENT_COLORS[0]);
        assert_eq!(color_for_position(7), AGENT_COLORS[7]);
        assert_eq!(color_for_position(8), AGENT_COLORS[0]);
        assert_eq!(color_for_position(9), color_for_position(1));
    }

    #[test]
    fn test_first_agent_is_blue() {
        let ids = ["a1", "a2"];
        assert_eq!(
            color_for_agent("a1", ids, ColorMode::Positional),
            Color::Rgb(0x3b, 0x82, 0xf6)
        );
        assert_eq!(
            color_for_agent("a2", ids, ColorMode::Positional),
            Color::Rgb(0x10, 0xb9, 0x81)
        );
    }

    #[test]
    fn test_hashed_stable_under_reordering() {
        let forward = ["a1", "a2", "a3"];
        let reversed = ["a3", "a2", "a1"];
        for id in forward {
            assert_eq!(
                color_for_agent(id, forward, ColorMode::Hashed),
                color_for_agent(id, reversed, ColorMode::Hashed)
            );
        }
    }

    #[test]
    fn test_missing_agent_falls_back_to_hash() {
        assert_eq!(
            color_for_agent("ghost", ["a1"], ColorMode::Positional),
            color_for_hash("ghost")
        );
    }

    #[test]
    fn test_fnv1a_known_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!("hashed".parse::<ColorMode>(), Ok(ColorMode::Hashed));
        assert_eq!(" Positional ".parse::<ColorMode>(), Ok(ColorMode::Positional));
        assert!("rainbow".parse::<ColorMode>().is_err());
        assert_eq!(ColorMode::Hashed.to_string(), "hashed");
    }
}
