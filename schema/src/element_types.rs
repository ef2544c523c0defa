use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ElementType {
    Neutral,
    Brawler,
    Sky,
    Toxin,
    Terra,
    Stone,
    Swarm,
    Phantom,
    Alloy,
    Flame,
    Tide,
    Flora,
    Volt,
    Mind,
    Frost,
    Wyrm,
    Shade,
    Charm,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// All 18 element types, in chart order.
pub const ALL_ELEMENT_TYPES: [ElementType; 18] = [
    ElementType::Neutral,
    ElementType::Brawler,
    ElementType::Sky,
    ElementType::Toxin,
    ElementType::Terra,
    ElementType::Stone,
    ElementType::Swarm,
    ElementType::Phantom,
    ElementType::Alloy,
    ElementType::Flame,
    ElementType::Tide,
    ElementType::Flora,
    ElementType::Volt,
    ElementType::Mind,
    ElementType::Frost,
    ElementType::Wyrm,
    ElementType::Shade,
    ElementType::Charm,
];

impl ElementType {
    /// Calculate type effectiveness multiplier for attacking type vs defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
        use ElementType::*;

        match (attacking, defending) {
            // Neutral
            (Neutral, Phantom) => 0.0,
            (Neutral, Stone) | (Neutral, Alloy) => 0.5,
            (Neutral, _) => 1.0,

            // Brawler
            (Brawler, Phantom) => 0.0,
            (Brawler, Toxin) | (Brawler, Sky) | (Brawler, Mind) | (Brawler, Swarm)
            | (Brawler, Charm) => 0.5,
            (Brawler, Neutral) | (Brawler, Frost) | (Brawler, Stone) | (Brawler, Shade)
            | (Brawler, Alloy) => 2.0,
            (Brawler, _) => 1.0,

            // Sky
            (Sky, Volt) | (Sky, Stone) | (Sky, Alloy) => 0.5,
            (Sky, Flora) | (Sky, Brawler) | (Sky, Swarm) => 2.0,
            (Sky, _) => 1.0,

            // Toxin
            (Toxin, Alloy) => 0.0,
            (Toxin, Toxin) | (Toxin, Terra) | (Toxin, Stone) | (Toxin, Phantom) => 0.5,
            (Toxin, Flora) | (Toxin, Charm) => 2.0,
            (Toxin, _) => 1.0,

            // Terra
            (Terra, Sky) => 0.0,
            (Terra, Flora) | (Terra, Swarm) => 0.5,
            (Terra, Flame) | (Terra, Volt) | (Terra, Toxin) | (Terra, Stone)
            | (Terra, Alloy) => 2.0,
            (Terra, _) => 1.0,

            // Stone
            (Stone, Brawler) | (Stone, Terra) | (Stone, Alloy) => 0.5,
            (Stone, Flame) | (Stone, Frost) | (Stone, Sky) | (Stone, Swarm) => 2.0,
            (Stone, _) => 1.0,

            // Swarm
            (Swarm, Flame) | (Swarm, Brawler) | (Swarm, Toxin) | (Swarm, Sky)
            | (Swarm, Phantom) | (Swarm, Alloy) | (Swarm, Charm) => 0.5,
            (Swarm, Flora) | (Swarm, Mind) | (Swarm, Shade) => 2.0,
            (Swarm, _) => 1.0,

            // Phantom
            (Phantom, Neutral) => 0.0,
            (Phantom, Shade) => 0.5,
            (Phantom, Phantom) | (Phantom, Mind) => 2.0,
            (Phantom, _) => 1.0,

            // Alloy
            (Alloy, Flame) | (Alloy, Tide) | (Alloy, Volt) | (Alloy, Alloy) => 0.5,
            (Alloy, Frost) | (Alloy, Stone) | (Alloy, Charm) => 2.0,
            (Alloy, _) => 1.0,

            // Flame
            (Flame, Flame) | (Flame, Tide) | (Flame, Stone) | (Flame, Wyrm) => 0.5,
            (Flame, Flora) | (Flame, Frost) | (Flame, Swarm) | (Flame, Alloy) => 2.0,
            (Flame, _) => 1.0,

            // Tide
            (Tide, Tide) | (Tide, Flora) | (Tide, Wyrm) => 0.5,
            (Tide, Flame) | (Tide, Terra) | (Tide, Stone) => 2.0,
            (Tide, _) => 1.0,

            // Flora
            (Flora, Flame)
            | (Flora, Flora)
            | (Flora, Toxin)
            | (Flora, Sky)
            | (Flora, Swarm)
            | (Flora, Wyrm)
            | (Flora, Alloy) => 0.5,
            (Flora, Tide) | (Flora, Terra) | (Flora, Stone) => 2.0,
            (Flora, _) => 1.0,

            // Volt
            (Volt, Terra) => 0.0,
            (Volt, Volt) | (Volt, Flora) | (Volt, Wyrm) => 0.5,
            (Volt, Tide) | (Volt, Sky) => 2.0,
            (Volt, _) => 1.0,

            // Mind
            (Mind, Shade) => 0.0,
            (Mind, Mind) | (Mind, Alloy) => 0.5,
            (Mind, Brawler) | (Mind, Toxin) => 2.0,
            (Mind, _) => 1.0,

            // Frost
            (Frost, Flame) | (Frost, Tide) | (Frost, Frost) | (Frost, Alloy) => 0.5,
            (Frost, Flora) | (Frost, Terra) | (Frost, Sky) | (Frost, Wyrm) => 2.0,
            (Frost, _) => 1.0,

            // Wyrm
            (Wyrm, Charm) => 0.0,
            (Wyrm, Alloy) => 0.5,
            (Wyrm, Wyrm) => 2.0,
            (Wyrm, _) => 1.0,

            // Shade
            (Shade, Brawler) | (Shade, Shade) | (Shade, Charm) => 0.5,
            (Shade, Mind) | (Shade, Phantom) => 2.0,
            (Shade, _) => 1.0,

            // Charm
            (Charm, Flame) | (Charm, Toxin) | (Charm, Alloy) => 0.5,
            (Charm, Brawler) | (Charm, Wyrm) | (Charm, Shade) => 2.0,
            (Charm, _) => 1.0,
        }
    }

    pub fn is_immune(attacking: ElementType, defending: ElementType) -> bool {
        Self::effectiveness(attacking, defending) == 0.0
    }

    /// Parse an element type from its lowercase wire name.
    pub fn from_name(name: &str) -> Option<ElementType> {
        let lowered = name.to_ascii_lowercase();
        ALL_ELEMENT_TYPES
            .iter()
            .copied()
            .find(|t| format!("{:?}", t).to_ascii_lowercase() == lowered)
    }
}

/// Free-function form of the chart lookup for callers that do not want
/// to spell out the type path.
pub fn effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
    ElementType::effectiveness(attacking, defending)
}

/// Effectiveness lookup over wire names. Unknown names are treated as
/// neutral (1.0) rather than erroring, so stale stored profiles never
/// poison a battle.
pub fn effectiveness_by_name(attacking: &str, defending: &str) -> f64 {
    match (
        ElementType::from_name(attacking),
        ElementType::from_name(defending),
    ) {
        (Some(a), Some(d)) => ElementType::effectiveness(a, d),
        _ => 1.0,
    }
}
