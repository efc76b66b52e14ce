//! Held tools and how they change break speed.
//!
//! Tools are identified by free-form item names such as `"iron_pickaxe"` or
//! `"wooden_shovel"`. The family and material tier are recovered by substring match,
//! so any naming scheme that contains those words works.

/// The kind of block a tool is good at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToolFamily {
    Pickaxe,
    Axe,
    Shovel,
}

/// Tool material, ordered from weakest to strongest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolTier {
    Wood,
    Stone,
    Iron,
    Diamond,
}

impl ToolTier {
    /// How many times faster than baseline a matching tool of this tier breaks blocks.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            ToolTier::Wood => 3.0,
            ToolTier::Stone => 3.0,
            ToolTier::Iron => 5.0,
            ToolTier::Diamond => 8.0,
        }
    }
}

/// A parsed tool identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeldTool {
    pub family: ToolFamily,
    /// `None` for a tool whose name carries no recognised material.
    pub tier: Option<ToolTier>,
}

/// Speed multiplier of a matching tool with no recognised tier.
pub const MATCHING_TOOL_BASELINE: f64 = 3.0;

/// Factor applied to break time when a block that wants a tool is hit bare-handed.
pub const BARE_HAND_PENALTY: f64 = 1.5;

impl HeldTool {
    /// Parses a tool identifier.
    ///
    /// # Returns
    /// `None` if the identifier does not name a tool (e.g. `"apple"`), in which case
    /// the holder is treated as bare-handed.
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier = identifier.to_ascii_lowercase();

        // "pickaxe" contains "axe", so it has to be checked first.
        let family = if identifier.contains("pickaxe") {
            ToolFamily::Pickaxe
        } else if identifier.contains("axe") {
            ToolFamily::Axe
        } else if identifier.contains("shovel") || identifier.contains("spade") {
            ToolFamily::Shovel
        } else {
            return None;
        };

        let tier = if identifier.contains("diamond") {
            Some(ToolTier::Diamond)
        } else if identifier.contains("iron") {
            Some(ToolTier::Iron)
        } else if identifier.contains("stone") {
            Some(ToolTier::Stone)
        } else if identifier.contains("wood") {
            Some(ToolTier::Wood)
        } else {
            None
        };

        Some(HeldTool { family, tier })
    }
}

/// Computes the factor a block's base break time is multiplied by.
///
/// - matching tool: `1 / tier multiplier` (`1 / 3` when the tier is unknown)
/// - some other tool: `1`
/// - bare hand on a block that prefers a tool: `1.5`
/// - bare hand on a block with no preferred tool: `1`
pub fn break_time_factor(preferred: Option<ToolFamily>, held: Option<HeldTool>) -> f64 {
    match (preferred, held) {
        (Some(preferred), Some(tool)) if tool.family == preferred => {
            1.0 / tool
                .tier
                .map_or(MATCHING_TOOL_BASELINE, ToolTier::speed_multiplier)
        }
        (Some(_), None) => BARE_HAND_PENALTY,
        _ => 1.0,
    }
}
