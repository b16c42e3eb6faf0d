//! Block registry: source block ids to target runtime ids and properties.

use std::collections::{HashMap, HashSet};

use tag::{Compound, Tag};

use crate::block::{BlockDef, BlockId, PistonBehavior, StateValue};
use crate::error::{WorldError, WorldResult};

/// Block-state compound version stamped into every `movingBlock` tag.
pub const BLOCK_STATE_VERSION: i32 = 17_959_425;

const AIR_IDENTIFIER: &str = "minecraft:air";

/// Serializable block table a [`BlockRegistry`] is built from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockTable {
    /// Blocks indexed by [`BlockId`]; entry 0 must be air.
    pub blocks: Vec<BlockDef>,
    /// Target runtime id of the moving-block placeholder.
    pub moving_block_runtime_id: u32,
}

/// Lookup table for block properties.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<BlockDef>,
    by_identifier: HashMap<String, BlockId>,
    moving_block_runtime_id: u32,
}

impl BlockRegistry {
    /// Creates a registry from a table after validation.
    pub fn new(table: BlockTable) -> WorldResult<Self> {
        validate(&table)?;
        Ok(Self::from_table(table))
    }

    fn from_table(table: BlockTable) -> Self {
        let by_identifier = table
            .blocks
            .iter()
            .enumerate()
            .map(|(idx, def)| (def.identifier.clone(), BlockId::new(idx as u32)))
            .collect();
        Self {
            blocks: table.blocks,
            by_identifier,
            moving_block_runtime_id: table.moving_block_runtime_id,
        }
    }

    /// A small built-in table covering every piston rule.
    #[must_use]
    pub fn vanilla_subset() -> Self {
        Self::from_table(vanilla_table())
    }

    /// Returns the number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the definition for `id`.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.raw() as usize)
    }

    /// Looks up a block id by source identifier.
    #[must_use]
    pub fn id_of(&self, identifier: &str) -> Option<BlockId> {
        self.by_identifier.get(identifier).copied()
    }

    /// Returns the target runtime id for `id`.
    #[must_use]
    pub fn runtime_id(&self, id: BlockId) -> Option<u32> {
        self.get(id).map(|def| def.runtime_id)
    }

    /// Target runtime id of air.
    #[must_use]
    pub fn air_runtime_id(&self) -> u32 {
        self.runtime_id(BlockId::AIR).unwrap_or_default()
    }

    /// Target runtime id of the moving-block placeholder.
    #[must_use]
    pub const fn moving_block_runtime_id(&self) -> u32 {
        self.moving_block_runtime_id
    }

    /// Builds the target block-state compound (`name`, `states`, `version`).
    #[must_use]
    pub fn block_state_tag(&self, id: BlockId) -> Option<Compound> {
        let def = self.get(id)?;
        let states: Compound = def
            .bedrock_states
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    StateValue::Bool(v) => Tag::from(*v),
                    StateValue::Int(v) => Tag::Int(*v),
                    StateValue::String(v) => Tag::String(v.clone()),
                };
                (key.as_str(), value)
            })
            .collect();
        Some(
            Compound::builder()
                .put_string("name", def.bedrock_identifier.as_str())
                .put_compound("states", states)
                .put_int("version", BLOCK_STATE_VERSION)
                .build(),
        )
    }

    /// Iterates `(id, definition)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockDef)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(idx, def)| (BlockId::new(idx as u32), def))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::vanilla_subset()
    }
}

fn validate(table: &BlockTable) -> WorldResult<()> {
    let first = table.blocks.first().ok_or(WorldError::EmptyTable)?;
    if first.identifier != AIR_IDENTIFIER {
        return Err(WorldError::AirNotFirst {
            found: first.identifier.clone(),
        });
    }
    let mut seen = HashSet::new();
    for def in &table.blocks {
        if !seen.insert(def.identifier.as_str()) {
            return Err(WorldError::DuplicateIdentifier {
                identifier: def.identifier.clone(),
            });
        }
        if def.hardness < 0.0 && def.hardness != -1.0 {
            return Err(WorldError::InvalidHardness {
                identifier: def.identifier.clone(),
            });
        }
    }
    Ok(())
}

fn state(key: &str, value: StateValue) -> (String, StateValue) {
    (key.to_owned(), value)
}

fn vanilla_table() -> BlockTable {
    use StateValue::{Bool, Int, String as Str};

    let blocks = vec![
        BlockDef::new(AIR_IDENTIFIER, 134).hardness(0.0),
        BlockDef::new("minecraft:stone", 1)
            .hardness(1.5)
            .bedrock("minecraft:stone", vec![state("stone_type", Str("stone".to_owned()))]),
        BlockDef::new("minecraft:oak_planks", 2)
            .hardness(2.0)
            .bedrock("minecraft:planks", vec![state("wood_type", Str("oak".to_owned()))]),
        BlockDef::new("minecraft:sand", 3)
            .hardness(0.5)
            .bedrock("minecraft:sand", vec![state("sand_type", Str("normal".to_owned()))]),
        BlockDef::new("minecraft:obsidian", 4)
            .hardness(50.0)
            .behavior(PistonBehavior::Block),
        BlockDef::new("minecraft:bedrock", 5)
            .hardness(-1.0)
            .bedrock("minecraft:bedrock", vec![state("infiniburn_bit", Bool(false))]),
        BlockDef::new("minecraft:slime_block", 6)
            .hardness(0.0)
            .bedrock("minecraft:slime", Vec::new()),
        BlockDef::new("minecraft:honey_block", 7).hardness(0.0),
        BlockDef::new("minecraft:torch", 8)
            .hardness(0.0)
            .behavior(PistonBehavior::Destroy)
            .bedrock(
                "minecraft:torch",
                vec![state("torch_facing_direction", Str("top".to_owned()))],
            ),
        BlockDef::new("minecraft:magenta_glazed_terracotta", 9)
            .hardness(1.4)
            .behavior(PistonBehavior::PushOnly)
            .bedrock(
                "minecraft:magenta_glazed_terracotta",
                vec![state("facing_direction", Int(2))],
            ),
        BlockDef::new("minecraft:chest", 10)
            .hardness(2.5)
            .block_entity("Chest")
            .bedrock("minecraft:chest", vec![state("facing_direction", Int(2))]),
        BlockDef::new("minecraft:piston[extended=false]", 11)
            .hardness(1.5)
            .piston(false, false)
            .bedrock("minecraft:piston", vec![state("facing_direction", Int(1))]),
        BlockDef::new("minecraft:piston[extended=true]", 11)
            .hardness(1.5)
            .piston(false, true)
            .bedrock("minecraft:piston", vec![state("facing_direction", Int(1))]),
        BlockDef::new("minecraft:sticky_piston[extended=false]", 12)
            .hardness(1.5)
            .piston(true, false)
            .bedrock("minecraft:sticky_piston", vec![state("facing_direction", Int(1))]),
        BlockDef::new("minecraft:sticky_piston[extended=true]", 12)
            .hardness(1.5)
            .piston(true, true)
            .bedrock("minecraft:sticky_piston", vec![state("facing_direction", Int(1))]),
        BlockDef::new("minecraft:piston_head[type=normal]", 13)
            .hardness(1.5)
            .behavior(PistonBehavior::Block)
            .bedrock(
                "minecraft:piston_arm_collision",
                vec![state("facing_direction", Int(1))],
            ),
        BlockDef::new("minecraft:piston_head[type=sticky]", 14)
            .hardness(1.5)
            .behavior(PistonBehavior::Block)
            .bedrock(
                "minecraft:sticky_piston_arm_collision",
                vec![state("facing_direction", Int(1))],
            ),
        BlockDef::new("minecraft:moving_piston", 15)
            .hardness(-1.0)
            .behavior(PistonBehavior::Block)
            .bedrock("minecraft:moving_block", Vec::new()),
    ];
    BlockTable {
        blocks,
        moving_block_runtime_id: 15,
    }
}
