//! Block identifiers and per-block definitions.

/// Source-protocol block state id.
///
/// Ids index into a [`BlockRegistry`](crate::BlockRegistry). Id `0` is
/// always air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BlockId(u32);

impl BlockId {
    /// The empty block.
    pub const AIR: Self = Self(0);

    /// Creates a new block id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for air.
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for BlockId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// How a block reacts to being pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PistonBehavior {
    #[default]
    Normal,
    Block,
    Destroy,
    PushOnly,
    Ignore,
}

/// Sticky block families. Blocks of the same family stick together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickyKind {
    Slime,
    Honey,
}

/// Piston state carried by piston base blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PistonState {
    pub sticky: bool,
    pub extended: bool,
}

/// A value in a target block-state compound.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StateValue {
    Bool(bool),
    Int(i32),
    String(String),
}

/// Everything the engine needs to know about one block state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockDef {
    /// Source-protocol identifier, such as `minecraft:slime_block`.
    pub identifier: String,
    /// Target-protocol block name.
    pub bedrock_identifier: String,
    /// Target-protocol block states, in encoding order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bedrock_states: Vec<(String, StateValue)>,
    /// Target-protocol runtime id.
    pub runtime_id: u32,
    /// Hardness; `-1` marks unbreakable blocks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardness: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub piston_behavior: PistonBehavior,
    /// Block entity kind, such as `Chest`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub block_entity: Option<String>,
    /// Present on piston base blocks.
    #[cfg_attr(feature = "serde", serde(default))]
    pub piston: Option<PistonState>,
}

impl BlockDef {
    /// Creates a plain movable block.
    #[must_use]
    pub fn new(identifier: &str, runtime_id: u32) -> Self {
        Self {
            identifier: identifier.to_owned(),
            bedrock_identifier: identifier.to_owned(),
            bedrock_states: Vec::new(),
            runtime_id,
            hardness: 1.0,
            piston_behavior: PistonBehavior::Normal,
            block_entity: None,
            piston: None,
        }
    }

    #[must_use]
    pub fn hardness(mut self, hardness: f32) -> Self {
        self.hardness = hardness;
        self
    }

    #[must_use]
    pub const fn behavior(mut self, behavior: PistonBehavior) -> Self {
        self.piston_behavior = behavior;
        self
    }

    #[must_use]
    pub fn block_entity(mut self, kind: &str) -> Self {
        self.block_entity = Some(kind.to_owned());
        self
    }

    #[must_use]
    pub const fn piston(mut self, sticky: bool, extended: bool) -> Self {
        self.piston = Some(PistonState { sticky, extended });
        self
    }

    #[must_use]
    pub fn bedrock(mut self, identifier: &str, states: Vec<(String, StateValue)>) -> Self {
        self.bedrock_identifier = identifier.to_owned();
        self.bedrock_states = states;
        self
    }

    /// Returns the sticky family of this block, if any.
    #[must_use]
    pub fn sticky_kind(&self) -> Option<StickyKind> {
        match self.identifier.as_str() {
            "minecraft:slime_block" => Some(StickyKind::Slime),
            "minecraft:honey_block" => Some(StickyKind::Honey),
            _ => None,
        }
    }

    /// Returns `true` for piston head blocks.
    #[must_use]
    pub fn is_piston_head(&self) -> bool {
        self.identifier.contains("piston_head")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_air() {
        assert!(BlockId::AIR.is_air());
        assert!(!BlockId::new(3).is_air());
        assert_eq!(BlockId::from(7).raw(), 7);
    }

    #[test]
    fn sticky_kind_by_identifier() {
        assert_eq!(
            BlockDef::new("minecraft:slime_block", 1).sticky_kind(),
            Some(StickyKind::Slime)
        );
        assert_eq!(
            BlockDef::new("minecraft:honey_block", 2).sticky_kind(),
            Some(StickyKind::Honey)
        );
        assert_eq!(BlockDef::new("minecraft:stone", 3).sticky_kind(), None);
    }

    #[test]
    fn piston_head_detection() {
        assert!(BlockDef::new("minecraft:piston_head[facing=up]", 1).is_piston_head());
        assert!(!BlockDef::new("minecraft:piston", 1).is_piston_head());
    }

    #[test]
    fn builder_sets_fields() {
        let def = BlockDef::new("minecraft:chest", 9)
            .hardness(2.5)
            .block_entity("Chest");
        assert_eq!(def.hardness, 2.5);
        assert_eq!(def.block_entity.as_deref(), Some("Chest"));
        assert_eq!(def.piston_behavior, PistonBehavior::Normal);
    }
}
