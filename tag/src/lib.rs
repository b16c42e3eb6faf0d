//! Ordered binary tags for the mimic behavior engine.
//!
//! This crate builds the nested key-value compounds the target protocol uses
//! for block-entity payloads and block states, and encodes them in the
//! network little-endian varint tag format.
//!
//! # Design Principles
//!
//! - **Order is data** - Compounds keep insertion order and encode in that order.
//! - **Bounded decoding** - Every length and nesting level is checked against [`TagLimits`].
//! - **No domain knowledge** - This crate knows nothing about pistons or entities.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use tag::{decode_network, encode_network, Compound, TagLimits};
//!
//! let root = Compound::builder()
//!     .put_string("id", "PistonArm")
//!     .put_int_array("AttachedBlocks", vec![0, 65, 1])
//!     .put_float("Progress", 1.0)
//!     .build();
//!
//! let bytes = encode_network(&root).unwrap();
//! let decoded = decode_network(&bytes, &TagLimits::default()).unwrap();
//! assert_eq!(decoded, root);
//! ```

mod compound;
mod error;
mod limits;
mod reader;
mod value;
pub mod varint;
mod writer;

pub use compound::{Compound, CompoundBuilder};
pub use error::{LimitKind, TagError, TagResult};
pub use limits::TagLimits;
pub use reader::{decode_network, TagReader};
pub use value::{Tag, TagType};
pub use writer::{encode_network, TagWriter, MAX_STRING_LEN};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = TagLimits::default();
        let _ = TagWriter::new();
        let _ = Compound::builder();
        let _ = TagType::Compound;
        let _: TagResult<()> = Ok(());
    }

    #[test]
    fn nested_roundtrip() {
        let state = Compound::builder()
            .put_string("name", "minecraft:slime")
            .put_compound("states", Compound::new())
            .put_int("version", 17_959_425)
            .build();
        let root = Compound::builder()
            .put_string("id", "MovingBlock")
            .put_compound("movingBlock", state)
            .put_bool("isMovable", true)
            .put_long("time", -42)
            .put_short("s", -2)
            .put_double("d", 0.25)
            .build();
        let bytes = encode_network(&root).unwrap();
        let decoded = decode_network(&bytes, &TagLimits::default()).unwrap();
        assert_eq!(decoded, root);
        assert_eq!(decoded.to_string(), root.to_string());
    }
}
