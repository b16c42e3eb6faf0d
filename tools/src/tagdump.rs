//! Network tag decoding for inspection.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use tag::{decode_network, Compound, Tag, TagLimits};

/// Decodes a network-format root compound.
pub fn decode_tag(bytes: &[u8], limits: &TagLimits) -> Result<Compound> {
    decode_network(bytes, limits).context("decode network tag")
}

/// Formats a compound depth-first, one entry per line, children indented
/// under their parent.
pub fn format_tag_pretty(root: &Compound) -> String {
    let mut out = String::new();
    out.push_str("compound\n");
    write_compound(&mut out, root, 1);
    out
}

fn write_compound(out: &mut String, compound: &Compound, depth: usize) {
    let indent = "  ".repeat(depth);
    for (key, value) in compound.iter() {
        let _ = match value {
            Tag::Compound(child) => {
                writeln!(out, "{indent}{key}: compound ({} entries)", child.len())
            }
            Tag::IntArray(values) => {
                writeln!(out, "{indent}{key}: int[{}] {values:?}", values.len())
            }
            Tag::String(value) => writeln!(out, "{indent}{key}: string {value:?}"),
            Tag::Byte(v) => writeln!(out, "{indent}{key}: byte {v}"),
            Tag::Short(v) => writeln!(out, "{indent}{key}: short {v}"),
            Tag::Int(v) => writeln!(out, "{indent}{key}: int {v}"),
            Tag::Long(v) => writeln!(out, "{indent}{key}: long {v}"),
            Tag::Float(v) => writeln!(out, "{indent}{key}: float {v}"),
            Tag::Double(v) => writeln!(out, "{indent}{key}: double {v}"),
        };
        if let Tag::Compound(child) = value {
            write_compound(out, child, depth + 1);
        }
    }
}

/// A tag file picked up from a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists the files in `dir` whose path or file name matches `glob`, sorted
/// by path.
pub fn collect_tag_files(dir: &Path, glob: Option<&str>) -> Result<Vec<TagFile>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        files.push(TagFile { path, size });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag::encode_network;

    fn moving_block() -> Compound {
        Compound::builder()
            .put_string("id", "MovingBlock")
            .put_compound(
                "movingBlock",
                Compound::builder()
                    .put_string("name", "minecraft:stone")
                    .put_compound("states", Compound::new())
                    .put_int("version", 17_959_425)
                    .build(),
            )
            .put_int_array("AttachedBlocks", vec![1, 2, 3])
            .put_bool("isMovable", true)
            .build()
    }

    #[test]
    fn decodes_encoded_tag() {
        let root = moving_block();
        let bytes = encode_network(&root).unwrap();
        assert_eq!(decode_tag(&bytes, &TagLimits::default()).unwrap(), root);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let bytes = encode_network(&moving_block()).unwrap();
        assert!(decode_tag(&bytes[..bytes.len() / 2], &TagLimits::default()).is_err());
    }

    #[test]
    fn pretty_output_is_depth_first() {
        let out = format_tag_pretty(&moving_block());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "compound",
                "  id: string \"MovingBlock\"",
                "  movingBlock: compound (3 entries)",
                "    name: string \"minecraft:stone\"",
                "    states: compound (0 entries)",
                "    version: int 17959425",
                "  AttachedBlocks: int[3] [1, 2, 3]",
                "  isMovable: byte 1",
            ]
        );
    }

    #[test]
    fn glob_filters_by_name() {
        let dir = std::env::temp_dir().join(format!("mimic-tagdump-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.tag"), b"x").unwrap();
        fs::write(dir.join("b.bin"), b"yy").unwrap();

        let files = collect_tag_files(&dir, Some("*.tag")).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("a.tag"));
        assert_eq!(files[0].size, 1);
        assert_eq!(collect_tag_files(&dir, None).unwrap().len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }
}
