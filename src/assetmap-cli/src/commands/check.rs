//! Check command handler
//!
//! Parses an asset map without running anything.

use anyhow::{Context, Result};
use assetmap::{AssetMap, Directive};
use std::fmt::Write;
use std::path::Path;

/// Handle the check command
pub fn handle(map_path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(map_path)
        .with_context(|| format!("Failed to read asset map {}", map_path.display()))?;
    let map = assetmap::parse_map(&text)
        .with_context(|| format!("Invalid asset map {}", map_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        print!("{}", describe(&map));
    }

    Ok(())
}

/// Human-readable outline of a parsed map
pub fn describe(map: &AssetMap) -> String {
    let mut out = String::new();

    for block in &map.blocks {
        let _ = writeln!(out, "{} -> {}", block.origin, block.destination);
        for directive in &block.directives {
            match directive {
                Directive::Shape(entries) => {
                    for entry in entries {
                        let _ = write!(
                            out,
                            "  shape {} => {}.png",
                            entry.internal_name, entry.output_name
                        );
                        if !entry.scale.is_identity() {
                            let _ = write!(out, " (x{}, y{})", entry.scale.x, entry.scale.y);
                        }
                        out.push('\n');
                    }
                }
                Directive::Font(entries) => {
                    for entry in entries {
                        let _ = writeln!(out, "  font {}", entry.index);
                    }
                }
            }
        }
    }

    let _ = writeln!(out, "{} mapping block(s)", map.blocks.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let map = assetmap::parse_map("a.swf -> out\nshape\nfoo = bar[2,0.5]\n7 = seven\nfont\n12\n")
            .unwrap();
        assert_eq!(
            describe(&map),
            "a.swf -> out\n  shape foo => bar.png (x2, y0.5)\n  shape 7 => seven.png\n  font 12\n1 mapping block(s)\n"
        );
    }

    #[test]
    fn test_handle_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assetmap.txt");
        std::fs::write(&path, "a.swf -> out\nsprite\n").unwrap();

        let err = handle(&path, false).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown directive 'sprite'"));
    }
}
