//! Tile and sprite catalog loading.
//!
//! The catalog is a line-oriented text file, one record per line:
//!
//! ```text
//! kind name x y w h
//! ```
//!
//! where `kind` is one of `terrain`, `terrainA` (tall terrain),
//! `character`, `enemy` or `enemyw` (an enemy sheet without a run strip)
//! and the rectangle is the record's base cell in atlas pixels.
//! Unrecognized kinds and malformed lines are skipped, not errors; the
//! catalog format grows by adding kinds old builds ignore.

use std::path::Path;
use std::sync::Arc;

use tf_core::animation::{AtlasRect, Capabilities};

use crate::tiles::{TileDefinition, TileSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Terrain,
    TerrainTall,
    Character,
    Enemy,
    EnemyStatic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub kind: CatalogKind,
    pub name: String,
    pub rect: AtlasRect,
}

/// An animated sprite sheet from the catalog: its base cell plus which
/// strips the sheet actually contains.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDefinition {
    pub name: String,
    pub rect: AtlasRect,
    pub caps: Capabilities,
}

/// The loaded catalog, grouped by role. Groups are validated non-empty
/// and duplicate-free, which is what lets selection indices stay in
/// bounds by construction.
#[derive(Debug)]
pub struct Catalog {
    pub tiles: Vec<Arc<TileDefinition>>,
    pub characters: Vec<SheetDefinition>,
    pub enemies: Vec<SheetDefinition>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read catalog {}: {e}", path.display()))?;
        Self::from_entries(parse_catalog(&raw))
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, String> {
        let mut tiles = Vec::new();
        let mut characters = Vec::new();
        let mut enemies = Vec::new();

        for entry in entries {
            match entry.kind {
                CatalogKind::Terrain => tiles.push(Arc::new(TileDefinition::new(
                    entry.name,
                    entry.rect,
                    TileSpan::Single,
                ))),
                CatalogKind::TerrainTall => tiles.push(Arc::new(TileDefinition::new(
                    entry.name,
                    entry.rect,
                    TileSpan::Double,
                ))),
                CatalogKind::Character => characters.push(SheetDefinition {
                    name: entry.name,
                    rect: entry.rect,
                    caps: Capabilities::FULL,
                }),
                CatalogKind::Enemy => enemies.push(SheetDefinition {
                    name: entry.name,
                    rect: entry.rect,
                    caps: Capabilities::RUN_ONLY,
                }),
                CatalogKind::EnemyStatic => enemies.push(SheetDefinition {
                    name: entry.name,
                    rect: entry.rect,
                    caps: Capabilities::STATIC,
                }),
            }
        }

        reject_duplicates("tile", tiles.iter().map(|t| t.name.as_str()))?;
        reject_duplicates("character", characters.iter().map(|c| c.name.as_str()))?;
        reject_duplicates("enemy", enemies.iter().map(|e| e.name.as_str()))?;

        if tiles.is_empty() {
            return Err("Catalog validation failed: no terrain entries".to_string());
        }
        if characters.is_empty() {
            return Err("Catalog validation failed: no character entries".to_string());
        }
        if enemies.is_empty() {
            return Err("Catalog validation failed: no enemy entries".to_string());
        }

        Ok(Self {
            tiles,
            characters,
            enemies,
        })
    }
}

fn reject_duplicates<'a>(
    group: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(format!(
                "Catalog validation failed: duplicate {group} name '{name}'"
            ));
        }
    }
    Ok(())
}

/// Parse catalog text into entries. Pure so the record format is testable
/// without touching the filesystem.
pub fn parse_catalog(text: &str) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(kind_token) = tokens.next() else {
            continue;
        };
        let kind = match kind_token {
            "terrain" => CatalogKind::Terrain,
            "terrainA" => CatalogKind::TerrainTall,
            "character" => CatalogKind::Character,
            "enemy" => CatalogKind::Enemy,
            "enemyw" => CatalogKind::EnemyStatic,
            other => {
                log::debug!("Skipping catalog line {}: unknown kind '{other}'", line_no + 1);
                continue;
            }
        };
        let Some(name) = tokens.next() else {
            log::debug!("Skipping catalog line {}: missing name", line_no + 1);
            continue;
        };
        let mut fields = [0.0f32; 4];
        let mut ok = true;
        for field in &mut fields {
            match tokens.next().and_then(|t| t.parse().ok()) {
                Some(value) => *field = value,
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if !ok {
            log::debug!("Skipping catalog line {}: malformed rectangle", line_no + 1);
            continue;
        }
        let [x, y, w, h] = fields;
        entries.push(CatalogEntry {
            kind,
            name: name.to_string(),
            rect: AtlasRect::new(x, y, w, h),
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tf_catalog_test_{}_{}_{}.list",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    const FULL_CATALOG: &str = "\
terrain floor 16 64 16 16
terrainA wall_tall 32 64 16 16
character knight 128 68 16 28
enemy imp 369 32 16 16
enemyw skull 432 80 16 16
";

    #[test]
    fn parse_reads_every_known_kind() {
        let entries = parse_catalog(FULL_CATALOG);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].kind, CatalogKind::Terrain);
        assert_eq!(entries[0].name, "floor");
        assert_eq!(entries[0].rect, AtlasRect::new(16.0, 64.0, 16.0, 16.0));
        assert_eq!(entries[1].kind, CatalogKind::TerrainTall);
        assert_eq!(entries[2].kind, CatalogKind::Character);
        assert_eq!(entries[3].kind, CatalogKind::Enemy);
        assert_eq!(entries[4].kind, CatalogKind::EnemyStatic);
    }

    #[test]
    fn parse_skips_unknown_kinds() {
        let entries = parse_catalog("decor vines 0 0 16 16\nterrain floor 16 64 16 16\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "floor");
    }

    #[test]
    fn parse_skips_malformed_lines() {
        let text = "terrain floor 16 64\nterrain\n\nterrain ok 0 0 16 16\nterrain bad 1 2 three 4\n";
        let entries = parse_catalog(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ok");
    }

    #[test]
    fn groups_by_kind_with_capabilities() {
        let catalog =
            Catalog::from_entries(parse_catalog(FULL_CATALOG)).expect("catalog should load");
        assert_eq!(catalog.tiles.len(), 2);
        assert_eq!(catalog.tiles[1].span, TileSpan::Double);
        assert_eq!(catalog.characters[0].caps, Capabilities::FULL);
        assert_eq!(catalog.enemies[0].caps, Capabilities::RUN_ONLY);
        assert_eq!(catalog.enemies[1].caps, Capabilities::STATIC);
    }

    #[test]
    fn duplicate_names_within_a_group_are_rejected() {
        let text = format!("{FULL_CATALOG}terrain floor 48 64 16 16\n");
        let err = Catalog::from_entries(parse_catalog(&text)).expect_err("duplicate should fail");
        assert!(err.contains("duplicate tile name 'floor'"));
    }

    #[test]
    fn same_name_across_groups_is_allowed() {
        let text = format!("{FULL_CATALOG}enemy floor 100 32 16 16\n");
        assert!(Catalog::from_entries(parse_catalog(&text)).is_ok());
    }

    #[test]
    fn empty_groups_are_rejected() {
        let err = Catalog::from_entries(parse_catalog("terrain floor 16 64 16 16\n"))
            .expect_err("missing groups should fail");
        assert!(err.contains("no character entries"));
    }

    #[test]
    fn load_reads_from_disk() {
        let path = temp_file_path("valid");
        std::fs::write(&path, FULL_CATALOG).expect("failed to write temp catalog");
        let catalog = Catalog::load(&path).expect("catalog should load");
        assert_eq!(catalog.tiles[0].name, "floor");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_reports_missing_file() {
        let path = temp_file_path("missing");
        let err = Catalog::load(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read catalog"));
    }
}
