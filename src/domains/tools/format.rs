//! Text formatting shared by tool handlers.

use serde_json::Value;
use std::fmt::{Display, Write};

use crate::domains::minecraft::{Player, RegistryEntry, yaw_to_cardinal};

/// Default number of entries shown by list outputs.
pub const LIST_LIMIT: usize = 20;

/// `(x, y, z)` with one decimal place.
pub fn coordinate(x: f64, y: f64, z: f64) -> String {
    format!("({x:.1}, {y:.1}, {z:.1})")
}

/// `(x, y, z)` for block coordinates.
pub fn block_coordinate(x: impl Display, y: impl Display, z: impl Display) -> String {
    format!("({x}, {y}, {z})")
}

/// `from (x1, y1, z1) to (x2, y2, z2)`.
pub fn coordinate_range(from: (i64, i64, i64), to: (i64, i64, i64)) -> String {
    format!(
        "from {} to {}",
        block_coordinate(from.0, from.1, from.2),
        block_coordinate(to.0, to.1, to.2)
    )
}

/// One `- item` line per entry, capped at `limit` with an overflow line.
pub fn list_with_limit<T: Display>(items: &[T], limit: usize) -> String {
    let mut out = String::new();
    for item in items.iter().take(limit) {
        let _ = writeln!(out, "- {item}");
    }
    if items.len() > limit {
        let _ = writeln!(out, "... and {} more items", items.len() - limit);
    }
    out
}

/// Render a JSON scalar the way a person would write it.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

/// Field `key` of `payload` as text, or `fallback` when absent.
pub fn field_text(payload: &Value, key: &str, fallback: &str) -> String {
    match payload.get(key) {
        Some(Value::Null) | None => fallback.to_string(),
        Some(value) => value_text(value),
    }
}

impl Display for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} ({})", self.id, name),
            None => f.write_str(&self.id),
        }
    }
}

/// Multi-line description of one online player.
pub fn player_info(player: &Player) -> String {
    let pos = player.position;
    let rot = player.rotation;
    format!(
        "- **{}** (UUID: {})\n  Position: {}\n  Rotation: Yaw {:.1}°, Pitch {:.1}°\n  Facing: {}\n",
        player.name,
        player.uuid,
        coordinate(pos.x, pos.y, pos.z),
        rot.yaw,
        rot.pitch,
        yaw_to_cardinal(rot.yaw)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::minecraft::{Position, Rotation};
    use serde_json::json;

    #[test]
    fn test_coordinate_one_decimal() {
        assert_eq!(coordinate(1.0, -63.24, 100.06), "(1.0, -63.2, 100.1)");
    }

    #[test]
    fn test_list_overflow_line() {
        let items: Vec<usize> = (0..25).collect();
        let out = list_with_limit(&items, LIST_LIMIT);
        assert_eq!(out.lines().count(), 21);
        assert!(out.starts_with("- 0\n"));
        assert!(out.ends_with("... and 5 more items\n"));

        let short = list_with_limit(&items[..3], LIST_LIMIT);
        assert!(!short.contains("more items"));
    }

    #[test]
    fn test_value_text_strips_quotes() {
        assert_eq!(value_text(&json!("completed")), "completed");
        assert_eq!(value_text(&json!(7)), "7");
        assert_eq!(field_text(&json!({}), "task_order", "N/A"), "N/A");
    }

    #[test]
    fn test_player_info() {
        let player = Player {
            name: "Alex".into(),
            uuid: "abc".into(),
            position: Position {
                x: 10.0,
                y: 64.0,
                z: -3.5,
            },
            rotation: Rotation {
                yaw: 90.0,
                pitch: 12.34,
            },
        };
        let out = player_info(&player);
        assert!(out.contains("**Alex** (UUID: abc)"));
        assert!(out.contains("Position: (10.0, 64.0, -3.5)"));
        assert!(out.contains("Rotation: Yaw 90.0°, Pitch 12.3°"));
        assert!(out.contains("Facing: WEST"));
    }

    #[test]
    fn test_registry_entry_display() {
        let entry = RegistryEntry {
            id: "minecraft:cow".into(),
            display_name: Some("Cow".into()),
        };
        assert_eq!(entry.to_string(), "minecraft:cow (Cow)");
    }
}
