//! Dependency tree display.
//!
//! ```text
//! microphase-a7lite
//! ├── sys-memory-controller
//! │   └── ddr-phy (auto)
//! ├── ethernet-mac
//! │   └── ethernet-phy (auto)
//! └── etherbone
//!     └── ethernet-phy (auto) (shared)
//! ```

use std::collections::BTreeSet;

use crate::registry::ComponentRegistry;
use crate::resolve::Resolution;

/// Format the dependency tree of a resolution under `root`.
///
/// Each requested component is a top-level entry. A component reached a
/// second time is marked `(shared)` and not expanded again.
pub fn format_tree(root: &str, registry: &ComponentRegistry, resolution: &Resolution) -> String {
    let mut out = format!("{root}\n");
    let mut seen = BTreeSet::new();

    let count = resolution.requested.len();
    for (i, id) in resolution.requested.iter().enumerate() {
        format_node(&mut out, registry, resolution, id, "", i == count - 1, &mut seen);
    }

    out.push_str(&format!(
        "\n{} components ({} auto-included)\n",
        resolution.order.len(),
        resolution.auto_included.len()
    ));
    out
}

fn format_node<'a>(
    out: &mut String,
    registry: &'a ComponentRegistry,
    resolution: &Resolution,
    id: &'a str,
    prefix: &str,
    is_last: bool,
    seen: &mut BTreeSet<&'a str>,
) {
    let connector = if is_last { "└── " } else { "├── " };
    let auto_marker = if resolution.is_auto_included(id) { " (auto)" } else { "" };
    let shared = !seen.insert(id);
    let shared_marker = if shared { " (shared)" } else { "" };
    out.push_str(&format!("{prefix}{connector}{id}{auto_marker}{shared_marker}\n"));
    if shared {
        return;
    }

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };
    let Some(spec) = registry.get(id) else {
        return;
    };
    let child_count = spec.dependencies.len();
    for (i, dep) in spec.dependency_ids().enumerate() {
        format_node(out, registry, resolution, dep, &child_prefix, i == child_count - 1, seen);
    }
}

/// Format the build order as a numbered list.
pub fn format_order(resolution: &Resolution) -> String {
    let mut out = String::new();
    for (i, id) in resolution.order.iter().enumerate() {
        let marker = if resolution.is_auto_included(id) { " (auto)" } else { "" };
        out.push_str(&format!("{:>3}. {id}{marker}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentSpec;
    use crate::resolve::resolve;

    fn registry() -> ComponentRegistry {
        ComponentRegistry::load([
            ComponentSpec::new("mac", "").depends_on("phy"),
            ComponentSpec::new("etherbone", "").depends_on("phy"),
            ComponentSpec::new("phy", "").depends_on("mdio"),
            ComponentSpec::new("mdio", ""),
            ComponentSpec::new("leds", ""),
        ])
        .unwrap()
    }

    #[test]
    fn format_nested_tree() {
        let registry = registry();
        let resolution = resolve(&registry, &["mac", "leds"]).unwrap();
        let output = format_tree("board", &registry, &resolution);
        assert!(output.starts_with("board\n"));
        assert!(output.contains("├── mac\n"));
        assert!(output.contains("│   └── phy (auto)\n"));
        assert!(output.contains("│       └── mdio (auto)\n"));
        assert!(output.contains("└── leds\n"));
        assert!(output.contains("4 components (2 auto-included)"));
    }

    #[test]
    fn shared_dependency_marker() {
        let registry = registry();
        let resolution = resolve(&registry, &["mac", "etherbone"]).unwrap();
        let output = format_tree("board", &registry, &resolution);
        assert!(output.contains("    └── phy (auto) (shared)\n"));
        // Shared nodes are not expanded twice.
        assert_eq!(output.matches("mdio").count(), 1);
    }

    #[test]
    fn empty_tree() {
        let registry = registry();
        let resolution = resolve::<&str>(&registry, &[]).unwrap();
        let output = format_tree("board", &registry, &resolution);
        assert!(output.contains("0 components (0 auto-included)"));
    }

    #[test]
    fn order_list_marks_auto_included() {
        let registry = registry();
        let resolution = resolve(&registry, &["mac"]).unwrap();
        assert_eq!(
            format_order(&resolution),
            "  1. mdio (auto)\n  2. phy (auto)\n  3. mac\n"
        );
    }
}
