//! Extension inclusion policy.
//!
//! A pure predicate over extension metadata deciding whether an extension
//! participates in generation. Exclusions are diagnostics, not errors: a
//! skipped extension simply contributes nothing to the required closure.

use std::collections::BTreeSet;

use tracing::debug;
use vkbridge_registry::{GeneratorConfig, RawExtension, RawExtensionKind};

/// Tags marking experimental extension tiers whose APIs are unstable and
/// can change between minor API revisions.
const EXPERIMENTAL_TAGS: [&str; 2] = ["KHX", "NVX"];

/// Why an extension was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Support status is disabled (reserved or retired number).
    Disabled,
    /// Experimental tier tag in the name.
    Experimental,
    /// Instance-scoped and not in the supported set; instance extensions
    /// generally need platform windowing work.
    UnsupportedInstance,
    /// Explicitly blacklisted.
    Blacklisted,
    /// Builds on an extension that is itself excluded.
    RequiresExcluded,
}

/// Decide whether a single extension is included, ignoring transitive
/// requirements. `None` means included.
fn direct_exclusion(ext: &RawExtension, config: &GeneratorConfig) -> Option<Exclusion> {
    if ext.supported == "disabled" {
        return Some(Exclusion::Disabled);
    }
    if EXPERIMENTAL_TAGS.iter().any(|tag| ext.name.contains(tag)) {
        return Some(Exclusion::Experimental);
    }
    if ext.kind == RawExtensionKind::Instance
        && !config.supported_instance_extensions.contains(&ext.name)
    {
        return Some(Exclusion::UnsupportedInstance);
    }
    if config.blacklisted_extensions.contains(&ext.name) {
        return Some(Exclusion::Blacklisted);
    }
    None
}

/// Filter a list of extensions down to the included ones.
///
/// Transitive exclusion is resolved against the full input list: an
/// extension requiring an excluded extension is excluded too, to any depth.
pub fn filter_extensions<'a>(
    extensions: &'a [RawExtension],
    config: &GeneratorConfig,
) -> Vec<&'a RawExtension> {
    // First pass: direct exclusions.
    let mut excluded: BTreeSet<&str> = BTreeSet::new();
    for ext in extensions {
        if let Some(why) = direct_exclusion(ext, config) {
            debug!(extension = %ext.name, reason = ?why, "skipping extension");
            excluded.insert(&ext.name);
        }
    }

    // Propagate exclusion through requires edges to a fixed point.
    loop {
        let mut changed = false;
        for ext in extensions {
            if excluded.contains(ext.name.as_str()) {
                continue;
            }
            if ext.requires.iter().any(|r| excluded.contains(r.as_str())) {
                debug!(
                    extension = %ext.name,
                    reason = ?Exclusion::RequiresExcluded,
                    "skipping extension"
                );
                excluded.insert(&ext.name);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    extensions
        .iter()
        .filter(|ext| !excluded.contains(ext.name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(name: &str, kind: RawExtensionKind, requires: &[&str]) -> RawExtension {
        RawExtension {
            name: name.to_string(),
            number: 1,
            kind,
            supported: "vulkan".to_string(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            commands: vec![],
            enums: vec![],
        }
    }

    #[test]
    fn device_extension_included_by_default() {
        let config = GeneratorConfig::default();
        let exts = vec![ext("VK_NV_glsl_shader", RawExtensionKind::Device, &[])];
        assert_eq!(filter_extensions(&exts, &config).len(), 1);
    }

    #[test]
    fn disabled_extension_excluded() {
        let config = GeneratorConfig::default();
        let mut e = ext("VK_TEST_reserved", RawExtensionKind::Device, &[]);
        e.supported = "disabled".to_string();
        assert!(filter_extensions(&[e], &config).is_empty());
    }

    #[test]
    fn experimental_tier_excluded() {
        let config = GeneratorConfig::default();
        let exts = vec![
            ext("VK_KHX_device_group", RawExtensionKind::Device, &[]),
            ext("VK_NVX_multiview_per_view_attributes", RawExtensionKind::Device, &[]),
        ];
        assert!(filter_extensions(&exts, &config).is_empty());
    }

    #[test]
    fn instance_extension_needs_explicit_support() {
        let config = GeneratorConfig::default();
        let exts = vec![
            ext("VK_KHR_surface", RawExtensionKind::Instance, &[]),
            ext("VK_KHR_xlib_surface", RawExtensionKind::Instance, &[]),
        ];
        let kept = filter_extensions(&exts, &config);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "VK_KHR_surface");
    }

    #[test]
    fn blacklisted_extension_excluded() {
        let config = GeneratorConfig::default();
        let exts = vec![ext("VK_KHR_display", RawExtensionKind::Device, &[])];
        assert!(filter_extensions(&exts, &config).is_empty());
    }

    #[test]
    fn transitive_requirement_on_excluded_propagates() {
        let config = GeneratorConfig::default();
        let exts = vec![
            ext("VK_KHR_display", RawExtensionKind::Device, &[]),
            ext(
                "VK_KHR_display_swapchain",
                RawExtensionKind::Device,
                &["VK_KHR_display"],
            ),
            ext(
                "VK_TEST_depends_deeper",
                RawExtensionKind::Device,
                &["VK_KHR_display_swapchain"],
            ),
        ];
        assert!(filter_extensions(&exts, &config).is_empty());
    }
}
