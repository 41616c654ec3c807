//! Generator configuration.
//!
//! The policy tables that steer generation: which instance extensions are
//! allowed, which extensions are excluded outright, per-function overrides
//! for dispatch/driver/thunk participation, and the extension numbering
//! constants. `Default` carries the built-in tables so the generator runs
//! with no configuration file; a TOML file can replace any of them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Base value for extension-contributed enumerators.
pub const EXT_BASE: i64 = 1_000_000_000;
/// Size of the per-extension enumerator block.
pub const EXT_BLOCK_SIZE: i64 = 1_000;

/// Per-function generation overrides.
///
/// Functions absent from the override table get a plain generated thunk and
/// a dispatch-table slot, and are not part of the driver interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionOverride {
    /// Whether the function gets a dispatch-table slot.
    pub dispatch: bool,
    /// Whether the function is part of the platform driver interface.
    pub driver: bool,
    /// Whether to generate a call thunk (false means a hand-written
    /// implementation exists elsewhere).
    pub thunk: bool,
}

impl Default for FunctionOverride {
    fn default() -> Self {
        FunctionOverride {
            dispatch: true,
            driver: false,
            thunk: true,
        }
    }
}

/// The full configuration surface of the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Instance extensions allowed despite the instance-scope filter.
    /// Instance extensions generally need platform-specific windowing work,
    /// so only a vetted set is passed through.
    #[serde(rename = "supported-instance-extensions")]
    pub supported_instance_extensions: BTreeSet<String>,

    /// Extensions excluded outright.
    #[serde(rename = "blacklisted-extensions")]
    pub blacklisted_extensions: BTreeSet<String>,

    /// Per-function overrides, keyed by function name.
    #[serde(rename = "function-overrides")]
    pub function_overrides: BTreeMap<String, FunctionOverride>,

    /// Base value for extension enumerators.
    #[serde(rename = "ext-base")]
    pub ext_base: i64,

    /// Per-extension enumerator block size.
    #[serde(rename = "ext-block-size")]
    pub ext_block_size: i64,

    /// Structures whose cross-ABI layouts happen to coincide even though
    /// the member rules report otherwise; their parameter use sites skip
    /// conversion.
    #[serde(rename = "conversion-exempt")]
    pub conversion_exempt: BTreeSet<String>,

    /// Driver interface version; bump on any driver-interface change.
    #[serde(rename = "driver-version")]
    pub driver_version: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let supported_instance_extensions = [
            "VK_KHR_surface",
            "VK_KHR_win32_surface",
            "VK_KHR_swapchain",
            "VK_KHR_get_physical_device_properties2",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let blacklisted_extensions = [
            // The loader on the foreign side already provides debug_report;
            // plumbing it down would double every message.
            "VK_EXT_debug_report",
            "VK_EXT_display_control",
            "VK_GOOGLE_display_timing",
            "VK_KHR_display",
            "VK_KHR_external_fence_fd",
            "VK_KHR_external_fence_win32",
            "VK_KHR_external_memory",
            "VK_KHR_external_semaphore",
            "VK_KHR_external_semaphore_capabilities",
            "VK_KHR_shared_presentable_image",
            "VK_NV_external_memory_win32",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let mut function_overrides = BTreeMap::new();
        let mut set = |name: &str, dispatch: bool, driver: bool, thunk: bool| {
            function_overrides.insert(
                name.to_string(),
                FunctionOverride {
                    dispatch,
                    driver,
                    thunk,
                },
            );
        };

        // Global functions.
        set("vkCreateInstance", false, true, false);
        set("vkEnumerateInstanceExtensionProperties", false, true, false);
        set("vkGetInstanceProcAddr", false, true, false);

        // Instance functions.
        set("vkCreateDevice", true, false, false);
        set("vkDestroyInstance", true, true, false);
        set("vkEnumerateInstanceLayerProperties", false, false, false);
        set("vkEnumeratePhysicalDevices", true, false, false);

        // Device functions.
        set("vkAllocateCommandBuffers", true, false, false);
        set("vkCmdExecuteCommands", true, false, false);
        set("vkDestroyDevice", true, false, false);
        set("vkEnumerateDeviceExtensionProperties", true, false, false);
        set("vkFreeCommandBuffers", true, false, false);
        set("vkGetDeviceProcAddr", true, true, false);
        set("vkGetDeviceQueue", true, false, false);
        set("vkQueueSubmit", true, false, false);

        // Surface.
        set("vkDestroySurfaceKHR", true, true, false);
        set("vkGetPhysicalDeviceSurfaceSupportKHR", true, true, false);
        set("vkGetPhysicalDeviceSurfaceCapabilitiesKHR", true, true, false);
        set("vkGetPhysicalDeviceSurfaceFormatsKHR", true, true, false);
        set("vkGetPhysicalDeviceSurfacePresentModesKHR", true, true, false);

        // Platform surface creation.
        set("vkCreateWin32SurfaceKHR", true, true, false);
        set("vkGetPhysicalDeviceWin32PresentationSupportKHR", true, true, false);

        // Swapchain.
        set("vkAcquireNextImageKHR", true, true, false);
        set("vkCreateSwapchainKHR", true, true, false);
        set("vkDestroySwapchainKHR", true, true, false);
        set("vkGetSwapchainImagesKHR", true, true, false);
        set("vkQueuePresentKHR", true, true, false);

        let conversion_exempt = ["VkSparseImageMemoryRequirements"]
            .into_iter()
            .map(str::to_string)
            .collect();

        GeneratorConfig {
            supported_instance_extensions,
            blacklisted_extensions,
            function_overrides,
            ext_base: EXT_BASE,
            ext_block_size: EXT_BLOCK_SIZE,
            conversion_exempt,
            driver_version: 3,
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a TOML string. Absent tables keep their
    /// built-in defaults.
    pub fn parse(input: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(input)?;
        Ok(config)
    }

    /// Parse a configuration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Override metadata for a function, defaulted for unlisted names.
    pub fn override_for(&self, name: &str) -> FunctionOverride {
        self.function_overrides
            .get(name)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_policy_tables() {
        let config = GeneratorConfig::default();
        assert!(config
            .supported_instance_extensions
            .contains("VK_KHR_surface"));
        assert!(config
            .blacklisted_extensions
            .contains("VK_EXT_debug_report"));
        assert_eq!(config.ext_base, 1_000_000_000);
        assert_eq!(config.ext_block_size, 1_000);
    }

    #[test]
    fn unlisted_function_gets_plain_thunk() {
        let config = GeneratorConfig::default();
        let ov = config.override_for("vkCmdDraw");
        assert!(ov.dispatch);
        assert!(!ov.driver);
        assert!(ov.thunk);
    }

    #[test]
    fn listed_function_keeps_table_entry() {
        let config = GeneratorConfig::default();
        let ov = config.override_for("vkCreateInstance");
        assert!(!ov.dispatch);
        assert!(ov.driver);
        assert!(!ov.thunk);
    }

    #[test]
    fn parse_partial_config() {
        let config = GeneratorConfig::parse(
            r#"
blacklisted-extensions = ["VK_TEST_thing"]

[function-overrides.vkTestFunc]
dispatch = true
driver = true
thunk = false
"#,
        )
        .unwrap();
        assert!(config.blacklisted_extensions.contains("VK_TEST_thing"));
        // Replaced wholesale, not merged.
        assert!(!config.blacklisted_extensions.contains("VK_EXT_debug_report"));
        let ov = config.override_for("vkTestFunc");
        assert!(ov.driver);
        assert!(!ov.thunk);
        // Numbering constants keep their defaults.
        assert_eq!(config.ext_base, 1_000_000_000);
    }
}
