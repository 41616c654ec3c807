//! vkbridge CLI — generate ABI bridge sources from an API registry.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vkbridge",
    version,
    about = "ABI bridge generator for a registry-described graphics API"
)]
struct Cli {
    /// Increase diagnostic detail (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the bridge sources from a registry document
    Generate {
        /// Registry document (TOML)
        #[arg(long)]
        registry: PathBuf,
        /// Generator configuration file (defaults to the built-in tables)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory for the generated sources
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Resolve and analyze without writing sources
    Check {
        /// Registry document (TOML)
        #[arg(long)]
        registry: PathBuf,
        /// Generator configuration file (defaults to the built-in tables)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report format (human, json)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    // try_init: tests may install a subscriber more than once.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            registry,
            config,
            out_dir,
        } => commands::generate::run(&registry, config.as_deref(), &out_dir),
        Commands::Check {
            registry,
            config,
            report,
        } => commands::check::run(&registry, config.as_deref(), report.as_deref()),
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::path::Path;

    /// A small but representative registry: core feature, a converting
    /// struct chain, a returned-only query struct and two extensions.
    const FIXTURE_REGISTRY: &str = r#"
[[constants]]
name = "VK_MAX_DESCRIPTION_SIZE"
value = "256"

[[base-types]]
name = "VkDeviceSize"
underlying = "uint64_t"

[[base-types]]
name = "VkFlags"
underlying = "uint32_t"

[[enums]]
name = "VkResult"

[[enums.values]]
name = "VK_SUCCESS"
value = 0

[[enums]]
name = "VkStructureType"

[[enums.values]]
name = "VK_STRUCTURE_TYPE_SUBMIT_INFO"
value = 4

[[handles]]
name = "VkInstance"
dispatchable = true

[[handles]]
name = "VkPhysicalDevice"
dispatchable = true
parent = "VkInstance"

[[handles]]
name = "VkDevice"
dispatchable = true
parent = "VkPhysicalDevice"

[[structs]]
name = "VkMemoryHeap"
returned-only = true

[[structs.members]]
name = "size"
type = "VkDeviceSize"

[[structs.members]]
name = "flags"
type = "VkFlags"

[[structs]]
name = "VkMemoryProperties"
returned-only = true

[[structs.members]]
name = "memoryHeapCount"
type = "uint32_t"

[[structs.members]]
name = "memoryHeaps"
type = "VkMemoryHeap"
array = "16"

[[structs]]
name = "VkProperties2"
returned-only = true

[[structs.members]]
name = "sType"
type = "VkStructureType"

[[structs.members]]
name = "pNext"
type = "void"
pointer = 1

[[structs.members]]
name = "limit"
type = "VkDeviceSize"

[[commands]]
name = "vkGetPhysicalDeviceMemoryProperties"
return-type = "void"

[[commands.params]]
name = "physicalDevice"
type = "VkPhysicalDevice"

[[commands.params]]
name = "pMemoryProperties"
type = "VkMemoryProperties"
pointer = 1

[[commands]]
name = "vkGetPhysicalDeviceProperties2"
return-type = "void"

[[commands.params]]
name = "physicalDevice"
type = "VkPhysicalDevice"

[[commands.params]]
name = "pProperties"
type = "VkProperties2"
pointer = 1

[[features]]
name = "VK_VERSION_1_0"
commands = [
    "vkGetPhysicalDeviceMemoryProperties",
    "vkGetPhysicalDeviceProperties2",
]
types = ["VkResult"]

[[extensions]]
name = "VK_KHR_surface"
number = 1
type = "instance"

[[extensions.enums]]
name = "VK_ERROR_SURFACE_LOST_KHR"
extends = "VkResult"
offset = 0
negative = true

[[extensions]]
name = "VK_KHX_experimental_thing"
number = 9
type = "device"
"#;

    fn write_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("registry.toml");
        std::fs::write(&path, FIXTURE_REGISTRY).unwrap();
        path
    }

    #[test]
    fn generate_writes_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write_fixture(dir.path());
        let out = dir.path().join("out");

        commands::generate::run(&registry, None, &out).unwrap();

        for name in [
            vkbridge_emit::API_HEADER,
            vkbridge_emit::DRIVER_HEADER,
            vkbridge_emit::BRIDGE_HEADER,
            vkbridge_emit::THUNK_SOURCE,
        ] {
            assert!(out.join(name).is_file(), "{name} should exist");
        }

        let api = std::fs::read_to_string(out.join(vkbridge_emit::API_HEADER)).unwrap();
        assert!(api.contains("VK_DEFINE_HANDLE(VkPhysicalDevice)"));
        assert!(api.contains("typedef uint64_t VkDeviceSize;"));
        // The extension's subtractive error code landed in VkResult.
        assert!(api.contains("VK_ERROR_SURFACE_LOST_KHR = -1000000000"));
        // The experimental extension contributed nothing.
        assert!(!api.contains("experimental_thing"));

        let bridge = std::fs::read_to_string(out.join(vkbridge_emit::BRIDGE_HEADER)).unwrap();
        assert!(bridge.contains("typedef struct VkMemoryHeap_host"));
        assert!(bridge.contains("typedef struct VkMemoryProperties_host"));
        assert!(bridge.contains("typedef struct VkProperties2_host"));

        let thunks = std::fs::read_to_string(out.join(vkbridge_emit::THUNK_SOURCE)).unwrap();
        // Fixed-array member conversion of the output struct.
        assert!(thunks.contains("convert_VkMemoryHeap_static_array_from_host"));
        // Chain/tag copy for the extensible query struct.
        assert!(thunks.contains("out->pNext = in->pNext;"));
        assert!(thunks.contains("out->sType = in->sType;"));
        assert!(thunks.contains("\"VK_KHR_surface\","));
    }

    #[test]
    fn check_reports_summary() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write_fixture(dir.path());
        commands::check::run(&registry, None, None).unwrap();
        commands::check::run(&registry, None, Some("json")).unwrap();
    }

    #[test]
    fn unknown_type_reference_fails() {
        let dir = tempfile::tempdir().unwrap();
        let broken = FIXTURE_REGISTRY.replace("type = \"VkMemoryHeap\"", "type = \"VkMissing\"");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, broken).unwrap();

        let result = commands::check::run(&path, None, None);
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("VkMissing"));
    }

    #[test]
    fn config_file_overrides_policy() {
        let dir = tempfile::tempdir().unwrap();
        let registry = write_fixture(dir.path());
        // Blacklist the surface extension; its error code must disappear.
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "blacklisted-extensions = [\"VK_KHR_surface\"]\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        commands::generate::run(&registry, Some(&config_path), &out).unwrap();
        let api = std::fs::read_to_string(out.join(vkbridge_emit::API_HEADER)).unwrap();
        assert!(!api.contains("VK_ERROR_SURFACE_LOST_KHR"));
        let thunks = std::fs::read_to_string(out.join(vkbridge_emit::THUNK_SOURCE)).unwrap();
        assert!(!thunks.contains("\"VK_KHR_surface\","));
    }
}
