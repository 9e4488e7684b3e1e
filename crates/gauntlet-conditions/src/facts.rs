//! Ambient environment facts: toolchain version buckets, OS family,
//! architecture, and env-var/property lookup.
//!
//! Lookups are read live on every call and never cached across evaluations,
//! so test-induced property changes take effect immediately.

use std::collections::HashMap;
use std::process::Command;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Well-known property keys seeded by [`SystemEnvironment::capture`].
pub const PROP_OS_FAMILY: &str = "os.family";
pub const PROP_OS_ARCH: &str = "os.arch";
pub const PROP_TOOLCHAIN_VERSION: &str = "toolchain.version";

/// Capability: name -> optional value lookups over ambient state.
///
/// Evaluators take this by reference so tests can substitute a fake.
pub trait Environment: Send + Sync {
    fn env_var(&self, name: &str) -> Option<String>;
    fn property(&self, name: &str) -> Option<String>;
}

/// Live process environment.
///
/// Env vars delegate to the OS on every call. Properties live in a mutable
/// map seeded at capture time and adjustable per test run.
pub struct SystemEnvironment {
    properties: RwLock<HashMap<String, String>>,
}

impl SystemEnvironment {
    /// Capture ambient facts: OS family and architecture from the platform
    /// constants, toolchain version probed from `rustc --version`.
    pub fn capture() -> Self {
        let mut properties = HashMap::new();
        properties.insert(PROP_OS_FAMILY.to_string(), std::env::consts::OS.to_string());
        properties.insert(PROP_OS_ARCH.to_string(), std::env::consts::ARCH.to_string());
        if let Some(version) = Self::probe_toolchain_version() {
            properties.insert(PROP_TOOLCHAIN_VERSION.to_string(), version);
        }
        SystemEnvironment {
            properties: RwLock::new(properties),
        }
    }

    fn probe_toolchain_version() -> Option<String> {
        Command::new("rustc")
            .arg("--version")
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|s| s.split_whitespace().nth(1).map(|v| v.to_string()))
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut properties = self.properties.write().unwrap();
        properties.insert(name.into(), value.into());
    }

    pub fn remove_property(&self, name: &str) {
        let mut properties = self.properties.write().unwrap();
        properties.remove(name);
    }
}

impl Environment for SystemEnvironment {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn property(&self, name: &str) -> Option<String> {
        let properties = self.properties.read().unwrap();
        properties.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// ToolchainVersion - ordered version buckets
// ---------------------------------------------------------------------------

/// Host toolchain minor-version bucket.
///
/// `Other` is the catch-all for unrecognized version strings. It takes part
/// in exact set membership only and is excluded from ordered comparison, so
/// it never satisfies a range bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(non_camel_case_types)]
pub enum ToolchainVersion {
    V1_70,
    V1_71,
    V1_72,
    V1_73,
    V1_74,
    V1_75,
    V1_76,
    V1_77,
    V1_78,
    V1_79,
    V1_80,
    V1_81,
    V1_82,
    V1_83,
    V1_84,
    V1_85,
    V1_86,
    V1_87,
    V1_88,
    V1_89,
    V1_90,
    Other,
}

impl ToolchainVersion {
    /// All ordered buckets, lowest first. `Other` is deliberately absent.
    pub const ORDERED: [ToolchainVersion; 21] = [
        ToolchainVersion::V1_70,
        ToolchainVersion::V1_71,
        ToolchainVersion::V1_72,
        ToolchainVersion::V1_73,
        ToolchainVersion::V1_74,
        ToolchainVersion::V1_75,
        ToolchainVersion::V1_76,
        ToolchainVersion::V1_77,
        ToolchainVersion::V1_78,
        ToolchainVersion::V1_79,
        ToolchainVersion::V1_80,
        ToolchainVersion::V1_81,
        ToolchainVersion::V1_82,
        ToolchainVersion::V1_83,
        ToolchainVersion::V1_84,
        ToolchainVersion::V1_85,
        ToolchainVersion::V1_86,
        ToolchainVersion::V1_87,
        ToolchainVersion::V1_88,
        ToolchainVersion::V1_89,
        ToolchainVersion::V1_90,
    ];

    /// Minor number of this bucket; `None` for `Other`.
    pub fn minor(self) -> Option<u32> {
        Self::ORDERED
            .iter()
            .position(|v| *v == self)
            .map(|i| 70 + i as u32)
    }

    /// Classify a raw version string such as `1.82.0` or `1.84.0-nightly`.
    ///
    /// Unrecognized formats map to `Other`; this never fails.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.trim().split('.');
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u32>().ok());
        match (major, minor) {
            (Some(1), Some(m)) if (70..=90).contains(&m) => Self::ORDERED[(m - 70) as usize],
            _ => ToolchainVersion::Other,
        }
    }

    /// The bucket of the current toolchain, per the `toolchain.version`
    /// property.
    pub fn current(env: &dyn Environment) -> Self {
        match env.property(PROP_TOOLCHAIN_VERSION) {
            Some(raw) => Self::parse(&raw),
            None => ToolchainVersion::Other,
        }
    }
}

impl std::fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.minor() {
            Some(minor) => write!(f, "1.{}", minor),
            None => write!(f, "OTHER"),
        }
    }
}

// ---------------------------------------------------------------------------
// OsFamily and architecture
// ---------------------------------------------------------------------------

/// Operating system family, with an `Other` catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Aix,
    FreeBsd,
    Linux,
    MacOs,
    OpenBsd,
    Solaris,
    Windows,
    Other,
}

impl OsFamily {
    /// Classify the `os.family` property. Unrecognized values map to `Other`.
    pub fn detect(env: &dyn Environment) -> Self {
        match env.property(PROP_OS_FAMILY) {
            Some(raw) => Self::classify(&raw),
            None => OsFamily::Other,
        }
    }

    pub fn classify(raw: &str) -> Self {
        let name = raw.to_lowercase();
        if name.contains("aix") {
            OsFamily::Aix
        } else if name.contains("freebsd") {
            OsFamily::FreeBsd
        } else if name.contains("linux") {
            OsFamily::Linux
        } else if name.contains("mac") || name.contains("darwin") {
            OsFamily::MacOs
        } else if name.contains("openbsd") {
            OsFamily::OpenBsd
        } else if name.contains("solaris") || name.contains("sunos") {
            OsFamily::Solaris
        } else if name.contains("windows") {
            OsFamily::Windows
        } else {
            OsFamily::Other
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OsFamily::Aix => "aix",
            OsFamily::FreeBsd => "freebsd",
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
            OsFamily::OpenBsd => "openbsd",
            OsFamily::Solaris => "solaris",
            OsFamily::Windows => "windows",
            OsFamily::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Raw architecture string from the `os.arch` property, not normalized.
pub fn current_architecture(env: &dyn Environment) -> String {
    env.property(PROP_OS_ARCH).unwrap_or_default()
}

/// Substring-style, case-insensitive match of the current architecture
/// against any of the declared architecture strings.
pub fn architecture_matches(current: &str, declared: &[String]) -> bool {
    let current = current.to_lowercase();
    declared
        .iter()
        .any(|a| current.contains(&a.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeEnvironment;

    #[test]
    fn test_parse_release_version() {
        assert_eq!(ToolchainVersion::parse("1.82.0"), ToolchainVersion::V1_82);
        assert_eq!(ToolchainVersion::parse("1.70.3"), ToolchainVersion::V1_70);
    }

    #[test]
    fn test_parse_nightly_version() {
        assert_eq!(
            ToolchainVersion::parse("1.84.0-nightly"),
            ToolchainVersion::V1_84
        );
    }

    #[test]
    fn test_parse_unrecognized_maps_to_other() {
        assert_eq!(ToolchainVersion::parse("2.0.0"), ToolchainVersion::Other);
        assert_eq!(ToolchainVersion::parse("1.42.0"), ToolchainVersion::Other);
        assert_eq!(ToolchainVersion::parse("garbage"), ToolchainVersion::Other);
        assert_eq!(ToolchainVersion::parse(""), ToolchainVersion::Other);
    }

    #[test]
    fn test_minor_is_none_for_other() {
        assert_eq!(ToolchainVersion::V1_75.minor(), Some(75));
        assert_eq!(ToolchainVersion::Other.minor(), None);
    }

    #[test]
    fn test_ordered_buckets_are_monotonic() {
        let minors: Vec<u32> = ToolchainVersion::ORDERED
            .iter()
            .map(|v| v.minor().expect("ordered buckets have minors"))
            .collect();
        let mut sorted = minors.clone();
        sorted.sort_unstable();
        assert_eq!(minors, sorted);
    }

    #[test]
    fn test_os_classify() {
        assert_eq!(OsFamily::classify("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::classify("Mac OS X"), OsFamily::MacOs);
        assert_eq!(OsFamily::classify("darwin"), OsFamily::MacOs);
        assert_eq!(OsFamily::classify("Windows 11"), OsFamily::Windows);
        assert_eq!(OsFamily::classify("SunOS"), OsFamily::Solaris);
        assert_eq!(OsFamily::classify("plan9"), OsFamily::Other);
    }

    #[test]
    fn test_architecture_substring_match() {
        assert!(architecture_matches(
            "aarch64",
            &["ARCH64".to_string(), "sparc".to_string()]
        ));
        assert!(!architecture_matches("x86_64", &["aarch64".to_string()]));
        assert!(!architecture_matches("x86_64", &[]));
    }

    #[test]
    fn test_current_facts_from_fake_environment() {
        let env = FakeEnvironment::new()
            .with_property(PROP_TOOLCHAIN_VERSION, "1.81.0")
            .with_property(PROP_OS_FAMILY, "freebsd")
            .with_property(PROP_OS_ARCH, "riscv64");
        assert_eq!(ToolchainVersion::current(&env), ToolchainVersion::V1_81);
        assert_eq!(OsFamily::detect(&env), OsFamily::FreeBsd);
        assert_eq!(current_architecture(&env), "riscv64");
    }

    #[test]
    fn test_system_environment_property_overrides() {
        let env = SystemEnvironment::capture();
        env.set_property(PROP_OS_FAMILY, "solaris");
        assert_eq!(OsFamily::detect(&env), OsFamily::Solaris);
        env.remove_property(PROP_OS_FAMILY);
        assert_eq!(env.property(PROP_OS_FAMILY), None);
    }
}
