//! Debug target registration and dispatch
//!
//! Targets are selected with a `name[:key=value,...]` string. Only targets
//! enabled at compile time are available.

use ccflash_core::target::DebugTarget;

/// Error opening a debug target
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// No target with that name is built in
    #[error("unknown target '{0}' (available: {available})", available = target_names())]
    Unknown(String),

    /// An option key the target does not understand
    #[error("{target}: unknown option '{key}'")]
    UnknownOption {
        /// Target name
        target: &'static str,
        /// Offending key
        key: String,
    },

    /// An option value that does not parse
    #[error("{target}: invalid value '{value}' for '{key}'")]
    InvalidValue {
        /// Target name
        target: &'static str,
        /// Option key
        key: String,
        /// Offending value
        value: String,
    },
}

/// Information about a target
pub struct TargetInfo {
    /// Name used for matching
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Get information about all targets enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_targets() -> Vec<TargetInfo> {
    let mut targets = Vec::new();

    #[cfg(feature = "dummy")]
    targets.push(TargetInfo {
        name: "dummy",
        description: "Simulated CC26xx/CC13xx device (device=<type>,sectors=<n>,sram=<code>,rev=<n>)",
    });

    targets
}

/// Comma separated list of target names
pub fn target_names() -> String {
    let names: Vec<&str> = available_targets().iter().map(|t| t.name).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Split a target string into its name and key/value options
///
/// Options without a `=` are kept with an empty value.
pub fn parse_target_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    match s.split_once(':') {
        Some((name, opts)) => {
            let opts = opts
                .split(',')
                .filter(|opt| !opt.is_empty())
                .map(|opt| opt.split_once('=').unwrap_or((opt, "")))
                .collect();
            (name, opts)
        }
        None => (s, Vec::new()),
    }
}

/// Open the target named by `spec`
pub fn open_target(spec: &str) -> Result<Box<dyn DebugTarget + Send>, TargetError> {
    let (name, options) = parse_target_string(spec);

    match name {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&options),
        _ => {
            let _ = options;
            Err(TargetError::Unknown(name.to_string()))
        }
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(options: &[(&str, &str)]) -> Result<Box<dyn DebugTarget + Send>, TargetError> {
    use ccflash_core::bank::parse_number;
    use ccflash_core::DeviceType;
    use ccflash_dummy::{DummyConfig, DummyTarget};

    const NAME: &str = "dummy";

    let invalid = |key: &str, value: &str| TargetError::InvalidValue {
        target: NAME,
        key: key.to_string(),
        value: value.to_string(),
    };
    let number = |key: &str, value: &str| parse_number(value).map_err(|_| invalid(key, value));

    let device_type = options
        .iter()
        .find(|&&(key, _)| key == "device")
        .map(|&(key, value)| parse_device_type(value).ok_or_else(|| invalid(key, value)))
        .transpose()?
        .unwrap_or(DeviceType::Cc26x0);

    let mut config = DummyConfig::for_device(device_type);

    for &(key, value) in options {
        match key {
            "device" => {}
            "sectors" => config = config.with_sectors(number(key, value)?),
            "sram" => config.sram_size_code = number(key, value)?,
            "rev" => config = config.with_revision(number(key, value)?),
            "latency" => config.algorithm_latency = number(key, value)?,
            _ => {
                return Err(TargetError::UnknownOption {
                    target: NAME,
                    key: key.to_string(),
                })
            }
        }
    }

    log::debug!(
        "dummy: {} with {} bytes of flash",
        device_type.name(),
        config.flash_size()
    );
    Ok(Box::new(DummyTarget::new(config)))
}

#[cfg(feature = "dummy")]
fn parse_device_type(s: &str) -> Option<ccflash_core::DeviceType> {
    use ccflash_core::DeviceType;

    match s.to_ascii_lowercase().as_str() {
        "cc26x0" => Some(DeviceType::Cc26x0),
        "cc26x1" => Some(DeviceType::Cc26x1),
        "cc13x0" => Some(DeviceType::Cc13x0),
        "cc26x2" => Some(DeviceType::Cc26x2),
        "cc13x2" => Some(DeviceType::Cc13x2),
        "unknown" => Some(DeviceType::NoType),
        _ => None,
    }
}
