//! Default host probe backed by the standard library.
//!
//! Attributes the process cannot observe natively (screen geometry, power)
//! report `AttributeUnavailable`; embedding hosts that know them supply
//! their own [`IEnvironmentProbe`] or use the builder overrides.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Local, Offset};
use pulse_core::errors::CollectionError;
use pulse_core::traits::{IEnvironmentProbe, MemoryUsage, PowerStatus};

/// Std-backed probe with optional host-supplied overrides.
#[derive(Debug)]
pub struct SystemProbe {
    screen: Option<(u32, u32)>,
    power: Option<PowerStatus>,
    online: AtomicBool,
    focused: AtomicBool,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            screen: None,
            power: None,
            online: AtomicBool::new(true),
            focused: AtomicBool::new(true),
        }
    }

    /// Host-known display geometry.
    #[must_use]
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some((width, height));
        self
    }

    /// Host-known battery state.
    #[must_use]
    pub fn with_power(mut self, power: PowerStatus) -> Self {
        self.power = Some(power);
        self
    }

    /// Hosts that track connectivity themselves update this flag.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Hosts that track window focus themselves update this flag.
    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::Relaxed);
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl IEnvironmentProbe for SystemProbe {
    fn agent_string(&self) -> Result<String, CollectionError> {
        Ok(format!(
            "pulse-agent/{} ({}; {})",
            pulse_core::constants::VERSION,
            std::env::consts::OS,
            std::env::consts::ARCH
        ))
    }

    fn platform(&self) -> Result<String, CollectionError> {
        Ok(std::env::consts::OS.to_string())
    }

    fn locale(&self) -> Result<String, CollectionError> {
        std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .map_err(|e| CollectionError::unreadable("locale", e))
    }

    fn timezone_name(&self) -> Result<String, CollectionError> {
        // Offset form; the IANA name is not observable from std.
        Ok(Local::now().format("%:z").to_string())
    }

    fn timezone_offset_minutes(&self) -> Result<i32, CollectionError> {
        Ok(Local::now().offset().fix().local_minus_utc() / 60)
    }

    fn logical_cores(&self) -> Result<usize, CollectionError> {
        std::thread::available_parallelism()
            .map(usize::from)
            .map_err(|e| CollectionError::unreadable("logical_cores", e))
    }

    fn screen_geometry(&self) -> Result<(u32, u32), CollectionError> {
        self.screen
            .ok_or_else(|| CollectionError::unavailable("screen_geometry"))
    }

    fn is_online(&self) -> Result<bool, CollectionError> {
        Ok(self.online.load(Ordering::Relaxed))
    }

    fn is_focused(&self) -> Result<bool, CollectionError> {
        Ok(self.focused.load(Ordering::Relaxed))
    }

    fn power(&self) -> Result<PowerStatus, CollectionError> {
        self.power.ok_or_else(|| CollectionError::unavailable("power"))
    }

    fn memory_usage(&self) -> Result<MemoryUsage, CollectionError> {
        read_proc_memory().ok_or_else(|| CollectionError::unavailable("memory_usage"))
    }
}

/// VmRSS / MemTotal in megabytes, Linux only.
#[cfg(target_os = "linux")]
fn read_proc_memory() -> Option<MemoryUsage> {
    fn kb_field(text: &str, key: &str) -> Option<u64> {
        text.lines()
            .find(|l| l.starts_with(key))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    }

    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    Some(MemoryUsage {
        used_mb: kb_field(&status, "VmRSS:")? / 1024,
        total_mb: kb_field(&meminfo, "MemTotal:")? / 1024,
    })
}

#[cfg(not(target_os = "linux"))]
fn read_proc_memory() -> Option<MemoryUsage> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_attributes_read_cleanly() {
        let probe = SystemProbe::new();
        assert!(!probe.agent_string().unwrap().is_empty());
        assert!(!probe.platform().unwrap().is_empty());
        assert!(probe.logical_cores().unwrap() >= 1);
    }

    #[test]
    fn screen_unavailable_without_override() {
        let probe = SystemProbe::new();
        assert!(probe.screen_geometry().is_err());
        let probe = SystemProbe::new().with_screen(1920, 1080);
        assert_eq!(probe.screen_geometry().unwrap(), (1920, 1080));
    }

    #[test]
    fn connectivity_flag_tracks_host_updates() {
        let probe = SystemProbe::new();
        assert!(probe.is_online().unwrap());
        probe.set_online(false);
        assert!(!probe.is_online().unwrap());
    }
}
