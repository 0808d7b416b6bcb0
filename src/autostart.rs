// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Start-with-Windows toggle
//!
//! Writes or removes a value under the current user's `Run` key using
//! `reg.exe`. Other platforms accept the call and do nothing.

use std::path::{Path, PathBuf};

use crate::error::{PetError, Result};

pub const RUN_KEY: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Run";
pub const RUN_VALUE_NAME: &str = "HaiXiaoTangPet";

pub trait AutoStart {
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// `reg.exe` arguments that add or delete the run entry for `exe`.
pub fn registry_args(enabled: bool, exe: &Path) -> Vec<String> {
    let mut args = vec![
        if enabled { "add" } else { "delete" }.to_string(),
        RUN_KEY.to_string(),
        "/v".to_string(),
        RUN_VALUE_NAME.to_string(),
    ];
    if enabled {
        args.extend([
            "/t".to_string(),
            "REG_SZ".to_string(),
            "/d".to_string(),
            format!("\"{}\"", exe.display()),
        ]);
    }
    args.push("/f".to_string());
    args
}

/// The registry-backed implementation for the running executable
#[derive(Debug, Clone)]
pub struct RegistryAutoStart {
    exe: PathBuf,
}

impl RegistryAutoStart {
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe()
            .map_err(|e| PetError::AutoStart(format!("cannot locate executable: {}", e)))?;
        Ok(Self::new(exe))
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }
}

impl AutoStart for RegistryAutoStart {
    #[cfg(windows)]
    fn set_enabled(&self, enabled: bool) -> Result<()> {
        use std::process::{Command, Stdio};

        if !enabled {
            let present = Command::new("reg")
                .args(["query", RUN_KEY, "/v", RUN_VALUE_NAME])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false);
            if !present {
                return Ok(());
            }
        }

        let output = Command::new("reg")
            .args(registry_args(enabled, &self.exe))
            .output()
            .map_err(|e| PetError::AutoStart(format!("failed to run reg.exe: {}", e)))?;

        if output.status.success() {
            tracing::info!(target: "deskpet.settings", enabled, "Auto-start updated");
            Ok(())
        } else {
            Err(PetError::AutoStart(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    #[cfg(not(windows))]
    fn set_enabled(&self, enabled: bool) -> Result<()> {
        tracing::debug!(
            target: "deskpet.settings",
            enabled,
            exe = %self.exe.display(),
            "Auto-start is only supported on Windows"
        );
        Ok(())
    }
}

/// Apply the toggle, logging instead of failing.
pub fn apply(auto_start: &dyn AutoStart, enabled: bool) -> bool {
    match auto_start.set_enabled(enabled) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(target: "deskpet.settings", "Failed to set auto-start: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        calls: RefCell<Vec<bool>>,
        fail: bool,
    }

    impl AutoStart for Recording {
        fn set_enabled(&self, enabled: bool) -> Result<()> {
            self.calls.borrow_mut().push(enabled);
            if self.fail {
                Err(PetError::AutoStart("access denied".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_enable_args_quote_exe() {
        let args = registry_args(true, Path::new(r"C:\Program Files\Pet\deskpet.exe"));
        assert_eq!(
            args,
            vec![
                "add",
                RUN_KEY,
                "/v",
                "HaiXiaoTangPet",
                "/t",
                "REG_SZ",
                "/d",
                r#""C:\Program Files\Pet\deskpet.exe""#,
                "/f",
            ]
        );
    }

    #[test]
    fn test_disable_args() {
        let args = registry_args(false, Path::new("deskpet.exe"));
        assert_eq!(args, vec!["delete", RUN_KEY, "/v", "HaiXiaoTangPet", "/f"]);
    }

    #[test]
    fn test_apply_swallows_failure() {
        let failing = Recording {
            calls: RefCell::new(Vec::new()),
            fail: true,
        };
        assert!(!apply(&failing, true));
        assert_eq!(*failing.calls.borrow(), vec![true]);

        let ok = Recording {
            calls: RefCell::new(Vec::new()),
            fail: false,
        };
        assert!(apply(&ok, false));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_noop_off_windows() {
        let auto = RegistryAutoStart::new("/usr/bin/deskpet");
        assert!(auto.set_enabled(true).is_ok());
        assert!(auto.set_enabled(false).is_ok());
    }
}
