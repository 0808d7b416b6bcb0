// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::io;

use deskpet::config::SettingsStore;
use deskpet::error::PetError;
use tempfile::TempDir;

#[test]
fn test_io_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "locked");
    let err: PetError = io_error.into();
    assert!(matches!(err, PetError::Io(_)));
}

#[test]
fn test_auto_start_error_display() {
    let err = PetError::AutoStart("access denied".to_string());
    assert_eq!(err.to_string(), "Auto-start error: access denied");
}

#[test]
fn test_gui_error_display() {
    let err = PetError::Gui("no display".to_string());
    assert_eq!(err.to_string(), "GUI error: no display");
}

#[test]
fn test_corrupt_config_surfaces_json_error() {
    let tmp = TempDir::new().unwrap();
    let store = SettingsStore::new(tmp.path());
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "[1, 2").unwrap();

    match store.load() {
        Err(PetError::Json(_)) => {}
        other => panic!("expected JSON error, got {:?}", other),
    }
}

#[test]
fn test_wrong_type_surfaces_json_error() {
    let tmp = TempDir::new().unwrap();
    let store = SettingsStore::new(tmp.path());
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), r#"{ "focus_minutes": "twenty" }"#).unwrap();

    assert!(matches!(store.load(), Err(PetError::Json(_))));
}

#[test]
fn test_errors_are_send_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<PetError>();
}
