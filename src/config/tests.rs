use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::test_support::{EnvGuard, env_lock};

#[test]
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/vivace-xdg");
    let _g2 = EnvGuard::set("HOME", "/tmp/ignored-home");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/vivace-xdg")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/vivace-home");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/vivace-home")
            .join(".config")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[remote]
enabled = false
base_url = "https://sync.example.net"
poll_secs = 30
timeout_secs = 5

[controls]
scrub_seconds = 8
volume_step = 0.1
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__REMOTE__POLL_SECS");

    let s = Settings::load().unwrap();
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert!(!s.remote.enabled);
    assert_eq!(s.remote.base_url, "https://sync.example.net");
    assert_eq!(s.remote.poll_secs, 30);
    assert_eq!(s.remote.timeout_secs, 5);
    assert_eq!(s.controls.scrub_seconds, 8);
    assert!((s.controls.volume_step - 0.1).abs() < f32::EPSILON);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[remote]
poll_secs = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__REMOTE__POLL_SECS", "3");

    let s = Settings::load().unwrap();
    assert_eq!(s.remote.poll_secs, 3);
}

#[test]
fn validate_rejects_zero_poll_interval() {
    let mut s = Settings::default();
    s.remote.poll_secs = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_out_of_range_volume_step() {
    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());
    s.controls.volume_step = 1.5;
    assert!(s.validate().is_err());
    s.controls.volume_step = 0.05;
    assert!(s.validate().is_ok());
}
