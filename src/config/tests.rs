use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_attacca_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ATTACCA_CONFIG_PATH", "/tmp/attacca-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/attacca-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("attacca")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("attacca")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_streaming_client_behavior() {
    let s = Settings::default();
    assert!(s.player.loop_enabled);
    assert_eq!(s.player.preview_loop_max_secs, 35.0);
    assert_eq!(s.player.volume, 1.0);
    assert_eq!(s.resolver.api_base, "http://localhost:8000/api/v1");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.player.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.preview_loop_max_secs = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.resolver.attempt_timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.resolver.api_base = "  ".into();
    assert!(s.validate().is_err());
}

#[test]
fn environment_overrides_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ATTACCA_CONFIG_PATH", "/nonexistent/attacca.toml");
    let _g2 = EnvGuard::set("ATTACCA__RESOLVER__API_BASE", "https://music.example/api");
    let _g3 = EnvGuard::set("ATTACCA__PLAYER__PREVIEW_LOOP_MAX_SECS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.resolver.api_base, "https://music.example/api");
    assert_eq!(s.player.preview_loop_max_secs, 40.0);
    // Untouched sections keep their defaults.
    assert_eq!(s.resolver.settle_ms, 150);
}
