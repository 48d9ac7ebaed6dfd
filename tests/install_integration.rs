//! End-to-end installation tests against directory and zip package stores

mod common;

use common::{TestEnv, assetboot_cmd, sevenz_bytes, write_zip};
use predicates::prelude::*;

#[test]
fn test_first_install_copies_assets_and_records_revision() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev42\n");
    env.write_entry("readme.txt", "read me");
    env.write_entry("data.bin", [0u8, 1, 2, 255]);

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed"))
        .stdout(predicate::str::contains("revision rev42"));

    assert_eq!(env.read_installed("readme.txt"), "read me");
    assert_eq!(std::fs::read(env.installed("data.bin")).unwrap(), [0u8, 1, 2, 255]);
    assert_eq!(env.marker().as_deref(), Some("rev42"));
    assert!(!env.installed("version.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_full_bundle_with_7z_payload() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev42\n");
    env.write_entry("map.txt", "libfoo.so native_libfoo.so\n");
    env.write_entry(
        "payload.7z",
        sevenz_bytes(&[
            ("lib/plugin.dat", b"plugin".as_slice()),
            ("defaults.lua", b"return {}".as_slice()),
        ]),
    );
    env.write_entry("readme.txt", "read me");
    env.write_native("native_libfoo.so", "elf");

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("revision rev42"));

    assert_eq!(env.marker().as_deref(), Some("rev42"));
    assert_eq!(
        std::fs::read_link(env.installed("libfoo.so")).unwrap(),
        env.native_dir().join("native_libfoo.so")
    );
    assert_eq!(env.read_installed("lib/plugin.dat"), "plugin");
    assert_eq!(env.read_installed("defaults.lua"), "return {}");
    assert_eq!(env.read_installed("readme.txt"), "read me");
    assert!(!env.installed("payload.7z").exists());
    assert!(!env.installed("map.txt").exists());

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date."));
}

#[test]
fn test_second_install_is_a_no_op() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev42");
    env.write_entry("readme.txt", "read me");

    env.cmd().args(["install", "--no-progress"]).assert().success();
    std::fs::remove_file(env.installed("readme.txt")).unwrap();

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date."));

    assert!(!env.installed("readme.txt").exists());
}

#[test]
fn test_new_revision_reinstalls() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev1");
    env.write_entry("readme.txt", "old");
    env.cmd().args(["install", "--no-progress"]).assert().success();

    env.write_entry("version.txt", "rev2");
    env.write_entry("readme.txt", "new");
    env.cmd().args(["install", "--no-progress"]).assert().success();

    assert_eq!(env.read_installed("readme.txt"), "new");
    assert_eq!(env.marker().as_deref(), Some("rev2"));
}

#[test]
fn test_force_reinstalls_same_revision() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev1");
    env.write_entry("readme.txt", "read me");
    env.cmd().args(["install", "--no-progress"]).assert().success();
    std::fs::remove_file(env.installed("readme.txt")).unwrap();

    env.cmd()
        .args(["install", "--no-progress", "--force"])
        .assert()
        .success();

    assert!(env.installed("readme.txt").exists());
}

#[test]
fn test_corrupt_archive_fails_and_keeps_marker() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev2");
    env.write_entry("payload.7z", "definitely not a 7z stream");
    std::fs::create_dir_all(env.install_dir()).unwrap();
    std::fs::write(env.installed("INSTALLED_VERSION"), "rev1").unwrap();

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Installation aborted"))
        .stderr(predicate::str::contains("payload.7z"));

    assert_eq!(env.marker().as_deref(), Some("rev1"));
}

#[test]
#[cfg(unix)]
fn test_symlink_map_links_native_files() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev42");
    env.write_entry("map.txt", "libfoo.so native_libfoo.so\nlibbar.so missing.so\n");
    env.write_native("native_libfoo.so", "elf");

    env.cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning:"))
        .stdout(predicate::str::contains("missing.so"));

    assert_eq!(
        std::fs::read_link(env.installed("libfoo.so")).unwrap(),
        env.native_dir().join("native_libfoo.so")
    );
    assert!(!env.installed("libbar.so").exists());
    assert_eq!(env.marker().as_deref(), Some("rev42"));
}

#[test]
fn test_copy_symlink_mode_from_config() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev1");
    env.write_entry("map.txt", "libfoo.so native_libfoo.so\n");
    env.write_native("native_libfoo.so", "elf");
    let config = env.write_file("assetboot.yaml", "symlinks: copy\n");

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["install", "--no-progress"])
        .assert()
        .success();

    let link = env.installed("libfoo.so");
    assert!(!std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(env.read_installed("libfoo.so"), "elf");
}

#[test]
fn test_zip_archive_entry_with_zip_decoder() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev3");
    write_zip(
        &env.store_dir().join("module/fonts.zip"),
        &[("fonts/serif.ttf", b"serif".as_slice())],
    );
    let config = env.write_file(
        "assetboot.yaml",
        "archives:\n  - suffix: .7z\n    decoder: sevenzip\n  - suffix: .zip\n    decoder: zip\n",
    );

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["install", "--no-progress"])
        .assert()
        .success();

    assert_eq!(env.read_installed("fonts/serif.ttf"), "serif");
    assert!(!env.installed("fonts.zip").exists());
}

#[test]
fn test_install_from_zip_package() {
    let env = TestEnv::new();
    let package = env.path("package.apk");
    write_zip(
        &package,
        &[
            ("module/version.txt", b"rev9".as_slice()),
            ("module/readme.txt", b"from the package".as_slice()),
            ("classes.dex", b"ignored".as_slice()),
        ],
    );

    assetboot_cmd()
        .arg("--store")
        .arg(&package)
        .arg("--install-dir")
        .arg(env.install_dir())
        .arg("--native-dir")
        .arg(env.native_dir())
        .args(["install", "--no-progress"])
        .assert()
        .success();

    assert_eq!(env.read_installed("readme.txt"), "from the package");
    assert!(!env.installed("classes.dex").exists());
    assert_eq!(env.marker().as_deref(), Some("rev9"));
}

#[test]
fn test_store_from_environment() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev5");

    assetboot_cmd()
        .env("ASSETBOOT_STORE", env.store_dir())
        .env("ASSETBOOT_INSTALL_DIR", env.install_dir())
        .env("ASSETBOOT_NATIVE_DIR", env.native_dir())
        .args(["install", "--no-progress"])
        .assert()
        .success();

    assert_eq!(env.marker().as_deref(), Some("rev5"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let env = TestEnv::new();
    env.write_entry("version.txt", "rev1");
    env.write_entry("map.txt", "a b\n");
    env.write_entry("payload.7z", "bytes");
    env.write_entry("readme.txt", "read me");

    env.cmd()
        .args(["install", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would install into"))
        .stdout(predicate::str::contains("archive"))
        .stdout(predicate::str::contains("payload.7z"))
        .stdout(predicate::str::contains("symlink map"));

    assert!(!env.install_dir().exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let env = TestEnv::new();
    let config = env.write_file("assetboot.yaml", "unknown_key: true\n");

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));

    assert!(!env.install_dir().exists());
}
