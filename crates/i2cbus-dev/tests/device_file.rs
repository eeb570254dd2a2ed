#![cfg(target_os = "linux")]

use std::io;
use std::os::fd::AsRawFd;
use std::path::PathBuf;

use i2cbus_dev::{BusConfig, BusError, DeviceFile, I2cBus};
use i2cbus_msg::{read, read_into, write};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "i2cbus-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// A regular file opened as a bus: every i2c ioctl fails with ENOTTY.
fn fake_node(tag: &str) -> (PathBuf, PathBuf) {
    let dir = unique_temp_dir(tag);
    let node = dir.join("i2c-fake");
    std::fs::write(&node, b"").expect("fake node should be writable");
    (dir, node)
}

#[test]
fn open_missing_node_reports_path_and_os_error() {
    let dir = unique_temp_dir("missing");
    let node = dir.join("i2c-404");

    let err = I2cBus::open_path(&node, 0).unwrap_err();
    match &err {
        BusError::Open { path, source } => {
            assert_eq!(path, &node);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.raw_os_error(), Some(libc::ENOENT));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn open_with_config_uses_dev_naming() {
    let config = BusConfig {
        bus: 4_000_000,
        extra_flags: 0,
    };
    let err = I2cBus::open_with(&config).unwrap_err();
    match err {
        BusError::Open { path, .. } => assert_eq!(path, PathBuf::from("/dev/i2c-4000000")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn transaction_on_non_i2c_node_fails_with_os_error() {
    let (dir, node) = fake_node("enotty");

    let mut bus = I2cBus::open_path(&node, libc::O_NONBLOCK).expect("fake node should open");
    assert_eq!(bus.path(), node.as_path());
    assert!(bus.as_raw_fd() >= 0);

    let mut buf = [0xA5u8; 2];
    let err = bus
        .transaction(&mut [write(0x20, [0x01]), read_into(0x20, &mut buf)])
        .unwrap_err();
    assert!(matches!(err, BusError::Transfer(_)));
    assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));
    assert_eq!(buf, [0xA5, 0xA5], "failed transfer must not touch buffers");

    let err = bus.functionality().unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));

    bus.close();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failure_is_repeatable() {
    let (dir, node) = fake_node("repeat");
    let mut bus = I2cBus::open_path(&node, 0).expect("fake node should open");

    for _ in 0..5 {
        let err = bus.transaction(&mut [read(0x48, 2)]).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));
    }

    drop(bus);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn dropping_bus_releases_descriptor() {
    let (dir, node) = fake_node("drop");
    let node = std::fs::canonicalize(&node).expect("fake node should resolve");
    let bus = I2cBus::open_path(&node, 0).expect("fake node should open");
    let fd = bus.as_raw_fd();
    let proc_fd = PathBuf::from(format!("/proc/self/fd/{fd}"));
    assert_eq!(std::fs::read_link(&proc_fd).ok().as_deref(), Some(node.as_path()));

    drop(bus);
    let reopened = std::fs::read_link(&proc_fd).ok();
    assert_ne!(reopened.as_deref(), Some(node.as_path()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn device_file_wraps_existing_descriptor() {
    let (dir, node) = fake_node("from-fd");
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&node)
        .expect("fake node should open");

    let device = DeviceFile::from_fd(file.into(), &node);
    let mut bus = I2cBus::with_adapter(device);
    let err = bus.transaction(&mut [read(0x50, 1)]).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));

    let _ = std::fs::remove_dir_all(&dir);
}
