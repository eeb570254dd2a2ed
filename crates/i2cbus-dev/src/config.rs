use std::path::PathBuf;

/// Where and how to open a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusConfig {
    /// Bus number `n` of `/dev/i2c-<n>`. Default: 0.
    pub bus: u32,
    /// Extra `open(2)` flags OR'd with `O_RDWR` (e.g. `O_NONBLOCK`). Default: none.
    pub extra_flags: i32,
}

impl BusConfig {
    pub fn new(bus: u32) -> Self {
        Self {
            bus,
            ..Self::default()
        }
    }

    pub fn device_path(&self) -> PathBuf {
        device_path(self.bus)
    }
}

/// Device node for bus `n`: `/dev/i2c-<n>`.
pub fn device_path(bus: u32) -> PathBuf {
    PathBuf::from(format!("/dev/i2c-{bus}"))
}
