use avrsim_core::common::RegPair;
use avrsim_core::common::constants::SREG_ADDR;
use avrsim_core::{FirmwareImage, Mcu, device};
use tracing_subscriber::filter::LevelFilter;

use super::builder::ProgramBuilder;

/// Routes library logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::DEBUG)
        .try_init();
}

pub struct TestContext {
    pub mcu: Mcu,
}

impl TestContext {
    /// Loads `program` at address 0 of the default device.
    pub fn new(program: ProgramBuilder) -> Self {
        Self::on(device::DEFAULT_DEVICE, program.image())
    }

    /// Loads `image` on the named built-in device.
    pub fn on(device_name: &str, image: FirmwareImage) -> Self {
        init_tracing();
        let device = device::lookup(device_name).expect("built-in device");
        let mcu = Mcu::new(&device, &image).expect("core construction");
        Self { mcu }
    }

    /// Executes one instruction, failing the test on a fatal error.
    pub fn step(&mut self) -> u8 {
        self.mcu.step().expect("step")
    }

    /// Executes `n` instructions and returns the summed cycle cost.
    pub fn run(&mut self, n: usize) -> u64 {
        (0..n).map(|_| u64::from(self.step())).sum()
    }

    pub fn reg(&self, r: usize) -> u8 {
        self.mcu.data()[r]
    }

    pub fn set_reg(&mut self, r: usize, val: u8) {
        self.mcu.data_mut()[r] = val;
    }

    pub fn mem(&self, addr: usize) -> u8 {
        self.mcu.data()[addr]
    }

    pub fn y(&self) -> u16 {
        self.mcu.pair(RegPair::Y)
    }

    pub fn sreg(&self) -> u8 {
        self.mcu.data()[usize::from(SREG_ADDR)]
    }
}
