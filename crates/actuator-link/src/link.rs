//! Serial link to the alert controller

use crate::{ActuatorCommand, ActuatorError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info};

/// Controller firmware resets when the serial port opens; give it time
/// to come back up before the first command.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

enum Transport {
    Serial(SerialStream),
    Mock {
        sent: Vec<ActuatorCommand>,
        fail_writes: bool,
    },
}

/// One-way command channel to the alert controller.
///
/// Accessed only from the control thread; no locking.
pub struct ActuatorLink {
    device: String,
    transport: Transport,
}

impl ActuatorLink {
    /// Open the serial device and wait out the firmware reset.
    pub async fn open(device: &str, baud_rate: u32) -> Result<Self, ActuatorError> {
        info!("opening actuator link on {} at {} baud", device, baud_rate);
        let port = tokio_serial::new(device, baud_rate)
            .open_native_async()
            .map_err(|e| ActuatorError::Open(e.to_string()))?;

        tokio::time::sleep(SETTLE_DELAY).await;
        info!("actuator link ready");

        Ok(Self {
            device: device.to_string(),
            transport: Transport::Serial(port),
        })
    }

    /// Mock link for tests: records sent commands, no hardware.
    pub fn mock() -> Self {
        Self {
            device: "mock".to_string(),
            transport: Transport::Mock {
                sent: Vec::new(),
                fail_writes: false,
            },
        }
    }

    /// Send one command byte, fire-and-forget.
    ///
    /// No acknowledgment is read back and a failure is not retried;
    /// the caller logs it and keeps going.
    pub async fn send(&mut self, command: ActuatorCommand) -> Result<(), ActuatorError> {
        debug!(
            "actuator <- {:?} (0x{:02X}, {})",
            command,
            command.to_byte(),
            command.description()
        );
        match &mut self.transport {
            Transport::Serial(port) => {
                port.write_all(&[command.to_byte()]).await?;
                Ok(())
            }
            Transport::Mock { sent, fail_writes } => {
                if *fail_writes {
                    return Err(ActuatorError::WriteFailed("forced mock failure".into()));
                }
                sent.push(command);
                Ok(())
            }
        }
    }

    /// Device path this link was opened on.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Commands recorded by a mock link (empty for a real link).
    pub fn sent_commands(&self) -> &[ActuatorCommand] {
        match &self.transport {
            Transport::Mock { sent, .. } => sent,
            Transport::Serial(_) => &[],
        }
    }

    /// Force every subsequent mock write to fail (test hook).
    pub fn set_fail_writes(&mut self, fail: bool) {
        if let Transport::Mock { fail_writes, .. } = &mut self.transport {
            *fail_writes = fail;
        }
    }
}
