//! Drowsiness Monitor - Main Entry Point

use actuator_link::ActuatorLink;
use camera_capture::{FrameMailbox, SyntheticSource};
use monitor::{init_logging, MonitorConfig, MonitorLoop, OperatorSignal, StaticDetector, TickReport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    let config = MonitorConfig::load()?;
    debug!("configuration: {:?}", config);

    // Camera must open before any thread spawns; failure here is fatal
    let source = SyntheticSource::open(&config.camera)?;

    let link = match ActuatorLink::open(&config.actuator_device, config.actuator_baud).await {
        Ok(link) => link,
        Err(e) => {
            warn!("actuator link unavailable ({}), alerts are overlay-only", e);
            ActuatorLink::mock()
        }
    };

    let mut control = MonitorLoop::new(&config, StaticDetector::new(), link)?;
    let mut mailbox = FrameMailbox::spawn(source)?;

    let (signal_tx, signal_rx) = mpsc::channel(8);
    let (report_tx, mut report_rx) = mpsc::channel::<TickReport>(32);

    // Operator input: 's' arms, 'q' quits
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let signal = match line.trim() {
                "s" | "S" => OperatorSignal::Arm,
                "q" | "Q" => OperatorSignal::Quit,
                _ => continue,
            };
            if signal_tx.send(signal).await.is_err() {
                break;
            }
        }
    });

    // Display sink: overlay text to the log
    tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            for line in report.overlay_lines() {
                debug!("overlay: {}", line);
            }
        }
    });

    control.run(&mailbox, signal_rx, report_tx).await;

    // Join the acquisition thread before the source is released
    mailbox.stop();
    info!("shutdown complete");
    Ok(())
}
