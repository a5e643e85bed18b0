//! Control loop
//!
//! Single logical control thread: per tick it reads the newest frame
//! from the mailbox, runs detection on every Nth frame, feeds the
//! openness sample through the tracker and the escalation machine, and
//! pushes any resulting command over the actuator link. Everything in a
//! tick is synchronous; the only wait is the bounded pause until the
//! next poll.

use crate::config::MonitorConfig;
use crate::detector::{select_driver_face, LandmarkDetector};
use crate::report::TickReport;
use actuator_link::{ActuatorCommand, ActuatorLink};
use camera_capture::{FrameMailbox, VideoFrame};
use escalation::{
    AlertStage, ClosurePolicy, ClosurePolicyKind, DurationPolicy, EscalationError,
    EscalationMachine, FrameCountPolicy, RunValue,
};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

/// Discrete operator inputs. Debouncing is the host's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSignal {
    /// Arm monitoring and actuation
    Arm,
    /// Shut the loop down
    Quit,
}

/// Drowsiness monitoring control loop.
pub struct MonitorLoop<D: LandmarkDetector> {
    detector: D,
    policy: Box<dyn ClosurePolicy>,
    machine: EscalationMachine,
    link: ActuatorLink,
    armed: bool,
    tick_counter: u64,
    process_every: u64,
    poll_interval: Duration,
    last_openness: Option<f32>,
    last_run: Option<RunValue>,
}

impl<D: LandmarkDetector> MonitorLoop<D> {
    pub fn new(
        config: &MonitorConfig,
        detector: D,
        link: ActuatorLink,
    ) -> Result<Self, EscalationError> {
        config.escalation.validate()?;

        let policy: Box<dyn ClosurePolicy> = match config.escalation.policy {
            ClosurePolicyKind::FrameCount => {
                Box::new(FrameCountPolicy::new(config.escalation.openness_threshold))
            }
            ClosurePolicyKind::Duration => {
                Box::new(DurationPolicy::new(config.escalation.openness_threshold))
            }
        };

        Ok(Self {
            detector,
            policy,
            machine: EscalationMachine::new(config.escalation.clone()),
            link,
            armed: false,
            tick_counter: 0,
            process_every: config.process_every.max(1) as u64,
            poll_interval: Duration::from_millis((1000 / config.camera.fps.max(1) as u64).max(1)),
            last_openness: None,
            last_run: None,
        })
    }

    /// Run until a quit signal arrives or the operator channel closes.
    pub async fn run(
        &mut self,
        mailbox: &FrameMailbox,
        mut signals: mpsc::Receiver<OperatorSignal>,
        reports: mpsc::Sender<TickReport>,
    ) {
        info!("control loop started, press 's' to arm");
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            poll.tick().await;

            loop {
                match signals.try_recv() {
                    Ok(OperatorSignal::Arm) => self.arm().await,
                    Ok(OperatorSignal::Quit) => {
                        info!("quit signal received, control loop stopping");
                        return;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        info!("operator channel closed, control loop stopping");
                        return;
                    }
                }
            }

            let report = self.tick(mailbox.read()).await;
            // Display sink backpressure never stalls the loop
            let _ = reports.try_send(report);
        }
    }

    /// Flip the armed gate. Idempotent: consecutive arm signals emit the
    /// armed-start command exactly once.
    pub async fn arm(&mut self) {
        if self.armed {
            debug!("arm signal while already armed, ignoring");
            return;
        }
        self.armed = true;
        info!("system armed, monitoring active");
        self.send_best_effort(ActuatorCommand::ArmedStart).await;
    }

    /// Process one tick. A missing frame is a no-op, never an error.
    pub async fn tick(&mut self, frame: Option<VideoFrame>) -> TickReport {
        if !self.armed {
            return TickReport::disarmed(frame.map(|f| f.sequence));
        }

        let Some(frame) = frame else {
            // Mailbox not yet populated, retry next cycle
            return self.report(None);
        };

        self.tick_counter += 1;
        if self.tick_counter % self.process_every != 0 {
            // Skipped frames pass through to the display unchanged
            return self.report(Some(frame.sequence));
        }

        let reduced = frame.half_resolution();
        let faces = self.detector.detect(&reduced);
        let Some(face) = select_driver_face(&faces) else {
            return self.report(Some(frame.sequence));
        };

        let openness = match face.landmarks.openness() {
            Ok(v) => v,
            Err(e) => {
                // Degenerate geometry: no usable sample this tick, the
                // tracker state is left untouched
                debug!("openness metric unavailable: {}", e);
                return self.report(Some(frame.sequence));
            }
        };

        let closure = self.policy.advance(openness, Instant::now());
        self.last_openness = Some(openness);
        self.last_run = Some(closure.run);

        if let Some(command) = self.machine.update(&closure) {
            self.send_best_effort(command).await;
        }

        self.report(Some(frame.sequence))
    }

    /// Fire-and-forget write; a failure is logged and the tick goes on.
    async fn send_best_effort(&mut self, command: ActuatorCommand) {
        if let Err(e) = self.link.send(command).await {
            warn!("actuator write dropped ({}): {}", command.description(), e);
        }
    }

    fn report(&self, frame_sequence: Option<u64>) -> TickReport {
        TickReport {
            armed: self.armed,
            stage: self.machine.stage(),
            openness: self.last_openness,
            run: self.last_run,
            episode_count: self.machine.episode_count(),
            frame_sequence,
        }
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn stage(&self) -> AlertStage {
        self.machine.stage()
    }

    pub fn episode_count(&self) -> u32 {
        self.machine.episode_count()
    }

    pub fn link(&self) -> &ActuatorLink {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut ActuatorLink {
        &mut self.link
    }
}
