/**
 * VESC Handler
 *
 * Main control loop that:
 * 1. Drains command/trigger events from the topic layer
 * 2. Arbitrates between duty cycle, RPM and velocity commands
 * 3. Enforces the command timeout and post-trigger cooldown
 * 4. Ramps the commanded value and writes it to both controllers
 * 5. Publishes flywheel readiness once per tick
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info};

use crate::config::{DriveConfig, SharedCalibration};
use crate::pubsub::{Topic, TopicRegistry};

use super::calibration::{duty_cycle_wire_value, rpm_wire_value, velocity_to_rpm};
use super::ports::{DriveLink, DrivePorts};
use super::protocol::VescCommand;
use super::ramp::Ramp;

pub const DUTY_CYCLE_CMD_TOPIC: &str = "/vesc/duty_cycle_cmd";
pub const RPM_CMD_TOPIC: &str = "/vesc/rpm_cmd";
pub const VELOCITY_CMD_TOPIC: &str = "/vesc/velocity_cmd";
pub const TRIGGER_TOPIC: &str = "/vesc/trigger";
pub const READY_TOPIC: &str = "/vesc/ready";

const CMD_TOPIC_DEPTH: usize = 32;

/// The active command mode. Exactly one is in force at a time; transitions
/// happen on an incoming command event or when timeout/cooldown expiry
/// forces `NoCommand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    NoCommand,
    DutyCycle,
    Rpm,
}

/// Kind of an incoming speed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    DutyCycle,
    Rpm,
    Velocity,
}

pub struct VescHandler<L: DriveLink> {
    config: DriveConfig,
    calibration: SharedCalibration,
    ports: DrivePorts<L>,

    //inbound command topics
    duty_cycle_cmds: Arc<Topic<f64>>,
    rpm_cmds: Arc<Topic<f64>>,
    velocity_cmds: Arc<Topic<f64>>,
    triggers: Arc<Topic<()>>,
    //outbound readiness
    ready: Arc<Topic<bool>>,

    running: Arc<AtomicBool>,

    //command state
    mode: CommandMode,
    last_command_time: Instant,

    //motor state
    at_setpoint: bool,
    cooling_down: bool,
    trigger_time: Instant,

    rpm: Ramp,
    duty_cycle: Ramp,
}

impl<L: DriveLink> VescHandler<L> {
    pub fn new(
        config: DriveConfig,
        calibration: SharedCalibration,
        ports: DrivePorts<L>,
        registry: &TopicRegistry,
    ) -> Self {
        let now = Instant::now();
        VescHandler {
            duty_cycle_cmds: registry.get_or_create(DUTY_CYCLE_CMD_TOPIC, CMD_TOPIC_DEPTH),
            rpm_cmds: registry.get_or_create(RPM_CMD_TOPIC, CMD_TOPIC_DEPTH),
            velocity_cmds: registry.get_or_create(VELOCITY_CMD_TOPIC, CMD_TOPIC_DEPTH),
            triggers: registry.get_or_create(TRIGGER_TOPIC, CMD_TOPIC_DEPTH),
            ready: registry.get_or_create(READY_TOPIC, CMD_TOPIC_DEPTH),
            config,
            calibration,
            ports,
            running: Arc::new(AtomicBool::new(false)),
            mode: CommandMode::NoCommand,
            last_command_time: now,
            at_setpoint: false,
            cooling_down: false,
            trigger_time: now,
            rpm: Ramp::default(),
            duty_cycle: Ramp::default(),
        }
    }

    pub fn mode(&self) -> CommandMode {
        self.mode
    }

    pub fn at_setpoint(&self) -> bool {
        self.at_setpoint
    }

    pub fn cooling_down(&self) -> bool {
        self.cooling_down
    }

    /// Accept a speed command. The value is clamped, never rejected.
    ///
    /// Duty cycle commands continue the ramp from the present command
    /// value; RPM and velocity commands restart the ramp from zero. Any
    /// accepted command cancels a pending cooldown and resets the
    /// command timeout clock.
    pub fn submit(&mut self, kind: CommandKind, value: f64, now: Instant) {
        match kind {
            CommandKind::DutyCycle => {
                let target = value.min(100.0);
                self.duty_cycle.retarget_from_current(target);
                self.mode = CommandMode::DutyCycle;
                self.rpm.target = 0.0;
                info!("received duty cycle command: {}%", target);
            }
            CommandKind::Rpm => {
                let target = value.min(self.config.max_rpm);
                self.rpm.retarget_from_zero(target);
                self.mode = CommandMode::Rpm;
                self.duty_cycle.target = 0.0;
                info!("received RPM command: {} rpm", target);
            }
            CommandKind::Velocity => {
                let target = velocity_to_rpm(value, self.config.wheel_radius, self.config.max_rpm);
                self.rpm.retarget_from_zero(target);
                self.mode = CommandMode::Rpm;
                self.duty_cycle.target = 0.0;
                info!("received velocity command: {:.4} m/s", value);
            }
        }
        self.last_command_time = now;
        self.cooling_down = false; //a new command supersedes a pending shutdown
    }

    /// Record a trigger pulse. Ignored unless a command is active and no
    /// cooldown is already running.
    pub fn trigger(&mut self, now: Instant) {
        if self.mode != CommandMode::NoCommand && !self.cooling_down {
            self.cooling_down = true;
            self.trigger_time = now;
            self.last_command_time = now; //keep the timeout from firing mid-cooldown
            debug!("received trigger signal, starting cooldown timer");
        }
    }

    /// One control cycle. Events that arrived since the last tick are
    /// applied first, stamped with this tick's time.
    pub fn tick(&mut self, now: Instant) {
        self.drain_events(now);

        //if a serial port is not open, attempt to reconnect
        self.ports.reconnect();

        if self.mode != CommandMode::NoCommand {
            let since_command = now.duration_since(self.last_command_time).as_secs_f64();
            let since_trigger = now.duration_since(self.trigger_time).as_secs_f64();

            if since_command > self.config.command_timeout {
                //command has timed out, shut down motor
                self.shutdown_motor();
            } else if self.cooling_down && since_trigger > self.config.cooldown_time {
                //projectile has been launched, shut down motor
                self.shutdown_motor();
                debug!("cooled down after trigger");
            } else {
                let active = match self.mode {
                    CommandMode::DutyCycle => &self.duty_cycle,
                    _ => &self.rpm,
                };
                self.at_setpoint = since_command > self.config.ramp_time && active.at_target();

                match self.mode {
                    CommandMode::DutyCycle => self.send_duty_cycle(since_command),
                    CommandMode::Rpm => self.send_rpm(since_command),
                    CommandMode::NoCommand => {}
                }
            }
        }

        //report status
        self.ready.publish(self.at_setpoint);
    }

    fn drain_events(&mut self, now: Instant) {
        while let Some(value) = self.duty_cycle_cmds.try_receive() {
            self.submit(CommandKind::DutyCycle, value, now);
        }
        while let Some(value) = self.rpm_cmds.try_receive() {
            self.submit(CommandKind::Rpm, value, now);
        }
        while let Some(value) = self.velocity_cmds.try_receive() {
            self.submit(CommandKind::Velocity, value, now);
        }
        //triggers after commands: a command arriving in the same tick
        //still arms the cooldown
        while self.triggers.try_receive().is_some() {
            self.trigger(now);
        }
    }

    fn shutdown_motor(&mut self) {
        self.at_setpoint = false;
        self.cooling_down = false;
        self.mode = CommandMode::NoCommand;
        self.rpm.target = 0.0;
        self.rpm.current = 0.0;
    }

    fn send_duty_cycle(&mut self, since_command: f64) {
        //fail-together: no frame goes out unless both channels are up
        if !self.ports.both_open() {
            return;
        }

        self.duty_cycle
            .advance(since_command, self.config.duty_cycle_accel);

        debug!("sending duty cycle command = {}", self.duty_cycle.current);
        let frame = VescCommand::SetDutyCycle(duty_cycle_wire_value(self.duty_cycle.current)).encode();
        self.ports.write_both(&frame);
    }

    fn send_rpm(&mut self, since_command: f64) {
        //calibration snapshot is taken at encode time so parameter
        //updates apply on the next tick without restart
        let cal = self.calibration.snapshot();

        if !self.ports.both_open() {
            return;
        }

        self.rpm.advance(since_command, self.config.rpm_accel);

        debug!("sending RPM command = {}", self.rpm.current);
        let frame = VescCommand::SetRpm(rpm_wire_value(&cal, self.rpm.current)).encode();
        self.ports.write_both(&frame);
    }

    /// Run the control loop on the current thread until stopped.
    pub fn run(&mut self) {
        let period = self.config.tick_period();
        self.running.store(true, Ordering::SeqCst);

        while self.running.load(Ordering::SeqCst) {
            let start = Instant::now();
            self.tick(start);

            let elapsed = start.elapsed();
            if elapsed < period {
                thread::sleep(period - elapsed);
            }
        }
    }

    /// Spawn the control loop on a background thread.
    pub fn start(mut self) -> (JoinHandle<()>, Arc<AtomicBool>)
    where
        L: Send + 'static,
    {
        let running = Arc::clone(&self.running);
        self.running.store(true, Ordering::SeqCst);

        let handle = thread::spawn(move || {
            self.run();
        });

        (handle, running)
    }
}

pub fn stop_handler(running: &Arc<AtomicBool>) {
    running.store(false, Ordering::SeqCst);
}
