/**
 * VESC Node Binary
 *
 * Runs the dual-controller flywheel drive:
 * 1. Opens both VESC serial links (reconnecting as needed)
 * 2. Accepts speed/trigger commands from a stdin console
 * 3. Ramps and transmits commands at the configured tick rate
 *
 * Usage: vesc_node <port1> <port2> [--config drive.toml] [--baud N]
 */

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow as ah;
use clap::Parser;

use vesc_drive::config::{DriveConfig, SharedCalibration};
use vesc_drive::pubsub::{Topic, TopicRegistry};
use vesc_drive::vesc::{
    stop_handler, DrivePorts, SerialLink, VescHandler, DUTY_CYCLE_CMD_TOPIC, READY_TOPIC,
    RPM_CMD_TOPIC, TRIGGER_TOPIC, VELOCITY_CMD_TOPIC,
};

#[derive(Parser)]
#[command(about = "Dual-VESC flywheel drive controller")]
struct Args {
    /// Serial device of the first controller
    port1: String,

    /// Serial device of the second controller
    port2: String,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured baud rate
    #[arg(long)]
    baud: Option<u32>,
}

fn main() -> ah::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DriveConfig::load(path)?,
        None => DriveConfig::default(),
    };
    if let Some(baud) = args.baud {
        config.baud_rate = baud;
    }

    println!("==============================================");
    println!("  VESC Flywheel Drive");
    println!("==============================================");
    println!("  Port 1: {}", args.port1);
    println!("  Port 2: {}", args.port2);
    println!("  Baud:   {}", config.baud_rate);
    println!("  Rate:   {} Hz", config.rate);
    println!("==============================================\n");

    let registry = Arc::new(TopicRegistry::new());
    let calibration = SharedCalibration::new(config.calibration);
    let ports = DrivePorts::new(
        SerialLink::new(&args.port1, config.baud_rate),
        SerialLink::new(&args.port2, config.baud_rate),
    );

    let handler = VescHandler::new(config, calibration, ports, &registry);
    let (handle, running) = handler.start();

    let duty_cmds: Arc<Topic<f64>> = registry.get_or_create(DUTY_CYCLE_CMD_TOPIC, 32);
    let rpm_cmds: Arc<Topic<f64>> = registry.get_or_create(RPM_CMD_TOPIC, 32);
    let velocity_cmds: Arc<Topic<f64>> = registry.get_or_create(VELOCITY_CMD_TOPIC, 32);
    let triggers: Arc<Topic<()>> = registry.get_or_create(TRIGGER_TOPIC, 32);
    let ready: Arc<Topic<bool>> = registry.get_or_create(READY_TOPIC, 32);

    println!("[Commands]");
    println!("  d <pct>   - duty cycle command (percent)");
    println!("  r <rpm>   - RPM command");
    println!("  v <m/s>   - velocity command");
    println!("  t         - trigger pulse");
    println!("  ready     - show readiness");
    println!("  x         - exit\n");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }

        let mut parts = input.trim().split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let value: Option<f64> = parts.next().and_then(|s| s.parse().ok());

        match (cmd, value) {
            ("d", Some(pct)) => {
                duty_cmds.publish(pct);
                println!("[DUTY {pct}%]");
            }
            ("r", Some(rpm)) => {
                rpm_cmds.publish(rpm);
                println!("[RPM {rpm}]");
            }
            ("v", Some(mps)) => {
                velocity_cmds.publish(mps);
                println!("[VEL {mps} m/s]");
            }
            ("t", None) => {
                triggers.publish(());
                println!("[TRIGGER]");
            }
            ("ready", None) => {
                let at_setpoint = ready.peek_latest().map(|(r, _)| r).unwrap_or(false);
                println!("[READY {at_setpoint}]");
            }
            ("x", None) | ("exit", None) | ("quit", None) => {
                println!("[SHUTDOWN]");
                break;
            }
            ("", None) => {}
            _ => println!("Unknown command: {}", input.trim()),
        }
    }

    stop_handler(&running);
    let _ = handle.join();
    println!("Goodbye!");

    Ok(())
}
