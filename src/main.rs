use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;

use screenframe::config::{load_config, load_config_from};
use screenframe::host::SnapshotHost;
use screenframe::{FrameSize, ScreenFrame, WatcherState, VERSION};

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    raw: bool,
    watch: bool,
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Help,
    Version,
    Run(CliArgs),
}

fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-v" | "--version" => return Ok(CliCommand::Version),
            "-c" | "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                cli.config = Some(PathBuf::from(path));
            }
            "-s" | "--snapshot" => {
                let path = iter.next().ok_or("--snapshot requires a path")?;
                cli.snapshot = Some(PathBuf::from(path));
            }
            "--raw" => cli.raw = true,
            "--watch" => cli.watch = true,
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(CliCommand::Run(cli))
}

fn print_help() {
    println!(
        "screenframe {}
Report the available screen frame (top, right, bottom, left insets)

USAGE:
    screenframe [OPTIONS]

OPTIONS:
    -s, --snapshot <PATH>   JSON screen snapshot to read from
    -c, --config <PATH>     Config file (default ~/.config/screenframe/config.toml)
        --raw               Print the frame without rounding
        --watch             Keep watching and print the frame every interval
    -h, --help              Print this help message
    -v, --version           Print version information

ENVIRONMENT:
    RUST_LOG         Set log level (error, warn, info, debug, trace)

EXAMPLES:
    screenframe -s screen.json
    RUST_LOG=debug screenframe -s screen.json --watch",
        VERSION
    );
}

/// Logs go to stderr so `--watch` output on stdout stays plain JSON lines.
/// Each line names its thread, which tells watcher checks apart from reads.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            use std::io::Write;
            let thread = std::thread::current();
            writeln!(
                buf,
                "[{} {:>5} {} {}] {}",
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                thread.name().unwrap_or("-"),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn read_frame(frame: &ScreenFrame<SnapshotHost>, raw: bool) -> FrameSize {
    if raw {
        pollster::block_on(frame.available_frame())
    } else {
        pollster::block_on(frame.rounded_available_frame())
    }
}

fn print_frame(frame: &FrameSize) {
    match serde_json::to_string(frame) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode frame: {}", e),
    }
}

/// Prints the frame once per watch interval until Ctrl-C.
fn run_watch(frame: &ScreenFrame<SnapshotHost>, raw: bool) {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    }) {
        log::warn!("Failed to install signal handler: {}", e);
    }

    frame.watch();
    let interval = frame.options().watch_interval;

    loop {
        print_frame(&read_frame(frame, raw));
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    frame.stop_watching();
    match frame.backup() {
        Some(backup) => log::info!("Backup frame at exit: {}", backup),
        None => log::info!("No backup frame was captured"),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let cli = match parse_args(&args) {
        Ok(CliCommand::Help) => {
            print_help();
            return;
        }
        Ok(CliCommand::Version) => {
            println!("screenframe {}", VERSION);
            return;
        }
        Ok(CliCommand::Run(cli)) => cli,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Try 'screenframe --help' for more information.");
            std::process::exit(1);
        }
    };

    init_logging();

    let config = match cli.config {
        Some(ref path) => load_config_from(path),
        None => load_config(),
    };

    let Some(snapshot) = cli.snapshot.clone().or_else(|| config.host.snapshot.clone()) else {
        eprintln!(
            "No screen snapshot given. Pass --snapshot <PATH> or set host.snapshot in the config."
        );
        std::process::exit(1);
    };

    log::info!("Reading screen from {:?}", snapshot);
    let frame = ScreenFrame::with_state(
        Arc::new(SnapshotHost::new(snapshot)),
        Arc::new(WatcherState::new()),
        config.frame_options(),
    );

    if cli.watch {
        run_watch(&frame, cli.raw);
    } else {
        print_frame(&read_frame(&frame, cli.raw));
    }
}
