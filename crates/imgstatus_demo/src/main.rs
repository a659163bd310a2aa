//! Simulated image load: a decode worker records progress on its own thread
//! while the control loop attaches consumers at different points of the load.
//!
//! Usage: `imgstatus_demo [--log-file PATH | --tee-log PATH] [settings.ron]`
//!
//! `--log-file` writes the log to PATH only, `--tee-log` to PATH and the terminal.

use std::cell::RefCell;
use std::ffi::OsString;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use imgstatus_logging::{initialize, status_info, status_warn, LogDestination};
use imgstatus_tracker::{
    ConsumerHandle, DecodeRecorder, FailureKind, FailureSink, ImageConsumer, ImageRect,
    ImageSize, Notification, StatusEvent, StatusTracker, TrackerSettings,
};
use log::LevelFilter;

const TICK: Duration = Duration::from_millis(20);

struct PrintingConsumer {
    name: &'static str,
    seen: RefCell<Vec<&'static str>>,
}

impl PrintingConsumer {
    fn new(name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            name,
            seen: RefCell::new(Vec::new()),
        })
    }
}

impl ImageConsumer for PrintingConsumer {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::StartContainer(Some(size)) => {
                status_info!("[{}] {} {}", self.name, notification.name(), size)
            }
            Notification::FrameUpdate(rect) => {
                status_info!("[{}] {} {}", self.name, notification.name(), rect)
            }
            Notification::StopDecode(Err(failure))
            | Notification::StopRequest {
                result: Err(failure),
                ..
            } => status_info!("[{}] {} failed: {}", self.name, notification.name(), failure),
            _ => status_info!("[{}] {}", self.name, notification.name()),
        }
        self.seen.borrow_mut().push(notification.name());
    }
}

struct LogFailures;

impl FailureSink for LogFailures {
    fn on_failure(&self, failure: &FailureKind) {
        status_warn!("load failed: {}", failure);
    }
}

fn decode_worker(recorder: DecodeRecorder) {
    let script = [
        StatusEvent::StartRequest,
        StatusEvent::BlockOnload,
        StatusEvent::StartContainer(ImageSize::new(640, 480)),
        StatusEvent::StartDecode,
        StatusEvent::DataAvailable(ImageRect::new(0, 0, 640, 240)),
        StatusEvent::DataAvailable(ImageRect::new(0, 240, 640, 240)),
        StatusEvent::StopFrame,
        StatusEvent::StopDecode(Ok(())),
        StatusEvent::UnblockOnload,
        StatusEvent::StopRequest {
            last_part: true,
            result: Ok(()),
        },
    ];
    for event in script {
        thread::sleep(TICK * 3);
        if !recorder.record(event) {
            return;
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    settings: Option<PathBuf>,
    log: LogDestination,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Options> {
    let mut options = Options {
        settings: None,
        log: LogDestination::Terminal,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--log-file" || arg == "--tee-log" {
            let Some(path) = args.next().map(PathBuf::from) else {
                bail!("{} needs a path", arg.to_string_lossy());
            };
            options.log = if arg == "--log-file" {
                LogDestination::File(path)
            } else {
                LogDestination::Both(path)
            };
        } else if options.settings.is_none() {
            options.settings = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument {}", arg.to_string_lossy());
        }
    }
    Ok(options)
}

fn load_settings(path: Option<&PathBuf>) -> Result<TrackerSettings> {
    match path {
        Some(path) => TrackerSettings::load(path)
            .with_context(|| format!("loading tracker settings from {}", path.display())),
        None => Ok(TrackerSettings::default()),
    }
}

fn main() -> Result<()> {
    let options = parse_args(std::env::args_os().skip(1))?;
    if !initialize(options.log.clone(), LevelFilter::Info) {
        initialize(LogDestination::Terminal, LevelFilter::Info);
        status_warn!("could not log to {:?}, using the terminal", options.log);
    }
    let settings = load_settings(options.settings.as_ref())?;
    status_info!("starting with {:?}", settings);

    let mut tracker = StatusTracker::with_settings(settings);
    tracker.set_failure_sink(Box::new(LogFailures));

    let early = PrintingConsumer::new("early");
    let late = PrintingConsumer::new("late");
    let snapshot = PrintingConsumer::new("snapshot");
    let early_handle: ConsumerHandle = early.clone();
    let late_handle: ConsumerHandle = late.clone();
    let snapshot_handle: ConsumerHandle = snapshot.clone();

    tracker.add_consumer(&early_handle);
    let worker = thread::spawn({
        let recorder = tracker.recorder();
        move || decode_worker(recorder)
    });

    let mut tick = 0u32;
    loop {
        tracker.process_recorded_events();

        match tick {
            8 => tracker.notify(&late_handle),
            12 => tracker.notify_current_state(&snapshot_handle),
            _ => {}
        }
        tracker.run_pending_replays();

        if worker.is_finished() && !tracker.is_loading() && tracker.pending_replay_count() == 0 {
            break;
        }
        thread::sleep(TICK);
        tick += 1;
    }
    if worker.join().is_err() {
        anyhow::bail!("decode worker panicked");
    }
    tracker.process_recorded_events();

    for consumer in [&early, &late, &snapshot] {
        status_info!(
            "{} saw {}",
            consumer.name,
            consumer.seen.borrow().join(", ")
        );
    }
    status_info!(
        "final status bits {:#x}, {} consumers attached",
        tracker.image_status(),
        tracker.consumer_count()
    );
    Ok(())
}
