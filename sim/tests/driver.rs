//! Tick driver timing and cancellation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sim::driver::{spawn, Simulated, StopReason, TickFlow, TICK_INTERVAL};
use sim::SimError;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Log {
    entries: Vec<String>,
    tick_times: Vec<Instant>,
    stopped: Option<(StopReason, usize)>,
}

struct Recorder {
    log: Arc<Mutex<Log>>,
    valid_for: Option<usize>,
    ticks: usize,
}

impl Recorder {
    fn new(log: Arc<Mutex<Log>>) -> Self {
        Self {
            log,
            valid_for: None,
            ticks: 0,
        }
    }
}

impl Simulated for Recorder {
    type Event = &'static str;

    fn on_event(&mut self, event: &'static str) -> TickFlow {
        self.log.lock().unwrap().entries.push(event.to_owned());
        if event == "stop" {
            TickFlow::Stop
        } else {
            TickFlow::Continue
        }
    }

    fn on_tick(&mut self) -> TickFlow {
        self.ticks += 1;
        let mut log = self.log.lock().unwrap();
        log.entries.push(format!("tick {}", self.ticks));
        log.tick_times.push(Instant::now());
        TickFlow::Continue
    }

    fn is_valid(&self) -> bool {
        self.valid_for.map_or(true, |n| self.ticks < n)
    }

    fn on_stop(&mut self, reason: StopReason, leftovers: Vec<&'static str>) {
        self.log.lock().unwrap().stopped = Some((reason, leftovers.len()));
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_at_fixed_period() {
    let log = Arc::new(Mutex::new(Log::default()));
    let start = Instant::now();
    let handle = spawn(Recorder::new(log.clone()), TICK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(210)).await;
    handle.cancel();

    let log = log.lock().unwrap();
    let offsets: Vec<Duration> = log.tick_times.iter().map(|t| *t - start).collect();
    assert_eq!(
        offsets,
        vec![
            Duration::from_millis(50),
            Duration::from_millis(100),
            Duration::from_millis(150),
            Duration::from_millis(200),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn events_and_ticks_are_serialized() {
    let log = Arc::new(Mutex::new(Log::default()));
    let handle = spawn(Recorder::new(log.clone()), TICK_INTERVAL);
    handle.send("a").unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.send("b").unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.send("stop").unwrap();
    handle.join().await;

    let log = log.lock().unwrap();
    assert_eq!(log.entries, ["a", "tick 1", "b", "tick 2", "stop"]);
    assert_eq!(log.stopped, Some((StopReason::Finished, 0)));
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent() {
    let log = Arc::new(Mutex::new(Log::default()));
    let handle = spawn(Recorder::new(log.clone()), TICK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(75)).await;
    handle.cancel();
    handle.cancel();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.cancel();

    assert!(handle.is_finished());
    assert_eq!(handle.send("late"), Err(SimError::DriverClosed));
    let log = log.lock().unwrap();
    assert_eq!(log.tick_times.len(), 1);
    assert_eq!(log.stopped, Some((StopReason::Cancelled, 0)));
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_driver() {
    let log = Arc::new(Mutex::new(Log::default()));
    let handle = spawn(Recorder::new(log.clone()), TICK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(60)).await;
    drop(handle);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let log = log.lock().unwrap();
    assert_eq!(log.tick_times.len(), 1);
    assert_eq!(log.stopped.map(|(reason, _)| reason), Some(StopReason::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn invalid_object_stops_before_ticking() {
    let log = Arc::new(Mutex::new(Log::default()));
    let recorder = Recorder {
        valid_for: Some(2),
        ..Recorder::new(log.clone())
    };
    let handle = spawn(recorder, TICK_INTERVAL);
    handle.join().await;

    let log = log.lock().unwrap();
    assert_eq!(log.tick_times.len(), 2);
    assert_eq!(log.stopped, Some((StopReason::Invalid, 0)));
}

#[tokio::test(start_paused = true)]
async fn invalid_object_refuses_events() {
    let log = Arc::new(Mutex::new(Log::default()));
    let recorder = Recorder {
        valid_for: Some(1),
        ..Recorder::new(log.clone())
    };
    let handle = spawn(recorder, TICK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(60)).await;
    handle.send("late").unwrap();
    handle.join().await;

    let log = log.lock().unwrap();
    assert_eq!(log.entries, ["tick 1"]);
    assert_eq!(log.stopped, Some((StopReason::Invalid, 1)));
}
