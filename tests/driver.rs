//! Driver behavior on paused tokio time.

use chessclock::{
    AlertKind, AlertSink, ClockDriver, ClockEngine, ClockHandle, DriverConfig, DriverError,
    GameConfig, MemorySink, Player, RemainingTime, RestartOutcome, TokioClock, Turn,
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::sleep;
use tower::Service;

const PERIOD: Duration = Duration::from_millis(32);

fn spawn(initial: u64, increment: u64) -> (ClockHandle, MemorySink) {
    let engine = ClockEngine::start(GameConfig::from_millis(initial, increment))
        .with_clock(TokioClock::default());
    let sink = MemorySink::new();
    let handle =
        ClockDriver::spawn(engine, sink.clone(), DriverConfig::default().tick_interval(PERIOD));
    (handle, sink)
}

#[tokio::test(start_paused = true)]
async fn running_clock_counts_down_in_real_time() {
    let (handle, sink) = spawn(300_000, 3_000);
    handle.end_turn(Player::Top).await.unwrap();

    sleep(Duration::from_secs(1)).await;

    let s = handle.snapshot();
    assert_eq!(s.turn, Turn::Bottom);
    assert_eq!(s.remaining.top, 300_000);
    assert!(
        (299_000..299_000 + PERIOD.as_millis() as u64).contains(&s.remaining.bottom),
        "bottom = {}",
        s.remaining.bottom
    );
    assert_eq!(sink.alerts(), vec![AlertKind::Move]);
}

#[tokio::test(start_paused = true)]
async fn no_ticks_before_the_first_move() {
    let (handle, sink) = spawn(60_000, 0);
    let mut rx = handle.subscribe();

    sleep(Duration::from_secs(30)).await;

    assert!(!rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().remaining, RemainingTime::uniform(60_000));
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_countdown() {
    let (handle, _sink) = spawn(60_000, 0);
    handle.end_turn(Player::Bottom).await.unwrap();
    sleep(Duration::from_millis(500)).await;

    let paused = handle.set_paused(true).await.unwrap();
    assert!(paused.is_paused);
    let frozen = paused.remaining.top;
    assert!(frozen < 60_000);

    sleep(Duration::from_secs(20)).await;
    assert_eq!(handle.snapshot().remaining.top, frozen);

    // Moving is locked while paused.
    let s = handle.end_turn(Player::Top).await.unwrap();
    assert_eq!(s.turn, Turn::Top);

    let resumed = handle.toggle_pause().await.unwrap();
    assert!(!resumed.is_paused);
    assert_eq!(resumed.remaining.top, frozen, "paused time is never charged");

    sleep(Duration::from_millis(500)).await;
    assert!(handle.snapshot().remaining.top < frozen);
}

#[tokio::test(start_paused = true)]
async fn expiry_ends_the_game_with_one_long_beep() {
    let (handle, sink) = spawn(2_000, 0);
    let mut rx = handle.subscribe();
    handle.end_turn(Player::Top).await.unwrap();

    let ended = *rx.wait_for(|s| s.turn == Turn::End).await.unwrap();
    assert_eq!(ended.remaining.bottom, 0);
    assert_eq!(ended.flagged(), Some(Player::Bottom));

    sleep(Duration::from_secs(10)).await;
    assert!(!rx.has_changed().unwrap(), "ticker stops once the game is over");

    assert_eq!(
        sink.alerts(),
        vec![AlertKind::Move, AlertKind::ShortBeep, AlertKind::ShortBeep, AlertKind::LongBeep]
    );

    // Nothing moves after the flag falls.
    let s = handle.end_turn(Player::Bottom).await.unwrap();
    assert_eq!(s.turn, Turn::End);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(sink.count(AlertKind::LongBeep), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_request_pauses_then_resets() {
    let (handle, _sink) = spawn(180_000, 2_000);
    handle.end_turn(Player::Top).await.unwrap();
    sleep(Duration::from_secs(3)).await;

    assert_eq!(handle.request_restart().await.unwrap(), RestartOutcome::Paused);
    let s = handle.snapshot();
    assert!(s.is_paused);
    assert_eq!(s.turn, Turn::Bottom);

    assert_eq!(handle.request_restart().await.unwrap(), RestartOutcome::Reset);
    let s = handle.snapshot();
    assert_eq!(s.turn, Turn::Begin);
    assert!(!s.is_paused);
    assert_eq!(s.remaining, RemainingTime::uniform(180_000));
}

#[tokio::test(start_paused = true)]
async fn restart_can_switch_time_control() {
    let (handle, _sink) = spawn(60_000, 0);
    handle.end_turn(Player::Top).await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let s = handle.restart(Some(GameConfig::from_millis(600_000, 5_000))).await.unwrap();
    assert_eq!(s.turn, Turn::Begin);
    assert_eq!(s.remaining, RemainingTime::uniform(600_000));

    handle.end_turn(Player::Top).await.unwrap();
    let s = handle.end_turn(Player::Bottom).await.unwrap();
    assert_eq!(s.remaining.bottom, 605_000);
}

#[tokio::test(start_paused = true)]
async fn handles_share_one_clock() {
    let (handle, _sink) = spawn(60_000, 1_000);
    let other = handle.clone();

    handle.end_turn(Player::Top).await.unwrap();
    let s = other.end_turn(Player::Bottom).await.unwrap();
    assert_eq!(s.turn, Turn::Top);
    assert_eq!(handle.snapshot(), s);
}

#[tokio::test(start_paused = true)]
async fn commands_fail_after_shutdown() {
    let (handle, _sink) = spawn(60_000, 0);
    handle.end_turn(Player::Top).await.unwrap();

    let last = handle.shutdown().await.unwrap();
    assert_eq!(last.turn, Turn::Bottom);

    assert_eq!(handle.end_turn(Player::Bottom).await, Err(DriverError::Closed));
    assert_eq!(handle.request_restart().await, Err(DriverError::Closed));
    assert!(handle.is_closed());
}

#[tokio::test(start_paused = true)]
async fn double_tap_is_counted_once() {
    let (handle, sink) = spawn(60_000, 2_000);
    handle.end_turn(Player::Bottom).await.unwrap();
    sleep(Duration::from_millis(200)).await;

    let taps = [Player::Top, Player::Top].map(|player| {
        let handle = handle.clone();
        async move { handle.end_turn(player).await }
    });
    let results = futures::future::join_all(taps).await;

    // The second tap lands on the opponent's turn and is ignored.
    let turns: Vec<Turn> = results.into_iter().map(|r| r.unwrap().turn).collect();
    assert_eq!(turns, vec![Turn::Bottom, Turn::Bottom]);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(sink.count(AlertKind::Move), 2, "opening move plus one tap");

    let s = handle.snapshot();
    assert_eq!(s.turn, Turn::Bottom);
    assert!(s.remaining.top > 60_000, "increment applied exactly once");
    assert!(s.remaining.top < 62_000);
}

#[tokio::test(start_paused = true)]
async fn both_opening_taps_are_legal_moves() {
    let (handle, sink) = spawn(60_000, 0);

    let taps = Player::BOTH.map(|player| {
        let handle = handle.clone();
        async move { handle.end_turn(player).await }
    });
    let results = futures::future::join_all(taps).await;

    let turns: Vec<Turn> = results.into_iter().map(|r| r.unwrap().turn).collect();
    assert_eq!(turns, vec![Turn::Bottom, Turn::Top]);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(sink.count(AlertKind::Move), 2);
}

/// Sink whose playback takes a full second.
#[derive(Clone, Default)]
struct SlowSink {
    played: Arc<AtomicUsize>,
}

impl Service<AlertKind> for SlowSink {
    type Response = ();
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<(), Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _alert: AlertKind) -> Self::Future {
        let played = self.played.clone();
        Box::pin(async move {
            sleep(Duration::from_secs(1)).await;
            played.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

impl AlertSink for SlowSink {
    type SinkError = Infallible;
}

#[tokio::test(start_paused = true)]
async fn slow_sink_never_delays_the_flag() {
    let engine = ClockEngine::start(GameConfig::from_millis(1_500, 0))
        .with_clock(TokioClock::default());
    let sink = SlowSink::default();
    let handle =
        ClockDriver::spawn(engine, sink.clone(), DriverConfig::default().tick_interval(PERIOD));

    handle.end_turn(Player::Top).await.unwrap();
    sleep(Duration::from_millis(1_600)).await;

    // The ticker kept running while the Move click was still playing.
    let s = handle.snapshot();
    assert_eq!(s.turn, Turn::End);
    assert_eq!(s.flagged(), Some(Player::Bottom));
    assert!(sink.played.load(Ordering::SeqCst) < 3);

    let s = handle.end_turn(Player::Bottom).await.unwrap();
    assert_eq!(s.turn, Turn::End);
    assert_eq!(s.remaining.bottom, 0);

    // Playback catches up in order once the sink gets through the queue.
    sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.played.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn late_tap_is_rejected_even_if_no_tick_saw_zero() {
    // Ticks far apart: the tap arrives before the tick that would have flagged.
    let engine = ClockEngine::start(GameConfig::from_millis(1_500, 5_000))
        .with_clock(TokioClock::default());
    let sink = MemorySink::new();
    let handle = ClockDriver::spawn(
        engine,
        sink.clone(),
        DriverConfig::default().tick_interval(Duration::from_secs(10)),
    );

    handle.end_turn(Player::Top).await.unwrap();
    sleep(Duration::from_millis(1_600)).await;
    assert_eq!(handle.snapshot().turn, Turn::Bottom, "no tick yet");

    let s = handle.end_turn(Player::Bottom).await.unwrap();
    assert_eq!(s.turn, Turn::End);
    assert_eq!(s.remaining.bottom, 0, "no increment after the flag");
    assert_eq!(s.flagged(), Some(Player::Bottom));

    sleep(Duration::from_millis(1)).await;
    assert_eq!(sink.alerts(), vec![AlertKind::Move, AlertKind::LongBeep]);
}
