use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::audio::StatusSender;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    Acquire(String),
    Play(String),
    Pause(String),
    Stop(String),
    Seek(String, u64),
    Release(String),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    live: HashSet<String>,
    position_ms: u64,
    did_finish: bool,
    fail_acquire: HashSet<String>,
    fail_pause: bool,
    fail_resume: bool,
    fail_seek: bool,
    fail_stop: bool,
    sender: Option<StatusSender>,
}

#[derive(Clone, Default)]
struct FakeProvider {
    recorder: Arc<StdMutex<Recorder>>,
}

impl FakeProvider {
    fn calls(&self) -> Vec<Call> {
        self.recorder.lock().unwrap().calls.clone()
    }

    fn live(&self) -> HashSet<String> {
        self.recorder.lock().unwrap().live.clone()
    }

    fn set_position(&self, position_ms: u64) {
        self.recorder.lock().unwrap().position_ms = position_ms;
    }

    fn push(&self, status: StatusUpdate) {
        let sender = self.recorder.lock().unwrap().sender.clone().unwrap();
        sender.send(status).unwrap();
    }
}

struct FakeResource {
    uri: String,
    recorder: Arc<StdMutex<Recorder>>,
}

impl FakeResource {
    fn record(&self, call: Call) {
        self.recorder.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl AudioProvider for FakeProvider {
    async fn acquire(&self, uri: &str, updates: StatusSender) -> Result<Box<dyn AudioResource>, AudioError> {
        let mut recorder = self.recorder.lock().unwrap();
        recorder.calls.push(Call::Acquire(uri.to_string()));
        if recorder.fail_acquire.contains(uri) {
            return Err(AudioError::Fetch("HTTP 404".to_string()));
        }
        recorder.live.insert(uri.to_string());
        recorder.sender = Some(updates);
        recorder.position_ms = 0;
        recorder.did_finish = false;
        Ok(Box::new(FakeResource {
            uri: uri.to_string(),
            recorder: self.recorder.clone(),
        }))
    }
}

#[async_trait]
impl AudioResource for FakeResource {
    async fn play(&mut self) -> Result<(), AudioError> {
        self.record(Call::Play(self.uri.clone()));
        if self.recorder.lock().unwrap().fail_resume {
            return Err(AudioError::Output("device lost".to_string()));
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), AudioError> {
        self.record(Call::Pause(self.uri.clone()));
        if self.recorder.lock().unwrap().fail_pause {
            return Err(AudioError::Output("device lost".to_string()));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AudioError> {
        self.record(Call::Stop(self.uri.clone()));
        if self.recorder.lock().unwrap().fail_stop {
            return Err(AudioError::Output("device lost".to_string()));
        }
        Ok(())
    }

    async fn seek(&mut self, position_ms: u64) -> Result<(), AudioError> {
        self.record(Call::Seek(self.uri.clone(), position_ms));
        let mut recorder = self.recorder.lock().unwrap();
        if recorder.fail_seek {
            return Err(AudioError::Seek("not seekable".to_string()));
        }
        recorder.position_ms = position_ms;
        Ok(())
    }

    async fn status(&self) -> Result<StatusUpdate, AudioError> {
        let recorder = self.recorder.lock().unwrap();
        Ok(StatusUpdate {
            position_ms: recorder.position_ms,
            is_playing: !recorder.did_finish,
            did_finish: recorder.did_finish,
        })
    }

    async fn release(&mut self) -> Result<(), AudioError> {
        self.record(Call::Release(self.uri.clone()));
        self.recorder.lock().unwrap().live.remove(&self.uri);
        Ok(())
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("https://x/{}.mp3", id), "A", "B", None).unwrap()
}

fn session(provider: &FakeProvider) -> Arc<PlaybackSession> {
    PlaybackSession::start(Arc::new(provider.clone()), PlaybackConfig::default())
}

/// Lets spawned tasks run; with a paused clock this also fires due timers
async fn settle(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn play_then_pause_keeps_track_loaded() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Playing);
    assert!(snapshot.is_minimized);
    assert_eq!(snapshot.position_secs, 0.0);

    session.pause().await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert_eq!(snapshot.current_track, Some(track("1")));
}

#[tokio::test(start_paused = true)]
async fn replacing_a_track_releases_before_acquiring() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("a")).await.unwrap();
    session.play(track("b")).await.unwrap();

    assert_eq!(
        provider.calls(),
        vec![
            Call::Acquire("https://x/a.mp3".to_string()),
            Call::Play("https://x/a.mp3".to_string()),
            Call::Release("https://x/a.mp3".to_string()),
            Call::Acquire("https://x/b.mp3".to_string()),
            Call::Play("https://x/b.mp3".to_string()),
        ]
    );
    assert_eq!(provider.live(), HashSet::from(["https://x/b.mp3".to_string()]));
    assert_eq!(session.snapshot().current_track, Some(track("b")));
}

#[tokio::test(start_paused = true)]
async fn replaying_while_paused_still_releases_first() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("a")).await.unwrap();
    session.pause().await.unwrap();
    session.play(track("a")).await.unwrap();

    assert_eq!(provider.live().len(), 1);
    assert!(provider.calls().contains(&Call::Release("https://x/a.mp3".to_string())));
    assert_eq!(session.snapshot().transport, TransportState::Playing);
}

#[tokio::test(start_paused = true)]
async fn acquisition_failure_leaves_session_idle_without_track() {
    let provider = FakeProvider::default();
    provider
        .recorder
        .lock()
        .unwrap()
        .fail_acquire
        .insert("https://x/bad.mp3".to_string());
    let session = session(&provider);

    session.play(track("good")).await.unwrap();
    let err = session.play(track("bad")).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Acquire(_)));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Idle);
    assert_eq!(snapshot.current_track, None);
    assert!(!snapshot.is_minimized);
    assert!(provider.live().is_empty());
}

#[tokio::test(start_paused = true)]
async fn resume_while_playing_is_a_noop_and_stop_returns_to_idle() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.resume().await.unwrap();
    assert_eq!(session.snapshot().transport, TransportState::Playing);
    assert_eq!(
        provider.calls().iter().filter(|c| matches!(c, Call::Play(_))).count(),
        1
    );

    session.stop().await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Idle);
    assert_eq!(snapshot.current_track, None);
    assert!(!snapshot.is_minimized);
    assert!(provider.live().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transport_commands_without_a_track_do_nothing() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.pause().await.unwrap();
    session.resume().await.unwrap();
    session.stop().await.unwrap();
    session.seek(4.0).await.unwrap();

    assert!(provider.calls().is_empty());
    assert_eq!(session.snapshot(), SessionSnapshot::idle(30.0));
}

#[tokio::test(start_paused = true)]
async fn seek_sets_position_without_changing_transport() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.pause().await.unwrap();
    session.seek(12.5).await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.position_secs, 12.5);
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert!(!snapshot.seeking);
    assert!(provider.calls().contains(&Call::Seek("https://x/1.mp3".to_string(), 12_500)));

    session.resume().await.unwrap();
    session.seek(3.0).await.unwrap();
    assert_eq!(session.snapshot().transport, TransportState::Playing);
    assert_eq!(session.snapshot().position_secs, 3.0);
}

#[tokio::test(start_paused = true)]
async fn ticker_publishes_native_position_while_playing() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.set_position(4_000);
    settle(1_100).await;

    assert_eq!(session.snapshot().position_secs, 4.0);

    session.pause().await.unwrap();
    provider.set_position(9_000);
    settle(2_000).await;
    assert_eq!(session.snapshot().position_secs, 4.0);
}

#[tokio::test(start_paused = true)]
async fn ticker_does_not_overwrite_position_while_seeking() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.begin_seek().await;
    provider.set_position(7_000);
    settle(3_000).await;

    let snapshot = session.snapshot();
    assert!(snapshot.seeking);
    assert_eq!(snapshot.position_secs, 0.0);

    session.seek(20.0).await.unwrap();
    let snapshot = session.snapshot();
    assert!(!snapshot.seeking);
    assert_eq!(snapshot.position_secs, 20.0);
    assert_eq!(snapshot.transport, TransportState::Playing);
}

#[tokio::test(start_paused = true)]
async fn cancel_seek_lowers_the_guard() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.begin_seek().await;
    session.cancel_seek().await;
    provider.set_position(2_000);
    settle(1_100).await;

    assert_eq!(session.snapshot().position_secs, 2.0);
}

#[tokio::test(start_paused = true)]
async fn natural_completion_pauses_and_keeps_track() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.push(StatusUpdate {
        position_ms: 29_800,
        is_playing: false,
        did_finish: true,
    });
    settle(10).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert_eq!(snapshot.current_track, Some(track("1")));
    assert_eq!(snapshot.position_secs, 30.0);

    session.resume().await.unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Playing);
    assert_eq!(snapshot.position_secs, 0.0);
    assert!(provider.calls().contains(&Call::Seek("https://x/1.mp3".to_string(), 0)));
}

#[tokio::test(start_paused = true)]
async fn pushed_updates_from_a_replaced_resource_are_ignored() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("a")).await.unwrap();
    let stale = provider.recorder.lock().unwrap().sender.clone().unwrap();
    session.play(track("b")).await.unwrap();

    let _ = stale.send(StatusUpdate {
        position_ms: 0,
        is_playing: false,
        did_finish: true,
    });
    settle(10).await;

    assert_eq!(session.snapshot().transport, TransportState::Playing);
}

#[tokio::test(start_paused = true)]
async fn failed_transport_command_falls_back_to_idle() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.recorder.lock().unwrap().fail_pause = true;

    let err = session.pause().await.unwrap_err();
    assert!(matches!(err, PlaybackError::Transport(_)));
    assert_eq!(session.snapshot().transport, TransportState::Idle);
    assert_eq!(session.snapshot().current_track, None);
    assert!(provider.live().is_empty());
}

fn assert_idle_and_released(session: &PlaybackSession, provider: &FakeProvider) {
    let snapshot = session.snapshot();
    assert_eq!(snapshot.transport, TransportState::Idle);
    assert_eq!(snapshot.current_track, None);
    assert!(!snapshot.seeking);
    assert!(!snapshot.is_minimized);
    assert!(provider.live().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_seek_falls_back_to_idle_and_lowers_the_guard() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.recorder.lock().unwrap().fail_seek = true;
    session.begin_seek().await;

    let err = session.seek(10.0).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Transport(AudioError::Seek(_))));
    assert_idle_and_released(&session, &provider);
}

#[tokio::test(start_paused = true)]
async fn failed_resume_falls_back_to_idle() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.pause().await.unwrap();
    provider.recorder.lock().unwrap().fail_resume = true;

    let err = session.resume().await.unwrap_err();
    assert!(matches!(err, PlaybackError::Transport(_)));
    assert_idle_and_released(&session, &provider);
}

#[tokio::test(start_paused = true)]
async fn failed_stop_still_releases_and_reports() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.recorder.lock().unwrap().fail_stop = true;

    let err = session.stop().await.unwrap_err();
    assert!(matches!(err, PlaybackError::Transport(_)));
    assert!(provider.calls().contains(&Call::Release("https://x/1.mp3".to_string())));
    assert_idle_and_released(&session, &provider);
}

#[tokio::test(start_paused = true)]
async fn reports_queued_before_a_backward_seek_are_dropped() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    provider.set_position(20_000);
    provider.push(StatusUpdate {
        position_ms: 20_000,
        is_playing: true,
        did_finish: false,
    });
    provider.push(StatusUpdate {
        position_ms: 30_000,
        is_playing: false,
        did_finish: true,
    });

    session.begin_seek().await;
    session.seek(3.0).await.unwrap();
    assert_eq!(session.snapshot().position_secs, 3.0);

    settle(10).await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.position_secs, 3.0);
    assert_eq!(snapshot.transport, TransportState::Playing);

    settle(2_000).await;
    assert_eq!(session.snapshot().position_secs, 3.0);
}

#[tokio::test(start_paused = true)]
async fn reports_sent_after_a_seek_still_apply() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.seek(3.0).await.unwrap();
    provider.set_position(4_500);
    provider.push(StatusUpdate {
        position_ms: 4_500,
        is_playing: true,
        did_finish: false,
    });
    settle(10).await;

    assert_eq!(session.snapshot().position_secs, 4.5);
}

#[tokio::test(start_paused = true)]
async fn toggle_minimize_has_no_transport_effect() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.toggle_minimize(false).await;

    let snapshot = session.snapshot();
    assert!(!snapshot.is_minimized);
    assert_eq!(snapshot.transport, TransportState::Playing);

    session.next();
    session.previous();
    assert_eq!(session.snapshot().current_track, Some(track("1")));
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_published_changes() {
    let provider = FakeProvider::default();
    let session = session(&provider);
    let mut rx = session.subscribe();

    session.play(track("1")).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().transport, TransportState::Playing);
}

#[tokio::test(start_paused = true)]
async fn shutdown_releases_resource_and_stops_ticker() {
    let provider = FakeProvider::default();
    let session = session(&provider);

    session.play(track("1")).await.unwrap();
    session.shutdown().await;

    assert!(provider.live().is_empty());
    assert_eq!(session.snapshot().transport, TransportState::Idle);

    provider.set_position(5_000);
    settle(3_000).await;
    assert_eq!(session.snapshot().position_secs, 0.0);
}
