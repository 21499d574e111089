//! `rodio` audio provider streaming preview clips fetched over HTTP

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink};
use tokio::task::JoinHandle;

use super::{AudioError, AudioProvider, AudioResource, StatusSender, StatusUpdate};

const STATUS_INTERVAL: Duration = Duration::from_millis(500);
/// `Sink::try_seek` waits for the mixer to apply the seek; a stalled output
/// never answers
const SEEK_TIMEOUT: Duration = Duration::from_secs(2);

/// Keeps the output stream thread alive; dropping it closes the stream
struct StreamGuard {
    _shutdown: std_mpsc::Sender<()>,
}

pub struct RodioProvider {
    http: reqwest::Client,
    mixer: Mixer,
    _stream: StreamGuard,
}

impl RodioProvider {
    /// Opens the default output device on a dedicated thread
    pub fn new() -> Result<Self, AudioError> {
        let (mixer_tx, mixer_rx) = std_mpsc::channel::<Result<Mixer, String>>();
        let (shutdown_tx, shutdown_rx) = std_mpsc::channel::<()>();

        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = mixer_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                // rodio logs to stderr on drop, which corrupts the TUI.
                stream.log_on_drop(false);
                let _ = mixer_tx.send(Ok(stream.mixer().clone()));

                // Returns once the provider is dropped.
                let _ = shutdown_rx.recv();
                drop(stream);
            })
            .map_err(|e| AudioError::Output(e.to_string()))?;

        let mixer = mixer_rx
            .recv()
            .map_err(|e| AudioError::Output(e.to_string()))?
            .map_err(AudioError::Output)?;

        tracing::info!("Audio output stream opened");

        Ok(Self {
            http: reqwest::Client::new(),
            mixer,
            _stream: StreamGuard {
                _shutdown: shutdown_tx,
            },
        })
    }

    async fn fetch(&self, uri: &str) -> Result<Bytes, AudioError> {
        let response = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|e| AudioError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AudioError::Fetch(format!("HTTP {}", response.status().as_u16())));
        }

        response.bytes().await.map_err(|e| AudioError::Fetch(e.to_string()))
    }
}

#[async_trait]
impl AudioProvider for RodioProvider {
    async fn acquire(&self, uri: &str, updates: StatusSender) -> Result<Box<dyn AudioResource>, AudioError> {
        tracing::debug!(uri, "Fetching preview audio");
        let bytes = self.fetch(uri).await?;
        tracing::debug!(uri, bytes = bytes.len(), "Preview audio fetched");

        let sink = Arc::new(Sink::connect_new(&self.mixer));
        sink.append(decode(&bytes)?);
        sink.pause();

        let finished = Arc::new(AtomicBool::new(false));
        let watcher = spawn_status_watcher(sink.clone(), finished.clone(), updates);

        Ok(Box::new(RodioResource {
            sink,
            bytes,
            finished,
            watcher: Some(watcher),
        }))
    }
}

fn decode(bytes: &Bytes) -> Result<Decoder<Cursor<Bytes>>, AudioError> {
    Decoder::new(Cursor::new(bytes.clone())).map_err(|e| AudioError::Decode(e.to_string()))
}

fn status_of(sink: &Sink) -> StatusUpdate {
    let did_finish = sink.empty();
    StatusUpdate {
        position_ms: sink.get_pos().as_millis() as u64,
        is_playing: !sink.is_paused() && !did_finish,
        did_finish,
    }
}

/// Pushes progress while playing and a single `did_finish` when the clip drains
fn spawn_status_watcher(sink: Arc<Sink>, finished: Arc<AtomicBool>, updates: StatusSender) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATUS_INTERVAL);
        loop {
            interval.tick().await;
            let status = status_of(&sink);

            if status.did_finish {
                if finished.swap(true, Ordering::SeqCst) {
                    continue;
                }
            } else if !status.is_playing {
                continue;
            }

            if updates.send(status).is_err() {
                break;
            }
        }
    })
}

/// Runs a blocking seek on the blocking pool and stops waiting after `limit`
async fn seek_off_runtime<F, E>(seek: F, limit: Duration) -> Result<(), AudioError>
where
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(seek)).await {
        Ok(Ok(result)) => result.map_err(|e| AudioError::Seek(e.to_string())),
        Ok(Err(e)) => Err(AudioError::Seek(e.to_string())),
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "Seek timed out waiting for audio output");
            Err(AudioError::Seek("audio output did not respond".to_string()))
        }
    }
}

struct RodioResource {
    sink: Arc<Sink>,
    bytes: Bytes,
    finished: Arc<AtomicBool>,
    watcher: Option<JoinHandle<()>>,
}

impl RodioResource {
    /// A drained sink has no source left; re-append the clip, paused
    fn reload_if_drained(&self) -> Result<(), AudioError> {
        if self.sink.empty() {
            self.sink.pause();
            self.sink.append(decode(&self.bytes)?);
            self.finished.store(false, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[async_trait]
impl AudioResource for RodioResource {
    async fn play(&mut self) -> Result<(), AudioError> {
        self.reload_if_drained()?;
        self.sink.play();
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), AudioError> {
        self.sink.pause();
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AudioError> {
        self.sink.pause();
        self.seek(0).await
    }

    async fn seek(&mut self, position_ms: u64) -> Result<(), AudioError> {
        self.reload_if_drained()?;

        let sink = self.sink.clone();
        seek_off_runtime(move || sink.try_seek(Duration::from_millis(position_ms)), SEEK_TIMEOUT).await
    }

    async fn status(&self) -> Result<StatusUpdate, AudioError> {
        Ok(status_of(&self.sink))
    }

    async fn release(&mut self) -> Result<(), AudioError> {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        self.sink.stop();
        Ok(())
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}
