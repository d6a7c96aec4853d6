use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::{sync::mpsc::Sender, time::interval};

use crate::data::resolver::{Resolution, WeatherResolver};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    Input(Event),
    WeatherResolved(Resolution),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_frame_task(tx: Sender<AppEvent>, fps: u8) {
    let fps = fps.clamp(15, 60);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

/// Resolves the weather in the background. Earlier lookups are not cancelled,
/// so whichever completes last decides the theme.
pub fn start_resolution(tx: Sender<AppEvent>, resolver: WeatherResolver) {
    tokio::spawn(async move {
        let resolution = resolver.resolve().await;
        let _ = tx.send(AppEvent::WeatherResolved(resolution)).await;
    });
}
