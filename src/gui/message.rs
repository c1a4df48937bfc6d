use crate::label::Command;

#[derive(Debug, Clone)]
pub enum Message {
    /// Playback timer fired; carries the generation it was scheduled
    /// against so a tick from a superseded timer is discarded.
    Tick(u64),
    PointerMoved(iced::Point),
    PointerPressed,
    Command(Command),
}
