use crate::label::session::{Notice, Session};
use crate::label::store::StoreError;
use crate::models::Point;

/// A discrete session command, however the front-end produces it
/// (buttons, arrow keys, anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Skip,
    Save,
    Undo,
}

/// Everything a front-end can feed into the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved(Point),
    PointerPressed(Point),
    Command(Command),
}

/// Route an input event to the session operation it maps to. This is the
/// whole coupling surface between a front-end and the controller: the
/// front-end translates toolkit events into [`InputEvent`]s and renders
/// the returned notices, nothing more.
///
/// Pointer motion deliberately maps to no state change; hover feedback is
/// derived via [`Session::pointer_angle`].
pub fn dispatch(session: &mut Session, event: InputEvent) -> Result<Vec<Notice>, StoreError> {
    match event {
        InputEvent::PointerMoved(_) => Ok(Vec::new()),
        InputEvent::PointerPressed(p) => Ok(session.select(p).into_iter().collect()),
        InputEvent::Command(Command::Next) => Ok(session.advance()),
        InputEvent::Command(Command::Previous) => Ok(session.retreat()),
        InputEvent::Command(Command::Skip) => Ok(session.seek_next_unlabeled()),
        InputEvent::Command(Command::Save) => session.save(),
        InputEvent::Command(Command::Undo) => session.undo(),
    }
}
