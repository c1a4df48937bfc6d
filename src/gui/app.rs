use ::image::{Rgba, RgbaImage};
use iced::widget::{button, column, container, image, mouse_area, row, text};
use iced::{Alignment::Center, Element, Length, Subscription, Task};

use super::Message;
use crate::label::{
    Command, GifFolderSource, InputEvent, Notice, Session, SessionOptions, dispatch,
};
use crate::models::Point;
use crate::render::{self, IndicatorStyle};

const HOVER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const SELECTED_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Open the session and run the labeling window until the user closes it.
/// Startup failures (missing directory, empty catalog, corrupt store)
/// abort before any window appears.
pub fn run(options: SessionOptions) -> anyhow::Result<()> {
    let source = GifFolderSource::new(&options.source_dir, options.viewport);
    let (session, notices) = Session::open(options, Box::new(source))?;
    let booted = std::sync::Mutex::new(Some(App::new(session, &notices)));

    iced::application(
        move || {
            let app = booted
                .lock()
                .expect("boot state poisoned")
                .take()
                .expect("application booted twice");
            (app, Task::none())
        },
        App::update,
        App::view,
    )
    .title("GIF Angle Labeler")
    .subscription(App::subscription)
    .run()
    .map_err(|e| anyhow::anyhow!("failed to run the labeling window: {e}"))
}

struct App {
    session: Session,
    /// Angle under the pointer, for the dashed hover indicator.
    hover: Option<f64>,
    /// Last pointer position inside the display region; presses commit it.
    last_cursor: Option<Point>,
    status: String,
    display: image::Handle,
}

impl App {
    fn new(session: Session, startup_notices: &[Notice]) -> Self {
        let mut app = Self {
            display: blank_display(&session),
            session,
            hover: None,
            last_cursor: None,
            status: String::new(),
        };
        app.absorb(startup_notices);
        app.refresh_display();
        app
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick(generation) => {
                if self.session.tick(generation).is_some() {
                    self.refresh_display();
                }
            }
            Message::PointerMoved(p) => {
                let p = Point::new(p.x as f64, p.y as f64);
                self.last_cursor = Some(p);
                self.hover = Some(self.session.pointer_angle(p));
                self.refresh_display();
            }
            Message::PointerPressed => {
                if let Some(p) = self.last_cursor {
                    self.apply(InputEvent::PointerPressed(p));
                }
            }
            Message::Command(command) => self.apply(InputEvent::Command(command)),
        }
        Task::none()
    }

    /// Route an input event through the dispatch table and render the
    /// resulting notices.
    fn apply(&mut self, event: InputEvent) {
        match dispatch(&mut self.session, event) {
            Ok(notices) => self.absorb(&notices),
            Err(e) => self.status = format!("{e:#}"),
        }
        self.refresh_display();
    }

    fn absorb(&mut self, notices: &[Notice]) {
        for notice in notices {
            if matches!(notice, Notice::Loaded { .. }) {
                // New item on display: the old hover line belongs to the
                // previous item.
                self.hover = None;
            }
            if let Some(line) = status_line(notice) {
                self.status = line;
            }
        }
    }

    /// Composite the frame on display with the indicator overlays and
    /// hand it to the image widget.
    fn refresh_display(&mut self) {
        let viewport = self.session.viewport();
        let mut frame = match self.session.current_frame() {
            Some(frame) => frame.clone(),
            None => RgbaImage::from_pixel(viewport.width, viewport.height, Rgba([0, 0, 0, 255])),
        };

        if let Some(angle) = self.session.pending() {
            render::draw_indicator(&mut frame, viewport, angle, IndicatorStyle::Solid, SELECTED_COLOR);
        }
        if let Some(angle) = self.hover {
            render::draw_indicator(&mut frame, viewport, angle, IndicatorStyle::Dashed, HOVER_COLOR);
        }

        self.display =
            image::Handle::from_rgba(frame.width(), frame.height(), frame.into_raw());
    }

    fn angle_readout(&self) -> String {
        match (self.hover, self.session.pending()) {
            (Some(hover), Some(selected)) => {
                format!("Hover: {hover:.1}\u{b0} | Selected: {selected:.1}\u{b0}")
            }
            (None, Some(selected)) if self.session.saved_angle() == Some(selected) => {
                format!("Saved: {selected:.1}\u{b0} (Click to change)")
            }
            (None, Some(selected)) => format!("Selected: {selected:.1}\u{b0}"),
            (Some(hover), None) => format!("Angle: {hover:.1}\u{b0}"),
            (None, None) => "Move mouse to select angle".to_string(),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let viewport = self.session.viewport();
        let display = mouse_area(
            image(self.display.clone())
                .width(Length::Fixed(viewport.width as f32))
                .height(Length::Fixed(viewport.height as f32)),
        )
        .on_move(Message::PointerMoved)
        .on_press(Message::PointerPressed);

        let controls = row![
            button("Back (\u{2190})").on_press(Message::Command(Command::Previous)),
            button("Save & Next").on_press(Message::Command(Command::Save)),
            button("Next (\u{2192})").on_press(Message::Command(Command::Next)),
            button("Skip to unlabeled").on_press(Message::Command(Command::Skip)),
            button("Undo").on_press(Message::Command(Command::Undo)),
        ]
        .spacing(10);

        let content = column![
            display,
            text(format!("Filename: {}", self.session.current_name())),
            text(format!("Progress: {}", self.session.progress())),
            text(self.angle_readout()).size(16),
            text(self.status.clone()),
            controls,
        ]
        .spacing(10)
        .padding(10)
        .align_x(Center);

        container(content)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let playback = self.session.playback();
        let ticks = if playback.is_running() {
            let generation = playback.generation();
            iced::time::every(playback.period()).map(move |_| Message::Tick(generation))
        } else {
            Subscription::none()
        };

        let keys = iced::keyboard::on_key_press(|key, _modifiers| {
            use iced::keyboard::{Key, key::Named};
            match key.as_ref() {
                Key::Named(Named::ArrowRight) => Some(Message::Command(Command::Next)),
                Key::Named(Named::ArrowLeft) => Some(Message::Command(Command::Previous)),
                _ => None,
            }
        });

        Subscription::batch([ticks, keys])
    }
}

fn blank_display(session: &Session) -> image::Handle {
    let viewport = session.viewport();
    let frame = RgbaImage::from_pixel(viewport.width, viewport.height, Rgba([0, 0, 0, 255]));
    image::Handle::from_rgba(frame.width(), frame.height(), frame.into_raw())
}

fn status_line(notice: &Notice) -> Option<String> {
    match notice {
        Notice::Loaded { .. } | Notice::Selected { .. } => None,
        Notice::EndOfSequence => Some("You have reached the last GIF.".to_string()),
        Notice::StartOfSequence => Some("You are at the first GIF.".to_string()),
        Notice::AllLabeled => {
            Some("All GIFs are labeled. Keep reviewing with the arrow keys.".to_string())
        }
        Notice::SkippedUnreadable { name, reason } => {
            Some(format!("Skipped {name}: {reason}"))
        }
        Notice::Saved { name, angle } => Some(format!("Saved {name} at {angle:.1}\u{b0}")),
        Notice::Removed { name } => Some(format!("Removed the label for {name}")),
        Notice::NoSelection => {
            Some("Click on the image to select an angle before saving.".to_string())
        }
    }
}
