pub mod generate;
pub mod label;
pub mod models;
pub mod pipeline;
pub mod render;

pub use label::{
    Catalog, CatalogError, Command, GifFolderSource, InputEvent, LabelMap, LabelStore, Notice,
    Playback, SequenceSource, Session, SessionError, SessionOptions, StoreError, dispatch,
};
pub use models::{Point, Progress, Viewport};
pub use pipeline::{TaskPool, TaskReport};

#[cfg(feature = "gui")]
pub mod gui;
