//! The labeling session: item catalog, label store, angle geometry,
//! playback bookkeeping and the session controller that ties them
//! together. Front-ends talk to this module exclusively through
//! [`dispatch`] and the read-only views on [`Session`].

pub mod angle;
pub mod catalog;
pub mod dispatch;
pub mod frames;
pub mod playback;
pub mod session;
pub mod store;

pub use catalog::{Catalog, CatalogError};
pub use dispatch::{Command, InputEvent, dispatch};
pub use frames::{GifFolderSource, SequenceSource};
pub use playback::Playback;
pub use session::{Notice, Session, SessionError, SessionOptions};
pub use store::{LabelMap, LabelStore, StoreError};
