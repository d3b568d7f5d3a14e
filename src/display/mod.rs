pub mod assemble;
pub mod controller;
pub mod paginate;
pub mod state;
pub mod view;

pub use assemble::{assemble, Rating, RenderableRecord};
pub use controller::{DisplayController, DisplayEvent, Frame};
pub use paginate::paginate;
pub use state::{Chunk, DisplayState, RotationSource, Visible};
pub use view::{render, UiNode, ViewOptions};
