pub mod frame;
pub mod render;
pub mod span;
pub mod style;
pub mod view;

pub use frame::{Frame, Line};
pub use render::render;
pub use view::{Focus, View};
