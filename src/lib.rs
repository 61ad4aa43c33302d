pub mod algorithm;
pub mod models;
pub mod surface;
pub mod telemetry;
pub mod widget;

pub use models::config::WidgetConfig;
pub use models::position::AnchorPosition;
pub use surface::{HeadlessSurface, Surface};
pub use widget::movable::Movable;
pub use widget::pet::Pet;
