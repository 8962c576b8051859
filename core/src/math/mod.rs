pub mod polar;

pub use polar::{PolarHelper, ScreenPoint};
