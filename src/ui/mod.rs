pub mod icons;
pub mod notice;
pub mod spinner;

pub use notice::{Notice, NoticeLevel};
pub use spinner::{spinner, with_spinner};
