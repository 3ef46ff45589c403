mod app;
mod host;
mod ui;
pub(crate) mod widgets;

pub use app::TowerApp;
