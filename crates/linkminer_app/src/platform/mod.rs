mod app;
mod effects;
mod input;
pub(crate) mod logging;
mod ui;

pub(crate) use app::run_app;
