//! Ratatui front-end: the schedule and seat-info screens, their key
//! handling, and the terminal event loop that drives them.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
