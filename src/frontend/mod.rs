mod app;
mod app_command_responder;
mod ui_event;

/// Different frontend ui modes
mod logs_mode;
mod main_mode;

/// Let's be very strict about what to export
/// to avoid coupling frontend and the rest
pub use app::App;
