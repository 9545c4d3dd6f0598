// UI module - egui shell

pub mod app;

pub use app::StudioApp;
