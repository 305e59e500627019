//! UI layer: the dashboard shell and all tab surfaces.

pub mod app;

pub use app::DashboardApp;
