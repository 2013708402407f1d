pub mod api_client;
pub mod config;
pub mod page;
pub mod pagination;
pub mod render;
pub mod session;
pub mod table_display;
pub mod tui_app;
pub mod utils;
pub mod widgets;
pub mod yank_manager;
