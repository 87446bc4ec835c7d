mod backdrop;
mod featured;
mod sidebar;
mod status_bar;

pub use backdrop::BackdropWidget;
pub use featured::FeaturedWidget;
pub use sidebar::SidebarWidget;
pub use status_bar::StatusBarWidget;
