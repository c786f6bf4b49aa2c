//! Shared helpers for text measurement and widgets.

pub mod scrollbar;
pub mod text;

pub use scrollbar::Scrollbar;
pub use text::{
    center_line, fit_line, indent_line, line_width, truncate_header, truncate_to_width,
};
