// Reusable components live here.

pub mod error_banner;
pub mod header;
pub mod loading_spinner;
pub mod message_view;
pub mod report_item;
pub mod stats_card;
pub mod theme_toggle;
