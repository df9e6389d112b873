//! macOS bundle assembly: `.app` layout, Info.plist, icons, and disk images.

pub mod app;
pub mod dmg;
pub mod icon;
pub mod info_plist;
