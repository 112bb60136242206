use colored::Color;

pub const PRIMARY: Color = Color::BrightCyan;
pub const ACCENT: Color = Color::BrightMagenta;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV4_PREFIX: Color = Color::Blue;
pub const MAC_ADDR: Color = Color::Yellow;
pub const VENDOR: Color = Color::Green;
pub const PORTS: Color = Color::BrightRed;
pub const DEVICE_TYPE: Color = Color::BrightGreen;
pub const STATUS: Color = Color::Cyan;
