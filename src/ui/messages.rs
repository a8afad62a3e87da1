use ansi_term::{Colour, Style};
use std::fmt;

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_SONG: &str = "🎵";

fn marker(colour: Colour, icon: &str) -> String {
    colour.bold().paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", marker(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", marker(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", marker(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", marker(Colour::Red, ICON_ERR), msg);
}

/// Song line for `status` output
pub fn song<T: fmt::Display>(msg: T) {
    println!("{} {}", marker(Colour::Purple, ICON_SONG), msg);
}

/// `key: value` row with the key dimmed
pub fn field<T: fmt::Display>(key: &str, value: T) {
    println!("   {} {}", Style::new().dimmed().paint(format!("{key:<12}")), value);
}

pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}",
        Colour::Blue
            .bold()
            .paint(format!("====================== {msg}\n"))
    );
}
