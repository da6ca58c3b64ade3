//! Terminal helpers for the command line shell.
//!
//! Messages go to stderr so that the report on stdout stays machine readable.
use colored::{ColoredString, Colorize};

#[doc(hidden)]
pub fn prefix(tag: &str, accessible: bool) -> ColoredString {
    if accessible {
        return tag.normal();
    }
    match tag {
        "[!]" => tag.red().bold(),
        "[~]" => tag.blue().bold(),
        _ => tag.green().bold(),
    }
}

/// Something went wrong but the scan can go on, or the run is aborting.
#[macro_export]
macro_rules! warning {
    ($name:expr) => {
        eprintln!("{} {}", $crate::tui::prefix("[!]", false), $name);
    };
    ($name:expr, $greppable:expr, $accessible:expr) => {
        // Greppable output carries nothing but ports.
        if !$greppable {
            eprintln!("{} {}", $crate::tui::prefix("[!]", $accessible), $name);
        }
    };
}

/// Extra information about the run.
#[macro_export]
macro_rules! detail {
    ($name:expr) => {
        eprintln!("{} {}", $crate::tui::prefix("[~]", false), $name);
    };
    ($name:expr, $greppable:expr, $accessible:expr) => {
        if !$greppable {
            eprintln!("{} {}", $crate::tui::prefix("[~]", $accessible), $name);
        }
    };
}
