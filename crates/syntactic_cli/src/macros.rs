#[macro_export]
macro_rules! cli_diagnostic {
    ($label:expr, $($format_args:tt)*) => {{
        use ::colored::Colorize;

        eprintln!("{}: {}", $label.bold(), format!($($format_args)*));
    }};
}

/// Print a simple error to stderr
#[macro_export]
macro_rules! cli_err {
    ($($format_args:tt)*) => {{
        $crate::cli_diagnostic!("error".red(), $($format_args)*);
    }};
}

/// Print a simple warning to stderr
#[macro_export]
macro_rules! cli_warn {
    ($($format_args:tt)*) => {{
        $crate::cli_diagnostic!("warning".yellow(), $($format_args)*);
    }};
}

/// Print a simple note to stderr
#[macro_export]
macro_rules! cli_note {
    ($($format_args:tt)*) => {{
        $crate::cli_diagnostic!("note".cyan(), $($format_args)*);
    }};
}
