use {crate::prelude::*, colored::ColoredString};

/// A grey separator line, printed between a command's title and its
/// output.
pub(crate) fn separator() -> ColoredString {
    "\n-=-=-=-=-=-=-=-\n".truecolor(100, 100, 100)
}

/// Print the title of the currently executed command.
#[macro_export]
macro_rules! command_title {
    ($title:expr) => {
        println!(
            "{arrow} {title}{separator}",
            arrow = "▶".bold().purple(),
            title = format!($title).bold(),
            separator = separator()
        );
    };
}

/// Print a success line with a green check.
#[macro_export]
macro_rules! notify_success {
    ($($arg:tt)*) => {
        println!("{} {}", "✔".green().bold(), format!($($arg)*));
    };
}
