use nu_ansi_term::Style;
use std::fmt;
use std::time::Instant;

pub(crate) fn human_size(bytes: impl humansize::ToF64 + humansize::Unsigned) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

pub(crate) fn bold(val: &dyn fmt::Display) -> String {
    Style::new().bold().paint(val.to_string()).to_string()
}

pub(crate) fn elapsed(start: Instant) -> String {
    bold(&format!("{:.2?}", start.elapsed()))
}
