//! Styled console output for the experimenter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Heading,
    Prompt,
    Error,
    Success,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Heading => "1;36",
            Style::Prompt => "1;33",
            Style::Error => "1;31",
            Style::Success => "32",
        }
    }
}

pub fn styled(message: &str, style: Style) -> String {
    format!("\x1b[{}m{message}\x1b[0m", style.code())
}
