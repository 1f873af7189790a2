/// What the shell does with one line of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction<'a> {
    /// Leave the shell
    Exit,
    /// Forward the line to the agent unchanged
    Ask(&'a str),
}

const EXIT_WORDS: [&str; 2] = ["quit", "exit"];

impl<'a> LineAction<'a> {
    /// Classify a line. The line is not trimmed, so `" quit"` is a question.
    pub fn parse(line: &'a str) -> Self {
        if line.is_empty() || EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
            Self::Exit
        } else {
            Self::Ask(line)
        }
    }
}
