use derive_more::Display;

/// Line that opens a hunk; the old code follows it
pub const OPEN_MARKER: &str = ">>>OLD CODE<<<";

/// Line between the old code and the fixed code of a hunk
pub const SEPARATOR: &str = ">>>=============<<<";

/// Line that closes a hunk; the fixed code precedes it
pub const CLOSE_MARKER: &str = ">>>FIXED CODE<<<";

/// The delimiter lines of an annotated hunk.
///
/// The same constant is used to write a marker and to recognise it, and a
/// line is only a marker when it matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Marker {
    #[display(fmt = "open marker")]
    Open,
    #[display(fmt = "separator")]
    Separator,
    #[display(fmt = "close marker")]
    Close,
}

impl Marker {
    /// The literal text of this marker line, without its terminator
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Open => OPEN_MARKER,
            Marker::Separator => SEPARATOR,
            Marker::Close => CLOSE_MARKER,
        }
    }

    /// Recognise a marker line. `line` must not include its `\n`.
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            OPEN_MARKER => Some(Marker::Open),
            SEPARATOR => Some(Marker::Separator),
            CLOSE_MARKER => Some(Marker::Close),
            _ => None,
        }
    }
}
