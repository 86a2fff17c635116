use std::{convert::From, fmt};

/// Simple custom Error for the table decoder
pub struct Error {
    pub kind: ErrorKind,
    /// 1-based line of the table that produced the error (if known)
    pub line: Option<usize>,
    pub msg: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// a fixed-width field is not the expected width
    BadFieldWidth,
    /// opcode field is not a valid one byte hex number
    MalformedOpcode,
    /// decimal field (cycles, bytes) contains non-digits
    MalformedNumeric,
    /// a flag carries an effect symbol outside the known set
    UnknownEffectSymbol,
    /// inherent mode combined with an operand-taking mode
    ConflictingAddressingModes,
    /// addressing mode name not recognized
    UnknownAddressingMode,
    /// underlying io error
    IO,
    /// catch-all for other errors
    General,
}

impl Error {
    pub fn new(kind: ErrorKind, line: Option<usize>, message: &str) -> Error {
        Error {
            kind,
            line,
            msg: String::from(message),
        }
    }
    /// Attach a line number unless one is already present.
    pub fn at_line(mut self, line: usize) -> Error {
        self.line.get_or_insert(line);
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, None, e.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:?}: {}", red!("optable::Error"), self.kind, self.msg)
    }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}", self.msg)
    }
}
impl std::error::Error for Error {}
