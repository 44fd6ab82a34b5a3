//! Error types and source span tracking for diagnostics.

#[allow(unused_imports)]
use alloc::format;
use alloc::string::String;
#[allow(unused_imports)]
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Source location for diagnostics.
///
/// Tracks the line, column, byte offset, and length of an operand or
/// statement in the assembly source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (byte offset within line).
    pub col: u32,
    /// 0-based byte offset from start of source.
    pub offset: usize,
    /// Byte length of the spanned region.
    pub len: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub fn new(line: u32, col: u32, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// A dummy span for operands built through the API rather than parsed.
    #[must_use]
    pub fn dummy() -> Self {
        Self::default()
    }

    /// Whether this span points into real source text.
    #[must_use]
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Encoding, decoding, or front-end error with source location.
///
/// User errors (`UnknownMnemonic`, `NoMatch`, `Syntax`, ...) reject a single
/// statement. `OutOfRange` and `BranchOutOfRange` are attached to otherwise
/// complete output. `NoEncoding` signals an internal inconsistency between
/// the resolver and the encoder and should never surface from text input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// The mnemonic has no catalog entries.
    UnknownMnemonic {
        /// The mnemonic that was not recognized.
        mnemonic: String,
        /// Source location of the statement.
        span: Span,
    },

    /// No catalog entry of the mnemonic accepts the given operands.
    NoMatch {
        /// The mnemonic that was looked up.
        mnemonic: String,
        /// Rendered operand list, comma separated.
        operands: String,
        /// Source location of the statement.
        span: Span,
    },

    /// A constant operand does not fit its encoded field.
    OutOfRange {
        /// The offending value.
        value: i64,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// Source location of the operand.
        span: Span,
    },

    /// A referenced symbol is neither a label nor an external definition.
    UndefinedSymbol {
        /// The undefined symbol name.
        symbol: String,
        /// Source location of the reference.
        span: Span,
    },

    /// Label was defined more than once.
    DuplicateLabel {
        /// The duplicated label name.
        label: String,
        /// Source location of the duplicate definition.
        span: Span,
        /// Source location of the first definition.
        first_span: Span,
    },

    /// A resolved relative branch does not fit the signed 8-bit displacement.
    BranchOutOfRange {
        /// The branch target symbol.
        symbol: String,
        /// The computed displacement.
        disp: i64,
        /// Maximum allowed magnitude.
        max: i64,
        /// Source location of the branch instruction.
        span: Span,
    },

    /// Malformed statement or operand text.
    Syntax {
        /// The syntax error message.
        msg: String,
        /// Source location of the syntax error.
        span: Span,
    },

    /// The byte source could not supply the bytes the decoder needed.
    Fetch {
        /// Address of the failed read.
        address: u32,
        /// Number of bytes requested.
        len: usize,
    },

    /// The encoder was handed operands its catalog entry cannot take.
    NoEncoding {
        /// Mnemonic of the entry being encoded.
        mnemonic: String,
        /// What was inconsistent.
        detail: String,
    },

    /// Multiple errors collected during assembly.
    Multiple {
        /// The collected errors.
        errors: Vec<AsmError>,
    },
}

impl AsmError {
    /// Source location of the error, if it has one.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            AsmError::UnknownMnemonic { span, .. }
            | AsmError::NoMatch { span, .. }
            | AsmError::OutOfRange { span, .. }
            | AsmError::UndefinedSymbol { span, .. }
            | AsmError::DuplicateLabel { span, .. }
            | AsmError::BranchOutOfRange { span, .. }
            | AsmError::Syntax { span, .. } => Some(*span),
            AsmError::Fetch { .. } | AsmError::NoEncoding { .. } => None,
            AsmError::Multiple { errors } => errors.first().and_then(AsmError::span),
        }
    }

    /// Whether this is an internal invariant violation rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            AsmError::NoEncoding { .. } => true,
            AsmError::Multiple { errors } => errors.iter().any(AsmError::is_internal),
            _ => false,
        }
    }

    /// Collapse a list of errors: one error stays as-is, several become
    /// [`AsmError::Multiple`]. Returns `None` for an empty list.
    #[must_use]
    pub fn collect(mut errors: Vec<AsmError>) -> Option<AsmError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(AsmError::Multiple { errors }),
        }
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownMnemonic { mnemonic, span } => {
                write!(f, "{}: unknown mnemonic '{}'", span, mnemonic)
            }
            AsmError::NoMatch {
                mnemonic,
                operands,
                span,
            } => {
                if operands.is_empty() {
                    write!(f, "{}: no form of '{}' takes no operands", span, mnemonic)
                } else {
                    write!(
                        f,
                        "{}: no form of '{}' accepts operands '{}'",
                        span, mnemonic, operands
                    )
                }
            }
            AsmError::OutOfRange {
                value,
                min,
                max,
                span,
            } => {
                write!(
                    f,
                    "{}: value {} out of range [{}..{}]",
                    span, value, min, max
                )
            }
            AsmError::UndefinedSymbol { symbol, span } => {
                write!(f, "{}: undefined symbol '{}'", span, symbol)
            }
            AsmError::DuplicateLabel {
                label,
                span,
                first_span,
            } => {
                write!(
                    f,
                    "{}: duplicate label '{}' (first defined at {})",
                    span, label, first_span
                )
            }
            AsmError::BranchOutOfRange {
                symbol,
                disp,
                max,
                span,
            } => {
                write!(
                    f,
                    "{}: branch target '{}' out of range (displacement={}, max=±{})",
                    span, symbol, disp, max
                )
            }
            AsmError::Syntax { msg, span } => {
                write!(f, "{}: {}", span, msg)
            }
            AsmError::Fetch { address, len } => {
                write!(f, "cannot read {} byte(s) at 0x{:06x}", len, address)
            }
            AsmError::NoEncoding { mnemonic, detail } => {
                write!(f, "internal error encoding '{}': {}", mnemonic, detail)
            }
            AsmError::Multiple { errors } => {
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AsmError {}
