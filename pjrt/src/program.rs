//! The input to compilation: a StableHLO (or HLO) program handed to the
//! plugin as a format tag plus a byte blob.
//!
//! `PJRT_Program::code_size` is the length of `code` the plugin should read;
//! whether it also expects a trailing NUL is left unspecified by the PJRT
//! header and plugin-dependent in practice. This implementation appends one
//! defensively (some plugins scan `code` as a C string internally) but keeps
//! `code_size` at the caller-supplied length, so a plugin that honors
//! `code_size` never sees it and one that doesn't still gets a safe byte to
//! stop on.

use pjrt_sys::PJRT_Program;

use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProgramFormat {
    MLIR,
    HLO,
}

impl ProgramFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramFormat::MLIR => "mlir",
            ProgramFormat::HLO => "hlo",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            ProgramFormat::MLIR => b"mlir",
            ProgramFormat::HLO => b"hlo",
        }
    }
}

impl TryFrom<&str> for ProgramFormat {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "mlir" => Ok(ProgramFormat::MLIR),
            "hlo" => Ok(ProgramFormat::HLO),
            _ => Err(Error::InvalidProgramFormat(value.to_string())),
        }
    }
}

/// A program ready to be compiled: a format tag (`"mlir"` or `"hlo"`) plus
/// the serialized program bytes.
pub struct Program {
    format: ProgramFormat,
    code: Vec<u8>,
    pub(crate) prog: PJRT_Program,
}

impl Program {
    /// Builds a program from raw bytes. `code_size` reported to the plugin
    /// is exactly `code.len()`; a single NUL byte is appended to the stored
    /// buffer but excluded from that count (see module docs).
    pub fn new(format: ProgramFormat, code: impl Into<Vec<u8>>) -> Self {
        let mut code = code.into();
        let reported_len = code.len();
        code.push(0);

        let mut program = Program {
            format,
            code,
            prog: PJRT_Program::new(),
        };
        program.prog.code = program.code.as_ptr() as *mut i8;
        program.prog.code_size = reported_len;
        let format_bytes = program.format.as_bytes();
        program.prog.format = format_bytes.as_ptr() as *const i8;
        program.prog.format_size = format_bytes.len();
        program
    }

    /// Convenience constructor for StableHLO (MLIR) text.
    pub fn stablehlo(code: impl Into<Vec<u8>>) -> Self {
        Self::new(ProgramFormat::MLIR, code)
    }

    pub fn format(&self) -> ProgramFormat {
        self.format
    }

    /// The program bytes as reported to the plugin (excludes the trailing
    /// NUL this type appends internally).
    pub fn code(&self) -> &[u8] {
        &self.code[..self.prog.code_size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_format_round_trips_through_str() {
        let format: ProgramFormat = "mlir".try_into().unwrap();
        assert_eq!(format, ProgramFormat::MLIR);
        assert_eq!(format.as_str(), "mlir");

        let result: Result<ProgramFormat> = "invalid".try_into();
        assert!(matches!(result, Err(Error::InvalidProgramFormat(_))));
    }

    #[test]
    fn code_size_excludes_the_appended_terminator() {
        let code = b"module {}".to_vec();
        let program = Program::stablehlo(code.clone());

        assert_eq!(program.prog.code_size, code.len());
        assert_eq!(program.code(), code.as_slice());
        // the terminator is present right after the reported length
        let raw = unsafe {
            std::slice::from_raw_parts(program.prog.code as *const u8, program.prog.code_size + 1)
        };
        assert_eq!(raw[program.prog.code_size], 0);
    }

    #[test]
    fn format_tag_bytes_match_format_size() {
        let program = Program::new(ProgramFormat::HLO, b"HLO_BINARY".to_vec());
        assert_eq!(program.prog.format_size, 3);
        let raw = unsafe {
            std::slice::from_raw_parts(program.prog.format as *const u8, program.prog.format_size)
        };
        assert_eq!(raw, b"hlo");
    }
}
