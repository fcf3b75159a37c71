//! PJRT error handling.
//!
//! Every operation that calls into the plugin returns `Result<T>`. A single
//! [`Error`] enum distinguishes a non-null `PJRT_Error*` surfaced by the
//! plugin (`PjrtError`, carrying the plugin's own message and code) from
//! errors the wrapper detects itself (bad arguments, a plugin that couldn't
//! be loaded, a missing function pointer).

#![allow(unused_assignments)]

use pjrt_sys::{
    PJRT_Error_Code, PJRT_Error_Code_PJRT_Error_Code_ABORTED,
    PJRT_Error_Code_PJRT_Error_Code_ALREADY_EXISTS, PJRT_Error_Code_PJRT_Error_Code_CANCELLED,
    PJRT_Error_Code_PJRT_Error_Code_DATA_LOSS, PJRT_Error_Code_PJRT_Error_Code_DEADLINE_EXCEEDED,
    PJRT_Error_Code_PJRT_Error_Code_FAILED_PRECONDITION, PJRT_Error_Code_PJRT_Error_Code_INTERNAL,
    PJRT_Error_Code_PJRT_Error_Code_INVALID_ARGUMENT, PJRT_Error_Code_PJRT_Error_Code_NOT_FOUND,
    PJRT_Error_Code_PJRT_Error_Code_OUT_OF_RANGE,
    PJRT_Error_Code_PJRT_Error_Code_PERMISSION_DENIED,
    PJRT_Error_Code_PJRT_Error_Code_RESOURCE_EXHAUSTED,
    PJRT_Error_Code_PJRT_Error_Code_UNAUTHENTICATED, PJRT_Error_Code_PJRT_Error_Code_UNAVAILABLE,
    PJRT_Error_Code_PJRT_Error_Code_UNIMPLEMENTED, PJRT_Error_Code_PJRT_Error_Code_UNKNOWN,
};

use crate::ty::PrimitiveType;

/// Error type for PJRT operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A PJRT call returned a non-null `PJRT_Error*`.
    #[error("{function}: {msg} (code: {code:?})\n{backtrace}")]
    PjrtError {
        /// The PJRT function that returned this error.
        function: &'static str,
        /// The message extracted via `PJRT_Error_Message`.
        msg: String,
        /// The code extracted via `PJRT_Error_GetCode`.
        code: ErrorCode,
        /// A captured backtrace, taken at the point of conversion.
        backtrace: String,
    },

    #[error("null function pointer: {0}")]
    NullFunctionPointer(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no addressable device")]
    NoAddressableDevice,

    #[error("invalid primitive type: {0}")]
    InvalidPrimitiveType(i32),

    #[error("invalid error code: {0}")]
    InvalidErrorCode(i32),

    #[error("invalid program format: {0}")]
    InvalidProgramFormat(String),

    #[error("not supported type: {0:?}")]
    NotSupportedType(PrimitiveType),

    #[error("null pointer")]
    NullPointer,

    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    #[error("plugin API version mismatch: {0}")]
    VersionMismatch(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("lib loading error: {0}")]
    LibLoadingError(#[from] libloading::Error),
}

impl Error {
    /// The PJRT error code for this error, or `Internal` for wrapper-side
    /// errors that have no plugin-reported code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::PjrtError { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// The PJRT function name this error originated from, if any.
    pub fn function(&self) -> Option<&'static str> {
        match self {
            Error::PjrtError { function, .. } => Some(function),
            Error::NullFunctionPointer(name) => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Mirrors the PJRT error code space (`PJRT_Error_Code`).
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorCode {
    Cancelled = PJRT_Error_Code_PJRT_Error_Code_CANCELLED as i32,
    Unknown = PJRT_Error_Code_PJRT_Error_Code_UNKNOWN as i32,
    InvalidArgument = PJRT_Error_Code_PJRT_Error_Code_INVALID_ARGUMENT as i32,
    DeadlineExceeded = PJRT_Error_Code_PJRT_Error_Code_DEADLINE_EXCEEDED as i32,
    NotFound = PJRT_Error_Code_PJRT_Error_Code_NOT_FOUND as i32,
    AlreadyExists = PJRT_Error_Code_PJRT_Error_Code_ALREADY_EXISTS as i32,
    PermissionDenied = PJRT_Error_Code_PJRT_Error_Code_PERMISSION_DENIED as i32,
    ResourceExhausted = PJRT_Error_Code_PJRT_Error_Code_RESOURCE_EXHAUSTED as i32,
    FailedPrecondition = PJRT_Error_Code_PJRT_Error_Code_FAILED_PRECONDITION as i32,
    Aborted = PJRT_Error_Code_PJRT_Error_Code_ABORTED as i32,
    OutOfRange = PJRT_Error_Code_PJRT_Error_Code_OUT_OF_RANGE as i32,
    Unimplemented = PJRT_Error_Code_PJRT_Error_Code_UNIMPLEMENTED as i32,
    Internal = PJRT_Error_Code_PJRT_Error_Code_INTERNAL as i32,
    Unavailable = PJRT_Error_Code_PJRT_Error_Code_UNAVAILABLE as i32,
    DataLoss = PJRT_Error_Code_PJRT_Error_Code_DATA_LOSS as i32,
    Unauthenticated = PJRT_Error_Code_PJRT_Error_Code_UNAUTHENTICATED as i32,
}

impl TryFrom<PJRT_Error_Code> for ErrorCode {
    type Error = Error;

    #[allow(non_snake_case)]
    fn try_from(code: PJRT_Error_Code) -> Result<Self> {
        match code {
            PJRT_Error_Code_PJRT_Error_Code_CANCELLED => Ok(Self::Cancelled),
            PJRT_Error_Code_PJRT_Error_Code_UNKNOWN => Ok(Self::Unknown),
            PJRT_Error_Code_PJRT_Error_Code_INVALID_ARGUMENT => Ok(Self::InvalidArgument),
            PJRT_Error_Code_PJRT_Error_Code_DEADLINE_EXCEEDED => Ok(Self::DeadlineExceeded),
            PJRT_Error_Code_PJRT_Error_Code_NOT_FOUND => Ok(Self::NotFound),
            PJRT_Error_Code_PJRT_Error_Code_ALREADY_EXISTS => Ok(Self::AlreadyExists),
            PJRT_Error_Code_PJRT_Error_Code_PERMISSION_DENIED => Ok(Self::PermissionDenied),
            PJRT_Error_Code_PJRT_Error_Code_RESOURCE_EXHAUSTED => Ok(Self::ResourceExhausted),
            PJRT_Error_Code_PJRT_Error_Code_FAILED_PRECONDITION => Ok(Self::FailedPrecondition),
            PJRT_Error_Code_PJRT_Error_Code_ABORTED => Ok(Self::Aborted),
            PJRT_Error_Code_PJRT_Error_Code_OUT_OF_RANGE => Ok(Self::OutOfRange),
            PJRT_Error_Code_PJRT_Error_Code_UNIMPLEMENTED => Ok(Self::Unimplemented),
            PJRT_Error_Code_PJRT_Error_Code_INTERNAL => Ok(Self::Internal),
            PJRT_Error_Code_PJRT_Error_Code_UNAVAILABLE => Ok(Self::Unavailable),
            PJRT_Error_Code_PJRT_Error_Code_DATA_LOSS => Ok(Self::DataLoss),
            PJRT_Error_Code_PJRT_Error_Code_UNAUTHENTICATED => Ok(Self::Unauthenticated),
            _ => Err(Error::InvalidErrorCode(code as i32)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_round_trips_known_values() {
        let code: ErrorCode = PJRT_Error_Code_PJRT_Error_Code_INTERNAL.try_into().unwrap();
        assert_eq!(code, ErrorCode::Internal);
        assert_eq!(code as i32, PJRT_Error_Code_PJRT_Error_Code_INTERNAL as i32);
    }

    #[test]
    fn unknown_error_code_is_rejected() {
        let invalid: PJRT_Error_Code = 9999;
        let result: Result<ErrorCode> = invalid.try_into();
        match result {
            Err(Error::InvalidErrorCode(code)) => assert_eq!(code, 9999),
            _ => panic!("expected InvalidErrorCode"),
        }
    }

    #[test]
    fn pjrt_error_reports_its_own_code_and_function() {
        let err = Error::PjrtError {
            function: "PJRT_Client_Create",
            msg: "boom".to_string(),
            code: ErrorCode::Internal,
            backtrace: String::new(),
        };
        assert_eq!(err.code(), ErrorCode::Internal);
        assert_eq!(err.function(), Some("PJRT_Client_Create"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn wrapper_side_errors_default_to_internal_code() {
        assert_eq!(Error::NullPointer.code(), ErrorCode::Internal);
        assert_eq!(Error::NullFunctionPointer("x").function(), Some("x"));
    }
}
