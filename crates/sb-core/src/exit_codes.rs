//! Exit codes for the steepbook CLI.
//!
//! Exit code ranges:
//! - 0-9: Success/operational outcomes
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

/// Exit codes for steepbook commands.
///
/// Stable contract for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Clean = 0,

    /// Import kept only the valid subset of records
    PartialImport = 3,

    /// User declined a confirmation prompt
    Declined = 4,

    /// Invalid arguments (bad index, bad datetime, unknown format)
    ArgsError = 10,

    /// Import rejected as a whole
    ImportError = 15,

    /// Export could not be encoded or written
    ExportError = 16,

    /// Session store could not be read or written
    StorageError = 17,

    /// Internal error (bug - please report)
    InternalError = 20,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }

    /// Codes below 10 describe how the command went rather than an error.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::PartialImport => "OK_PARTIAL",
            ExitCode::Declined => "DECLINED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ImportError => "ERR_IMPORT",
            ExitCode::ExportError => "ERR_EXPORT",
            ExitCode::StorageError => "ERR_STORAGE",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::PartialImport.is_operational());
        assert!(!ExitCode::PartialImport.is_success());
        assert!(ExitCode::Declined.is_operational());
        for code in [
            ExitCode::ArgsError,
            ExitCode::ImportError,
            ExitCode::ExportError,
            ExitCode::StorageError,
        ] {
            assert!(code.is_user_error(), "{code}");
        }
        assert!(ExitCode::InternalError.is_internal_error());
    }

    #[test]
    fn display_includes_number() {
        assert_eq!(ExitCode::ImportError.to_string(), "ERR_IMPORT (15)");
        assert_eq!(i32::from(ExitCode::StorageError), 17);
    }
}
