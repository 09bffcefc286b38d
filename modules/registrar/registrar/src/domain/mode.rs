use std::fmt;

/// Which phases of a registration run execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Withdraw, then register NFS and MOUNT (plus configured local sockets).
    #[default]
    Full,
    /// Withdraw only.
    UnsetOnly,
    /// Withdraw (including STAT v1), then register STAT on its fixed ports.
    StatdOnly,
}

impl Mode {
    /// Derive the mode from the `-u` / `-s` invocation flags.
    ///
    /// When both are given, unset-only wins: nothing is registered and the
    /// status service is left alone.
    #[must_use]
    pub const fn from_flags(unset_only: bool, statd_only: bool) -> Self {
        match (unset_only, statd_only) {
            (true, _) => Mode::UnsetOnly,
            (false, true) => Mode::StatdOnly,
            (false, false) => Mode::Full,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::UnsetOnly => "unset-only",
            Mode::StatdOnly => "statd-only",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
