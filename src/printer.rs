//! User-facing messages.
//!
//! Log records go through `tracing`; the messages here are the command's
//! own output and are always plain text.

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Default `tracing` filter directive when `WORKGEN_LOG` is unset.
    pub fn log_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Fire-and-forget sink for the command's warning and success messages.
pub trait MessageSink {
    fn warning(&self, text: &str);
    fn success(&self, text: &str);
}

#[derive(Debug, Clone, Copy)]
pub struct TerminalPrinter {
    verbosity: Verbosity,
}

impl TerminalPrinter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl MessageSink for TerminalPrinter {
    fn warning(&self, text: &str) {
        if self.verbosity != Verbosity::Quiet {
            eprintln!("warning: {text}");
        }
    }

    fn success(&self, text: &str) {
        if self.verbosity != Verbosity::Quiet {
            println!("{text}");
        }
    }
}
