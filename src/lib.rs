//! rfcli - CLI support library for SDR tools
//!
//! Three cross-cutting facilities shared by every tool that talks to SDR
//! hardware:
//!
//! - **Backend registry** ([`Registry`]): maps a backend name to a
//!   "declare flags, then construct device" pair, so a CLI supports many
//!   radio families without a branching switch. Backends are cargo
//!   features; any can be excluded at build time.
//! - **Shutdown supervisor** ([`Context`]): unifies an optional
//!   `--timeout` deadline and SIGINT/SIGTERM into one cancellable
//!   context, with a watchdog that force-terminates a process whose
//!   shutdown path hangs.
//! - **Flag conveniences** ([`FlagSet`]): prefix-namespaced flag
//!   declaration with `RF_*` environment-variable defaults.
//!
//! # Example
//!
//! ```no_run
//! use clap::Command;
//! use rfcli::{register_context_flags, Context, Registry};
//!
//! # fn main() -> rfcli::Result<()> {
//! let registry = Registry::builtin();
//!
//! let cmd = Command::new("rx-tool");
//! let cmd = registry.declare_flags(cmd, "");
//! let cmd = register_context_flags(cmd);
//! let matches = cmd.get_matches();
//!
//! let ctx = Context::install(&matches);
//! let loaded = registry.construct(&matches, "")?;
//!
//! println!(
//!     "tuned to {} at {} sps",
//!     loaded.frequency, loaded.sample_rate
//! );
//!
//! // ... stream until ctx.is_cancelled() ...
//! ctx.wait();
//! # Ok(())
//! # }
//! ```

mod backends;
pub mod context;
pub mod flags;
pub mod registry;

pub use context::{install_signal_handler, register_context_flags, Context, Watchdog};
pub use flags::FlagSet;
pub use registry::{LoadedSdr, Registry};

// Re-export the shared vocabulary so simple tools need only this crate.
pub use rfcli_core::{parse_gain_map, Error, GainMap, Hz, Result, Sdr};
