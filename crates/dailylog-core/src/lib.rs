//! # dailylog Core Library
//!
//! This library provides the core logic for dailylog, a single-user habit
//! tracker that groups routines into daily time bands (Morning, Afternoon,
//! Evening) and records completion logs.
//!
//! ## Architecture
//!
//! - **Routine / Log stores**: ordered routine definitions and completion events
//! - **Daily window**: local-midnight boundaries shared by every "today" check
//! - **Ordering engine**: category-scoped moves applied to one global order
//! - **Focus selector**: completion counts and the next routine to present,
//!   honoring session postponement and per-day skips
//! - **Storage**: SQLite persistence, JSON snapshots and TOML configuration
//!
//! The engine modules are pure; a [`Session`] owns the state, and its owner
//! decides when to persist.
//!
//! ## Key Components
//!
//! - [`Session`]: state container and entry point for user events
//! - [`select_focus`]: the focus queue derivation
//! - [`reorder`]: the category-scoped reorder
//! - [`Database`]: routine, log and skip-set persistence
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod focus;
pub mod history;
pub mod ordering;
pub mod routine;
pub mod session;
pub mod storage;
pub mod window;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use focus::{select_focus, DailyState, FocusSnapshot, PostponeQueue, SkipSet};
pub use history::{HistoryEntry, RoutineCount};
pub use ordering::{reorder, Direction};
pub use routine::{Category, LogStore, Routine, RoutineLog, RoutineStore};
pub use session::{Session, Toggle};
pub use storage::{Config, Database, RoutineRepository, SkipRepository, Snapshot};
pub use window::{today_start, DailyWindow};
