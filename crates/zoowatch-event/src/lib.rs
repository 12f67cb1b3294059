//! zoowatch Guess Event
//!
//! Moderates the channel of a "guess the mascot" event.
//!
//! Every message in the monitored channel is classified:
//! - Messages naming an animal get a reaction and a report in the log channel
//! - Everything else is deleted, with a short-lived notice to the author
//!
//! Chat side effects go through [`ModerationActions`], so the handler can run
//! against a live bot, a webhook relay, or a recording stub.

pub mod actions;
pub mod config;
pub mod handler;
pub mod mascot;
pub mod metrics;
pub mod report;

pub use actions::{ModerationActions, NoticeId};
pub use config::EventConfig;
pub use handler::{GuessEventHandler, Verdict};
pub use mascot::MascotMatcher;
pub use metrics::{EventMetrics, EventMetricsSnapshot};
pub use report::{LogReport, ReportAuthor, ReportField, ReportKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::{ModerationActions, NoticeId};
    pub use crate::config::EventConfig;
    pub use crate::handler::{GuessEventHandler, Verdict};
    pub use crate::report::LogReport;
}
