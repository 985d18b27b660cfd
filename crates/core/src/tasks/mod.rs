//! Step providers for the concrete testing tasks
//!
//! Each provider owns its parameters (configured fluently), borrows the
//! command executor it needs, and exposes predicate-returning step
//! methods that the orchestrator composes into ordered [`crate::execution::Task`]s.

pub mod app_setup;
pub mod cms_setup;
pub mod code_checks;
pub mod codecept;
pub mod reporting;
pub mod selenium;

pub use app_setup::ApplicationSetup;
pub use cms_setup::CmsSetup;
pub use code_checks::CodeChecks;
pub use codecept::Codeception;
pub use reporting::Reporting;
pub use selenium::SeleniumServer;
