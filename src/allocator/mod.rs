//! Prompt directory allocation
//!
//! Directory names have the form `{month}-{day}-{year2}-{seq}-{slug}`. The
//! sequence number disambiguates directories created on the same day; the
//! filesystem is the only record of which numbers are taken.

pub mod create;
pub mod naming;
pub mod template;

pub use create::{allocate, write_session_id};
pub use naming::{date_prefix, next_sequence, plan_name, slugify};
pub use template::prompt_template;
