//! Grading workflows for C programming assignments.
//!
//! Two independent workflows share this crate's plumbing:
//!
//! - **[`compare`]**: compiles the text comparator and runs it over every
//!   case directory under the comparison root, reporting each exit code.
//! - **[`submit`]**: builds a student submission, runs it against its
//!   configuration file, and removes the build artifacts.
//!
//! Every operation takes absolute paths resolved against an explicit base
//! directory ([`paths`]); nothing here changes the process working directory
//! or exits the process. [`exit_codes`] maps outcomes to process status.

pub mod cli;
pub mod compare;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod paths;
pub mod process;
pub mod results;
pub mod submit;
