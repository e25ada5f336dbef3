//! # site-ops
//!
//! Operational tooling for a family of static book sites. Two independent
//! tools share this crate:
//!
//! - **[`deploy`]**: packages a local build directory, ships it to a shared
//!   host over ssh/scp, unpacks it in place, normalizes HTML permissions and
//!   optionally purges the Cloudflare cache.
//! - **[`dashboard`]**: reads each book's per-language `media.json` and
//!   renders a single HTML page for manual QA of every chapter page, audio
//!   file and PDF.
//!
//! # Architecture
//!
//! Both tools are one sequential pass over a handful of inputs. Neither keeps
//! state between runs beyond its outputs.
//!
//! ## Explicit Configuration
//!
//! The deploy configuration is read from the environment exactly once, in
//! [`deploy::DeployConfig::from_lookup`], and passed down by reference.
//! Nothing below that point calls `std::env`, and validation runs before
//! any side effect.
//!
//! ## Substitutable External Tools
//!
//! `ssh`, `scp` and `sshpass` are reached through
//! [`deploy::CommandRunner`]; the Cloudflare API through
//! [`deploy::CachePurger`]. Production code uses [`deploy::SystemRunner`]
//! and [`deploy::CloudflarePurger`]; tests record commands instead.
//!
//! ## Tagged Step Outcomes
//!
//! Every deploy step reports a [`deploy::StepOutcome`]. Which failures
//! abort the run and which are only warnings is decided by
//! [`deploy::Step::is_required`], not by error-handling conventions.
//!
//! ## Missing vs Malformed Manifests
//!
//! A language without `media.json` is a normal state in the dashboard and
//! renders as a notice. A manifest that exists but doesn't parse stops the
//! whole run and leaves any previous dashboard untouched.

pub mod dashboard;
pub mod deploy;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
