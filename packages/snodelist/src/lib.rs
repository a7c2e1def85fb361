#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Display cluster host lists in expanded or compressed form and generate MPI-style machine
//! files from a job's host list and task counts.
//!
//! The host list itself is handled by the [`hostlist`] package. This crate adds:
//!
//! * [`TaskCounts`], a decoder for compact task-count lists such as `1,4(x2),8`, which hands out
//!   one count per host on demand;
//! * [`Template`] and [`LineRenderer`], which turn a host name and its task count into machinefile
//!   lines according to a format such as `%h%[:]C`;
//! * [`write_machinefile()`], which walks hosts and task counts in lockstep.
//!
//! # Example
//!
//! ```
//! use snodelist::{LineRenderer, TaskCounts, Template, write_machinefile};
//!
//! let hosts = hostlist::HostList::parse("n[000-003]").unwrap();
//! let mut counts = TaskCounts::new("1,4(x2),8");
//! let renderer = LineRenderer::new(Template::parse(Template::DEFAULT).unwrap(), false);
//!
//! let mut out = Vec::new();
//! write_machinefile(hosts.iter(), &mut counts, &renderer, &mut out).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "n000\nn001:4\nn002:4\nn003:8\n"
//! );
//! ```
//!
//! The binary in this package wraps [`run()`] with a command line interface.

mod error;
mod machinefile;
mod pal;
mod render;
mod sources;
mod task_counts;
mod template;
mod types;

use std::io::Write;

use hostlist::HostList;
use itertools::Itertools;
use tracing::debug;

pub use error::*;
pub use machinefile::*;
use pal::{Environment, EnvironmentFacade};
pub use render::*;
use sources::collect_hosts;
pub use task_counts::*;
pub use template::*;
pub use types::*;

/// Core logic of the tool, extracted for testability.
///
/// This function contains all the business logic without any process-global dependencies
/// like `std::env::args()`, making it suitable for direct testing.
///
/// # Errors
///
/// Returns an error if any input is malformed, a required environment variable is missing, a
/// nodelist file cannot be read or writing to `out` fails.
#[doc(hidden)]
pub fn run(input: &RunInput, out: &mut impl Write) -> Result<RunOutcome> {
    run_with_environment(input, &EnvironmentFacade::target(), out)
}

/// Internal implementation of `run` that accepts an environment abstraction.
///
/// This allows mocking environment variables and nodelist files in tests.
fn run_with_environment(
    input: &RunInput,
    env: &impl Environment,
    out: &mut impl Write,
) -> Result<RunOutcome> {
    debug!(mode = ?input.mode, "starting");

    match input.mode {
        Mode::Expand | Mode::Compress => {
            let mut hosts = collect_hosts(input, env)?;

            if input.unique {
                hosts.uniq();
            }

            write_listing(&hosts, input, out)?;

            Ok(RunOutcome::Listed { hosts: hosts.len() })
        }
        Mode::Machinefile => run_machinefile(input, env, out).map(RunOutcome::Machinefile),
    }
}

fn write_listing(hosts: &HostList, input: &RunInput, out: &mut impl Write) -> Result<()> {
    if hosts.is_empty() {
        return Ok(());
    }

    let written = match input.mode {
        Mode::Compress => writeln!(out, "{}", hosts.ranged()),
        _ => writeln!(out, "{}", hosts.iter().join(&input.delimiter)),
    };

    written.map_err(Error::Output)
}

fn run_machinefile(
    input: &RunInput,
    env: &impl Environment,
    out: &mut impl Write,
) -> Result<MachinefileSummary> {
    let node_list = required_var(env, JOB_NODELIST_VAR)?;
    let task_counts = required_var(env, TASKS_PER_NODE_VAR)?;

    let renderer = LineRenderer::new(Template::parse(&input.format)?, input.no_repeats);
    debug!(
        policy = ?renderer.policy(),
        template = input.format.as_str(),
        "compiled line template"
    );

    let hosts = HostList::parse(&node_list)?;
    let mut counts = TaskCounts::new(&task_counts);

    write_machinefile(hosts, &mut counts, &renderer, out)
}

fn required_var(env: &impl Environment, name: &str) -> Result<String> {
    env.var(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::MissingEnvironment {
            name: name.to_string(),
        })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::pal::MockEnvironment;

    fn job_environment(nodelist: &'static str, tasks: &'static str) -> EnvironmentFacade {
        let mut mock = MockEnvironment::new();
        mock.expect_var()
            .with(eq(JOB_NODELIST_VAR))
            .returning(move |_| Some(nodelist.to_string()));
        mock.expect_var()
            .with(eq(TASKS_PER_NODE_VAR))
            .returning(move |_| Some(tasks.to_string()));
        EnvironmentFacade::from_mock(mock)
    }

    fn run_to_string(input: &RunInput, env: &EnvironmentFacade) -> (Result<RunOutcome>, String) {
        let mut out = Vec::new();
        let result = run_with_environment(input, env, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn expand_uses_delimiter() {
        let env = job_environment("n[1-3]", "1");
        let input = RunInput {
            delimiter: ",".to_string(),
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "n1,n2,n3\n");
        assert_eq!(result.unwrap(), RunOutcome::Listed { hosts: 3 });
    }

    #[test]
    fn expand_defaults_to_newlines() {
        let env = job_environment("n[1-2]", "1");

        let (_, output) = run_to_string(&RunInput::default(), &env);

        assert_eq!(output, "n1\nn2\n");
    }

    #[test]
    fn compress_with_unique() {
        let env = job_environment("unused", "1");
        let input = RunInput {
            mode: Mode::Compress,
            unique: true,
            expressions: vec!["n[5-6],n[1-3]".to_string(), "n4,n2".to_string()],
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "n[1-6]\n");
        assert_eq!(result.unwrap(), RunOutcome::Listed { hosts: 6 });
    }

    #[test]
    fn compress_keeps_order_without_unique() {
        let env = job_environment("unused", "1");
        let input = RunInput {
            mode: Mode::Compress,
            expressions: vec!["n[5-6],n[1-3]".to_string()],
            ..RunInput::default()
        };

        let (_, output) = run_to_string(&input, &env);

        assert_eq!(output, "n[5-6,1-3]\n");
    }

    #[test]
    fn empty_list_prints_nothing() {
        let mut mock = MockEnvironment::new();
        mock.expect_var().returning(|_| None);
        let env = EnvironmentFacade::from_mock(mock);

        let (result, output) = run_to_string(&RunInput::default(), &env);

        assert_eq!(output, "");
        assert_eq!(result.unwrap(), RunOutcome::Listed { hosts: 0 });
    }

    #[test]
    fn machinefile_default_format() {
        let env = job_environment("n[000-003]", "1,4(x2),8");
        let input = RunInput {
            mode: Mode::Machinefile,
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "n000\nn001:4\nn002:4\nn003:8\n");
        assert!(matches!(
            result.unwrap(),
            RunOutcome::Machinefile(MachinefileSummary {
                hosts_rendered: 4,
                stop: StopReason::HostsExhausted,
                ..
            })
        ));
    }

    #[test]
    fn machinefile_repeats_and_no_repeats() {
        let env = job_environment("n[1-2]", "2(x2)");
        let mut input = RunInput {
            mode: Mode::Machinefile,
            format: "%h".to_string(),
            ..RunInput::default()
        };

        let (_, output) = run_to_string(&input, &env);
        assert_eq!(output, "n1\nn1\nn2\nn2\n");

        input.no_repeats = true;
        let (_, output) = run_to_string(&input, &env);
        assert_eq!(output, "n1\nn2\n");
    }

    #[test]
    fn machinefile_ignores_explicit_sources() {
        let env = job_environment("n1", "3");
        let input = RunInput {
            mode: Mode::Machinefile,
            format: "%h %c".to_string(),
            expressions: vec!["other[1-9]".to_string()],
            ..RunInput::default()
        };

        let (_, output) = run_to_string(&input, &env);

        assert_eq!(output, "n1 3\n");
    }

    #[test]
    fn machinefile_requires_task_counts() {
        let env = job_environment("n[1-2]", "");
        let input = RunInput {
            mode: Mode::Machinefile,
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "");
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingEnvironment { ref name } if name == TASKS_PER_NODE_VAR
        ));
    }

    #[test]
    fn machinefile_requires_nodelist() {
        let mut mock = MockEnvironment::new();
        mock.expect_var().returning(|_| None);
        let env = EnvironmentFacade::from_mock(mock);
        let input = RunInput {
            mode: Mode::Machinefile,
            ..RunInput::default()
        };

        let (result, _) = run_to_string(&input, &env);

        assert!(matches!(
            result.unwrap_err(),
            Error::MissingEnvironment { ref name } if name == JOB_NODELIST_VAR
        ));
    }

    #[test]
    fn machinefile_bad_template_writes_nothing() {
        let env = job_environment("n[1-2]", "2(x2)");
        let input = RunInput {
            mode: Mode::Machinefile,
            format: "%h%c%[:".to_string(),
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "");
        assert!(matches!(result.unwrap_err(), Error::Template(_)));
    }

    #[test]
    fn machinefile_unterminated_delimiter_before_count_writes_nothing() {
        let env = job_environment("n[1-2]", "3(x2)");
        let input = RunInput {
            mode: Mode::Machinefile,
            format: "%h%[:%c".to_string(),
            ..RunInput::default()
        };

        let (result, output) = run_to_string(&input, &env);

        assert_eq!(output, "");
        assert!(matches!(
            result.unwrap_err(),
            Error::Template(TemplateError::UnterminatedDelimiter { .. })
        ));
    }

    #[test]
    fn machinefile_bad_counts_is_error() {
        let env = job_environment("n[1-2]", "2(x0)");
        let input = RunInput {
            mode: Mode::Machinefile,
            ..RunInput::default()
        };

        let (result, _) = run_to_string(&input, &env);

        assert!(matches!(
            result.unwrap_err(),
            Error::TaskCount(DecodeError::InvalidRepeatCount { offset: 3, .. })
        ));
    }
}
