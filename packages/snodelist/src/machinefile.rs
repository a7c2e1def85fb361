use std::io::Write;

use tracing::{debug, warn};

use crate::{LineRenderer, TaskCounts};

/// Why a machinefile run stopped. None of these are errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum StopReason {
    /// Every host was rendered.
    HostsExhausted,

    /// The task-count list ran out while hosts remained.
    CountsExhausted,

    /// A host was assigned zero tasks, which ends the run.
    ZeroCount,
}

/// What a machinefile run produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct MachinefileSummary {
    /// The number of hosts that contributed their lines.
    pub hosts_rendered: usize,

    /// The number of lines written.
    pub lines_written: u64,

    /// Why the run stopped.
    pub stop: StopReason,
}

/// Writes an MPI-style machinefile: the lines of each host, in host order.
///
/// Hosts and task counts are walked in lockstep. The run stops at the first of: the hosts
/// running out, the task counts running out, or a host being assigned zero tasks.
///
/// # Errors
///
/// Returns an error if the task-count list is malformed or writing to `out` fails. Lines written
/// for earlier hosts stay written.
///
/// # Example
///
/// ```
/// use snodelist::{LineRenderer, StopReason, TaskCounts, Template, write_machinefile};
///
/// let renderer = LineRenderer::new(Template::parse("%h slots=%c").unwrap(), false);
/// let mut counts = TaskCounts::new("2,1(x2)");
/// let mut out = Vec::new();
///
/// let summary = write_machinefile(["n0", "n1", "n2"], &mut counts, &renderer, &mut out).unwrap();
///
/// assert_eq!(summary.stop, StopReason::HostsExhausted);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "n0 slots=2\nn1 slots=1\nn2 slots=1\n"
/// );
/// ```
pub fn write_machinefile<I>(
    hosts: I,
    counts: &mut TaskCounts<'_>,
    renderer: &LineRenderer,
    out: &mut impl Write,
) -> crate::Result<MachinefileSummary>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut summary = MachinefileSummary {
        hosts_rendered: 0,
        lines_written: 0,
        stop: StopReason::HostsExhausted,
    };

    for host in hosts {
        let host = host.as_ref();

        let Some(count) = counts.pull_next()? else {
            warn!(
                host,
                hosts_rendered = summary.hosts_rendered,
                "task counts exhausted before hosts, stopping"
            );
            summary.stop = StopReason::CountsExhausted;
            return Ok(summary);
        };

        if count == 0 {
            warn!(
                host,
                hosts_rendered = summary.hosts_rendered,
                "host has no tasks, stopping"
            );
            summary.stop = StopReason::ZeroCount;
            return Ok(summary);
        }

        let lines = renderer
            .write_host(host, count, out)
            .map_err(crate::Error::Output)?;

        summary.hosts_rendered = summary.hosts_rendered.saturating_add(1);
        summary.lines_written = summary.lines_written.saturating_add(u64::from(lines));
    }

    debug!(
        hosts_rendered = summary.hosts_rendered,
        lines_written = summary.lines_written,
        "machinefile complete"
    );

    Ok(summary)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io;

    use super::*;
    use crate::{DecodeError, Error, Template};

    fn machinefile(
        hosts: &[&str],
        counts: &str,
        template: &str,
        no_repeats: bool,
    ) -> (crate::Result<MachinefileSummary>, String) {
        let renderer = LineRenderer::new(Template::parse(template).unwrap(), no_repeats);
        let mut counts = TaskCounts::new(counts);
        let mut out = Vec::new();

        let result = write_machinefile(hosts.iter(), &mut counts, &renderer, &mut out);

        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn default_template() {
        let (result, output) = machinefile(
            &["n000", "n001", "n002", "n003"],
            "1,4(x2),8",
            Template::DEFAULT,
            false,
        );

        let summary = result.unwrap();
        assert_eq!(output, "n000\nn001:4\nn002:4\nn003:8\n");
        assert_eq!(summary.hosts_rendered, 4);
        assert_eq!(summary.lines_written, 4);
        assert_eq!(summary.stop, StopReason::HostsExhausted);
    }

    #[test]
    fn repeat_mode_writes_line_per_task() {
        let (result, output) = machinefile(&["n0", "n1"], "2,3", "%h", false);

        assert_eq!(output, "n0\nn0\nn1\nn1\nn1\n");
        assert_eq!(result.unwrap().lines_written, 5);
    }

    #[test]
    fn no_repeats_writes_line_per_host() {
        let (result, output) = machinefile(&["n0", "n1"], "2,3", "%h", true);

        assert_eq!(output, "n0\nn1\n");
        assert_eq!(result.unwrap().lines_written, 2);
    }

    #[test]
    fn zero_count_halts_run() {
        let (result, output) = machinefile(&["n0", "n1", "n2"], "2,0,5", "%h", false);

        let summary = result.unwrap();
        assert_eq!(output, "n0\nn0\n");
        assert_eq!(summary.hosts_rendered, 1);
        assert_eq!(summary.stop, StopReason::ZeroCount);
    }

    #[test]
    fn zero_count_halts_inline_run_too() {
        let (result, output) = machinefile(&["n0", "n1"], "0,5", "%h:%c", false);

        assert_eq!(output, "");
        assert_eq!(result.unwrap().stop, StopReason::ZeroCount);
    }

    #[test]
    fn counts_running_out_stops_early() {
        let (result, output) = machinefile(&["n0", "n1", "n2"], "3(x2)", "%h%[:]C", false);

        let summary = result.unwrap();
        assert_eq!(output, "n0:3\nn1:3\n");
        assert_eq!(summary.stop, StopReason::CountsExhausted);
    }

    #[test]
    fn surplus_counts_are_ignored() {
        let (result, output) = machinefile(&["n0"], "1,2,3", "%h %c", false);

        assert_eq!(output, "n0 1\n");
        assert_eq!(result.unwrap().stop, StopReason::HostsExhausted);
    }

    #[test]
    fn malformed_counts_keep_earlier_lines() {
        let (result, output) = machinefile(&["n0", "n1", "n2"], "1,2,x", "%h %c", false);

        assert_eq!(output, "n0 1\nn1 2\n");
        assert!(matches!(
            result.unwrap_err(),
            Error::TaskCount(DecodeError::InvalidInteger { offset: 4, .. })
        ));
    }

    #[test]
    fn no_hosts_pulls_no_counts() {
        let (result, output) = machinefile(&[], "garbage", "%h", false);

        assert_eq!(output, "");
        assert_eq!(result.unwrap().hosts_rendered, 0);
    }

    #[derive(Debug)]
    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_output_error() {
        let renderer = LineRenderer::new(Template::parse("%h").unwrap(), false);
        let mut counts = TaskCounts::new("1");

        let result = write_machinefile(["n0"], &mut counts, &renderer, &mut FailingWriter);

        assert!(matches!(result.unwrap_err(), Error::Output(_)));
    }
}
