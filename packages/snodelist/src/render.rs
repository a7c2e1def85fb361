use std::io::{self, Write};
use std::iter::{self, RepeatN};

use crate::Template;

/// How many lines a host contributes to a machinefile, decided once per run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RenderPolicy {
    /// The template shows the count itself, so each host gets exactly one line.
    Inline,

    /// The template has no count token and repeats were disabled: one line per host, the count
    /// is not shown at all.
    Once,

    /// The template has no count token: each host gets one identical line per task.
    Repeat,
}

impl RenderPolicy {
    /// Selects the policy for a template.
    #[must_use]
    pub fn new(has_count_token: bool, no_repeats: bool) -> Self {
        if has_count_token {
            Self::Inline
        } else if no_repeats {
            Self::Once
        } else {
            Self::Repeat
        }
    }

    /// The number of lines a host with the given task count contributes.
    #[must_use]
    pub fn lines_per_host(self, count: u32) -> u32 {
        match self {
            Self::Inline | Self::Once => 1,
            Self::Repeat => count,
        }
    }
}

/// Renders the machinefile lines of individual hosts.
///
/// ```
/// use snodelist::{LineRenderer, Template};
///
/// let renderer = LineRenderer::new(Template::parse("%h").unwrap(), false);
/// assert_eq!(
///     renderer.render("n003", 3).collect::<Vec<_>>(),
///     vec!["n003", "n003", "n003"]
/// );
///
/// let renderer = LineRenderer::new(Template::parse("%h%[:]C").unwrap(), false);
/// assert_eq!(renderer.render("n003", 3).collect::<Vec<_>>(), vec!["n003:3"]);
/// ```
#[derive(Clone, Debug)]
pub struct LineRenderer {
    template: Template,
    policy: RenderPolicy,
}

impl LineRenderer {
    /// Creates a renderer for a compiled template.
    ///
    /// `no_repeats` only matters for templates without a count token: it makes such templates
    /// produce one line per host instead of one line per task.
    #[must_use]
    pub fn new(template: Template, no_repeats: bool) -> Self {
        let policy = RenderPolicy::new(template.has_count_token(), no_repeats);

        Self { template, policy }
    }

    /// The policy selected for this run.
    #[must_use]
    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    /// Returns the lines for one host, without line terminators.
    ///
    /// The line is rendered once and handed out as often as the policy asks for, so large counts
    /// cost nothing until the lines are consumed. Under [`RenderPolicy::Repeat`], a count of zero
    /// produces no lines.
    pub fn render(&self, host: &str, count: u32) -> RepeatN<String> {
        let line = self.template.render_line(host, count);
        let repeats = usize::try_from(self.policy.lines_per_host(count)).unwrap_or(usize::MAX);

        iter::repeat_n(line, repeats)
    }

    /// Writes the lines for one host, each followed by `\n`, and returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails. Lines written before the failure stay written.
    pub fn write_host(&self, host: &str, count: u32, out: &mut impl Write) -> io::Result<u32> {
        let line = self.template.render_line(host, count);
        let repeats = self.policy.lines_per_host(count);

        for _ in 0..repeats {
            writeln!(out, "{line}")?;
        }

        Ok(repeats)
    }
}
