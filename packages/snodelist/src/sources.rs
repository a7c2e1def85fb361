// Collection of host-list expressions from environment variables, nodelist files and arguments.

use hostlist::HostList;
use tracing::debug;

use crate::pal::Environment;
use crate::{JOB_NODELIST_VAR, RunInput};

/// Builds the host list for expand and compress modes.
///
/// Sources are read in a fixed order: environment variables, then nodelist files, then the
/// expressions given directly. Unset environment variables contribute nothing. If no source was
/// named at all, the job's host list variable is used.
pub(crate) fn collect_hosts(input: &RunInput, env: &impl Environment) -> crate::Result<HostList> {
    let mut hosts = HostList::new();

    let default_env = [JOB_NODELIST_VAR.to_string()];
    let env_vars = if input.include_env.is_empty()
        && input.nodelists.is_empty()
        && input.expressions.is_empty()
    {
        default_env.as_slice()
    } else {
        input.include_env.as_slice()
    };

    for name in env_vars {
        match env.var(name) {
            Some(expression) => hosts.push(&expression)?,
            None => debug!(name = name.as_str(), "environment variable not set, skipping"),
        }
    }

    for path in &input.nodelists {
        let contents =
            env.read_nodelist(path)
                .map_err(|source| crate::Error::NodelistUnreadable {
                    path: path.clone(),
                    source,
                })?;

        for expression in nodelist_expressions(&contents) {
            hosts.push(expression)?;
        }
    }

    for expression in &input.expressions {
        hosts.push(expression)?;
    }

    debug!(hosts = hosts.len(), "collected host list");

    Ok(hosts)
}

/// Splits nodelist file contents into host-list expressions.
///
/// Expressions are separated by whitespace. A token starting with `#` comments out the rest of
/// its line.
pub(crate) fn nodelist_expressions(contents: &str) -> impl Iterator<Item = &str> {
    contents.lines().flat_map(|line| {
        line.split_whitespace()
            .take_while(|token| !token.starts_with('#'))
    })
}
