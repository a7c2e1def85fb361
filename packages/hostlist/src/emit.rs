use itertools::Itertools;

use crate::name::{HostName, Suffix};

/// Generates the compact form of a sequence of host names, in a format that can be expanded
/// again by [`expand()`][crate::expand].
///
/// Host order is preserved: only neighbouring hosts are merged into ranges, and only neighbouring
/// ranges with the same prefix share a bracket group. Sort and deduplicate first (see
/// [`HostList::uniq()`][crate::HostList::uniq]) to get the most compact output.
pub fn compress<'a>(hosts: impl IntoIterator<Item = &'a str>) -> String {
    let items = collect_runs(hosts);

    let chunks = items.iter().chunk_by(|item| match item {
        Item::Plain(_) => None,
        Item::Numbered(run) => Some(run.prefix),
    });

    let mut parts: Vec<String> = Vec::new();

    for (prefix, chunk) in &chunks {
        let Some(prefix) = prefix else {
            // Names without a numeric suffix never share brackets, not even with themselves.
            parts.extend(chunk.filter_map(|item| match item {
                Item::Plain(name) => Some((*name).to_string()),
                Item::Numbered(_) => None,
            }));
            continue;
        };

        let runs: Vec<&Run<'_>> = chunk
            .filter_map(|item| match item {
                Item::Numbered(run) => Some(run),
                Item::Plain(_) => None,
            })
            .collect();

        match runs.as_slice() {
            [single] if single.start == single.end => {
                parts.push(format!("{prefix}{}", single.start));
            }
            _ => {
                parts.push(format!("{prefix}[{}]", runs.iter().join(",")));
            }
        }
    }

    parts.join(",")
}

/// Coalesces neighbouring hosts with consecutive numeric suffixes into runs.
fn collect_runs<'a>(hosts: impl IntoIterator<Item = &'a str>) -> Vec<Item<'a>> {
    let mut items: Vec<Item<'a>> = Vec::new();

    for host in hosts {
        let name = HostName::split(host);

        let Some(suffix) = name.suffix else {
            items.push(Item::Plain(host));
            continue;
        };

        if let Some(Item::Numbered(run)) = items.last_mut() {
            if run.prefix == name.prefix && run.end.is_followed_by(suffix) {
                run.end = suffix;
                continue;
            }
        }

        items.push(Item::Numbered(Run {
            prefix: name.prefix,
            start: suffix,
            end: suffix,
        }));
    }

    items
}

#[derive(Debug)]
enum Item<'a> {
    Plain(&'a str),
    Numbered(Run<'a>),
}

/// An inclusive range of consecutive numbered hosts sharing one prefix.
#[derive(Debug)]
struct Run<'a> {
    prefix: &'a str,
    start: Suffix,
    end: Suffix,
}

impl std::fmt::Display for Run<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
