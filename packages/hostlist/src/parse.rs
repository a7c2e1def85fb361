use itertools::Itertools;

/// Upper limit on the number of host names a single host pattern may expand to.
///
/// This protects against typos such as `n[0-99999999]` allocating unbounded memory.
pub const MAX_HOSTS_PER_PATTERN: usize = 65_536;

/// Expands a [host-list expression][crate] into the individual host names, in order.
///
/// Duplicates are preserved. An empty string is valid input and returns an empty result.
///
/// See [package-level documentation][crate] for details.
pub fn expand(expression: &str) -> crate::Result<Vec<String>> {
    let mut hosts = Vec::new();

    for pattern in split_patterns(expression)? {
        if pattern.is_empty() {
            continue;
        }

        hosts.extend(expand_pattern(pattern)?);
    }

    Ok(hosts)
}

/// Splits an expression on the commas that are not inside brackets.
fn split_patterns(expression: &str) -> crate::Result<Vec<&str>> {
    let mut patterns = Vec::new();
    let mut pattern_start = 0;
    let mut in_brackets = false;

    for (index, c) in expression.char_indices() {
        match c {
            '[' if in_brackets => {
                return Err(crate::Error::invalid(
                    expression,
                    "brackets must not be nested",
                ));
            }
            '[' => in_brackets = true,
            ']' if !in_brackets => {
                return Err(crate::Error::invalid(
                    expression,
                    "closing bracket without a matching opening bracket",
                ));
            }
            ']' => in_brackets = false,
            ',' if !in_brackets => {
                patterns.extend(expression.get(pattern_start..index));
                // A comma is a single byte, so the next pattern starts right after it.
                pattern_start = index.saturating_add(1);
            }
            _ => {}
        }
    }

    if in_brackets {
        return Err(crate::Error::invalid(
            expression,
            "bracket is never closed",
        ));
    }

    patterns.extend(expression.get(pattern_start..));

    Ok(patterns)
}

/// Expands one pattern (no top-level commas) such as `rack[1-2]n[01-04]`.
///
/// Bracket groups expand as a cartesian product with the leftmost group varying slowest.
fn expand_pattern(pattern: &str) -> crate::Result<Vec<String>> {
    let mut expanded = vec![String::new()];
    let mut rest = pattern;

    while let Some((literal, after_open)) = rest.split_once('[') {
        let (ranges, after_close) = after_open
            .split_once(']')
            .ok_or_else(|| crate::Error::invalid(pattern, "bracket is never closed"))?;

        let numbers = expand_ranges(ranges)?;

        if expanded.len().saturating_mul(numbers.len()) > MAX_HOSTS_PER_PATTERN {
            return Err(crate::Error::invalid(
                pattern,
                format!("pattern expands to more than {MAX_HOSTS_PER_PATTERN} hosts"),
            ));
        }

        expanded = expanded
            .iter()
            .cartesian_product(numbers.iter())
            .map(|(head, number)| format!("{head}{literal}{number}"))
            .collect();

        rest = after_close;
    }

    for host in &mut expanded {
        host.push_str(rest);
    }

    Ok(expanded)
}

/// Expands the inside of a bracket group (`000-003,007`) into zero-padded numbers.
fn expand_ranges(ranges: &str) -> crate::Result<Vec<String>> {
    let mut numbers = Vec::new();

    for range in ranges.split(',') {
        if range.is_empty() {
            return Err(crate::Error::invalid(
                ranges,
                "bracket contains an empty range",
            ));
        }

        // If no range end is specified, the range consists of only its start.
        let (start, end_inc) = range.split_once('-').unwrap_or((range, range));

        let width = start.len();
        let start = parse_bound(start, "range start")?;
        let end_inc = parse_bound(end_inc, "range end")?;

        if start > end_inc {
            return Err(crate::Error::invalid(
                range,
                "range start must be <= end",
            ));
        }

        let range_len = end_inc.abs_diff(start).saturating_add(1);

        if usize::try_from(range_len)
            .ok()
            .and_then(|len| len.checked_add(numbers.len()))
            .is_none_or(|total| total > MAX_HOSTS_PER_PATTERN)
        {
            return Err(crate::Error::invalid(
                range,
                format!("range expands to more than {MAX_HOSTS_PER_PATTERN} hosts"),
            ));
        }

        numbers.extend((start..=end_inc).map(|number| format!("{number:0width$}")));
    }

    Ok(numbers)
}

fn parse_bound(bound: &str, what: &str) -> crate::Result<u64> {
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(crate::Error::invalid(
            bound,
            format!("{what} is not an unsigned integer"),
        ));
    }

    bound.parse::<u64>().map_err(|inner| {
        crate::Error::invalid(
            bound,
            format!("{what} could not be parsed as an integer: {inner}"),
        )
    })
}
