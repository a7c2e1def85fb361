use std::cmp::Ordering;
use std::fmt;

/// A host name split into its non-numeric prefix and its trailing numeric suffix, if any.
///
/// `n007` splits into the prefix `n` and the suffix 7 of width 3. A name without trailing digits
/// (or with more trailing digits than fit into a `u64`) has no suffix and the prefix is the
/// entire name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct HostName<'a> {
    pub(crate) prefix: &'a str,
    pub(crate) suffix: Option<Suffix>,
}

impl<'a> HostName<'a> {
    pub(crate) fn split(name: &'a str) -> Self {
        let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());

        let suffix = name
            .get(prefix.len()..)
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| {
                digits.parse::<u64>().ok().map(|value| Suffix {
                    value,
                    width: digits.len(),
                })
            });

        match suffix {
            Some(_) => Self { prefix, suffix },
            None => Self {
                prefix: name,
                suffix: None,
            },
        }
    }
}

impl PartialOrd for HostName<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HostName<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix
            .cmp(other.prefix)
            .then_with(|| self.suffix.cmp(&other.suffix))
    }
}

/// The numeric tail of a host name, remembering how many digits it was written with.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct Suffix {
    pub(crate) value: u64,
    pub(crate) width: usize,
}

impl Suffix {
    /// Whether the suffix carries leading zeros (`007` is padded, `7` and `10` are not).
    fn is_padded(self) -> bool {
        self.width > self.value.to_string().len()
    }

    /// Whether `next` continues a numeric range that currently ends at `self`.
    ///
    /// Unpadded numbers of different widths (`9` and `10`) continue each other, padded numbers
    /// only continue numbers of the same width.
    pub(crate) fn is_followed_by(self, next: Self) -> bool {
        let widths_compatible =
            self.width == next.width || (!self.is_padded() && !next.is_padded());

        widths_compatible && self.value.checked_add(1) == Some(next.value)
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.value, width = self.width)
    }
}
