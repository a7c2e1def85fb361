use std::iter::FusedIterator;

use crate::DecodeError;

/// Decodes a compact task-count list into one count per host, on demand.
///
/// The list is a comma-separated sequence of terms. Each term is an unsigned integer count,
/// optionally followed by `(x<repeat>)` to give that count to `<repeat>` consecutive hosts:
///
/// ```
/// use snodelist::TaskCounts;
///
/// let mut counts = TaskCounts::new("1,4(x2),8");
///
/// assert_eq!(counts.pull_next().unwrap(), Some(1));
/// assert_eq!(counts.pull_next().unwrap(), Some(4));
/// assert_eq!(counts.pull_next().unwrap(), Some(4));
/// assert_eq!(counts.pull_next().unwrap(), Some(8));
/// assert_eq!(counts.pull_next().unwrap(), None);
/// ```
///
/// Terms are decoded lazily, one at a time, because the number of hosts is not known to the
/// decoder. A malformed term is only reported once the sequence reaches it.
#[derive(Clone, Debug)]
pub struct TaskCounts<'a> {
    spec: &'a str,

    // Byte offset of the next term to decode.
    cursor: usize,

    value: u32,

    // How many more times `value` is handed out before the next term is decoded.
    remaining: u32,

    failed: bool,
}

impl<'a> TaskCounts<'a> {
    /// Creates a decoder over a task-count list. Nothing is decoded until the first pull.
    #[must_use]
    pub fn new(spec: &'a str) -> Self {
        Self {
            spec,
            cursor: 0,
            value: 0,
            remaining: 0,
            failed: false,
        }
    }

    /// Returns the count for the next host, or `None` once the list is exhausted.
    ///
    /// After an error has been returned, the decoder is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the next term of the list is malformed.
    pub fn pull_next(&mut self) -> Result<Option<u32>, DecodeError> {
        if self.remaining == 0 {
            if self.failed || self.cursor >= self.spec.len() {
                return Ok(None);
            }

            if let Err(e) = self.decode_term() {
                self.failed = true;
                return Err(e);
            }
        }

        self.remaining = self.remaining.saturating_sub(1);
        Ok(Some(self.value))
    }

    fn decode_term(&mut self) -> Result<(), DecodeError> {
        let bytes = self.spec.as_bytes();
        let term_start = self.cursor;

        let (value, mut position) = self.read_integer(term_start).ok_or_else(|| {
            DecodeError::InvalidInteger {
                offset: term_start,
                spec: self.spec.to_string(),
            }
        })?;

        let repeat = if bytes.get(position) == Some(&b'(') {
            position = position.saturating_add(1);

            if bytes.get(position) != Some(&b'x') {
                return Err(DecodeError::InvalidRepeatCount {
                    offset: position,
                    spec: self.spec.to_string(),
                });
            }

            position = position.saturating_add(1);

            let (repeat, after_repeat) = self
                .read_integer(position)
                .filter(|(repeat, _)| *repeat > 0)
                .ok_or_else(|| DecodeError::InvalidRepeatCount {
                    offset: position,
                    spec: self.spec.to_string(),
                })?;

            if bytes.get(after_repeat) != Some(&b')') {
                return Err(DecodeError::UnexpectedCharacter {
                    offset: after_repeat,
                    spec: self.spec.to_string(),
                });
            }

            position = after_repeat.saturating_add(1);
            repeat
        } else {
            1
        };

        match bytes.get(position) {
            None => {}
            Some(b',') => position = position.saturating_add(1),
            Some(_) => {
                return Err(DecodeError::UnexpectedCharacter {
                    offset: position,
                    spec: self.spec.to_string(),
                });
            }
        }

        self.cursor = position;
        self.value = value;
        self.remaining = repeat;

        Ok(())
    }

    /// Reads the run of ASCII digits starting at `start`.
    ///
    /// Returns the value and the offset just past the digits, or `None` if there are no digits
    /// or the value does not fit into a `u32`.
    fn read_integer(&self, start: usize) -> Option<(u32, usize)> {
        let digits = self
            .spec
            .as_bytes()
            .get(start..)?
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();

        if digits == 0 {
            return None;
        }

        let end = start.checked_add(digits)?;
        let value = self.spec.get(start..end)?.parse::<u32>().ok()?;

        Some((value, end))
    }
}

impl Iterator for TaskCounts<'_> {
    type Item = Result<u32, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull_next().transpose()
    }
}

impl FusedIterator for TaskCounts<'_> {}
