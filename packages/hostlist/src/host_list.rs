use std::collections::VecDeque;
use std::collections::vec_deque;
use std::fmt;

use crate::name::HostName;

/// An ordered, possibly duplicated, sequence of host names.
///
/// Host-list expressions pushed into the list are expanded immediately, so the list always holds
/// individual host names. The compact form is produced on demand via [`ranged()`][Self::ranged]
/// or the `Display` implementation.
///
/// # Example
///
/// ```
/// use hostlist::HostList;
///
/// let mut hosts = HostList::parse("n[002-003],n000").unwrap();
/// hosts.push("n001").unwrap();
///
/// assert_eq!(hosts.len(), 4);
/// assert_eq!(hosts.ranged(), "n[002-003,000-001]");
///
/// hosts.uniq();
/// assert_eq!(hosts.to_string(), "n[000-003]");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostList {
    hosts: VecDeque<String>,
}

impl HostList {
    /// Creates an empty host list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host list from a host-list expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is not valid host-list syntax.
    pub fn parse(expression: &str) -> crate::Result<Self> {
        let mut list = Self::new();
        list.push(expression)?;
        Ok(list)
    }

    /// Expands a host-list expression and appends the resulting names to the end of the list.
    ///
    /// The list is left unchanged if the expression is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression is not valid host-list syntax.
    pub fn push(&mut self, expression: &str) -> crate::Result<()> {
        self.hosts.extend(crate::expand(expression)?);
        Ok(())
    }

    /// Appends a single host name verbatim, without interpreting any brackets or commas in it.
    pub fn push_host(&mut self, name: impl Into<String>) {
        self.hosts.push_back(name.into());
    }

    /// Removes and returns the first host name in the list.
    pub fn shift(&mut self) -> Option<String> {
        self.hosts.pop_front()
    }

    /// The number of host names in the list, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the list holds no host names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Iterates over the host names in list order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    /// Sorts the list and removes duplicate host names.
    ///
    /// Names are ordered by their non-numeric prefix first and by the value of their trailing
    /// number second, so `n9` sorts before `n10`.
    pub fn uniq(&mut self) {
        let hosts = self.hosts.make_contiguous();
        hosts.sort_by(|a, b| {
            HostName::split(a)
                .cmp(&HostName::split(b))
                .then_with(|| a.cmp(b))
        });

        let mut previous: Option<String> = None;
        self.hosts.retain(|host| {
            if previous.as_deref() == Some(host.as_str()) {
                return false;
            }

            previous = Some(host.clone());
            true
        });
    }

    /// Returns the compact (ranged) form of the list.
    ///
    /// See [`compress()`][crate::compress] for the rules applied.
    #[must_use]
    pub fn ranged(&self) -> String {
        crate::compress(self.iter())
    }
}

impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ranged())
    }
}

impl FromIterator<String> for HostList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            hosts: iter.into_iter().collect(),
        }
    }
}

impl Extend<String> for HostList {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.hosts.extend(iter);
    }
}

impl IntoIterator for HostList {
    type Item = String;
    type IntoIter = vec_deque::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.into_iter()
    }
}
