use std::fmt;

/// Breadcrumbs describing where in a training run a computation happens,
/// e.g. `epoch: 2, batch: 14, data index: 3, layer: 1`.
///
/// Passed down explicitly and extended by value, so concurrent leaves of the
/// batch reducer never share it mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    labels: Vec<String>,
}

impl Trace {
    pub fn root() -> Self {
        Self::default()
    }

    /// A new trace with `label` appended; `self` is left untouched.
    pub fn with(&self, label: impl Into<String>) -> Self {
        let mut labels = self.labels.clone();
        labels.push(label.into());
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_extends_a_copy() {
        let root = Trace::root().with("epoch: 1");
        let child = root.with("batch: 0");
        assert_eq!(root.labels(), ["epoch: 1"]);
        assert_eq!(child.to_string(), "epoch: 1, batch: 0");
    }
}
