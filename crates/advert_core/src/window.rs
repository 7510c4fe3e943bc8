use crate::InputRow;

/// Positional slice of the input rows selected for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowWindow {
    pub start: usize,
    pub limit: Option<usize>,
}

impl RowWindow {
    /// A limit of zero means "no limit".
    pub fn new(start: usize, limit: Option<usize>) -> Self {
        Self {
            start,
            limit: limit.filter(|&l| l > 0),
        }
    }

    /// Rows covered by this window; out-of-range bounds are clamped.
    pub fn apply<'a>(&self, rows: &'a [InputRow]) -> &'a [InputRow] {
        let start = self.start.min(rows.len());
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit).min(rows.len()),
            None => rows.len(),
        };
        &rows[start..end]
    }
}

/// How often accumulated results are re-serialized during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointPolicy {
    pub every: usize,
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self { every: 10 }
    }
}

impl CheckpointPolicy {
    /// True after every `every`-th completed job. A zero interval disables
    /// periodic checkpoints (the final one always happens).
    pub fn is_due(&self, completed: usize) -> bool {
        self.every > 0 && completed > 0 && completed % self.every == 0
    }
}
