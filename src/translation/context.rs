/*!
 * Trailing context carried from one window of batches to the next.
 */

use crate::segments::Segment;

/// Context fed into a batch's prompt; empty means "no prior context"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationContext(String);

impl TranslationContext {
    /// No prior context
    pub fn empty() -> Self {
        Self::default()
    }

    /// Space-joined text of the last `min(window, len)` segments of `batch`
    pub fn from_batch(batch: &[Segment], window: usize) -> Self {
        let tail = &batch[batch.len().saturating_sub(window)..];
        Self(
            tail.iter()
                .map(|segment| segment.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derives the context for the next window from the window just finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCarrier {
    window: usize,
}

impl ContextCarrier {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Context for the window after `dispatched`
    ///
    /// Uses the last batch by submission order, so the result does not
    /// depend on which batch of the window happened to finish last.
    pub fn advance(&self, dispatched: &[&[Segment]]) -> TranslationContext {
        dispatched
            .last()
            .map(|batch| TranslationContext::from_batch(batch, self.window))
            .unwrap_or_default()
    }
}

impl Default for ContextCarrier {
    fn default() -> Self {
        Self::new(2)
    }
}
