use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for element IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter behind `ElementId::fresh`.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Session-local handle for one placed element.
///
/// IDs are never written to the export file. They exist so gestures and
/// property edits can address an element on the live canvas. Internally a
/// `Spur` index: 4 bytes, `Copy`, O(1) `Eq`/`Hash`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// Intern a string as an ElementId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    /// The existing ElementId for `s`, without interning it.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(ElementId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a unique ID with a type prefix (e.g. `button_4`, `menu_9`).
    pub fn fresh(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
