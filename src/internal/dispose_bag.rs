//! Internal disposal bag for managing cleanup hooks.

/// Container for disposal hooks with LIFO execution order.
///
/// Hooks are pushed as instances finish construction, so running them in
/// reverse disposes every dependent before the services it was built from.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    /// Add a disposal hook.
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.hooks.push(f);
    }

    /// Execute all hooks in reverse order (LIFO). Returns how many ran.
    pub(crate) fn run_all_reverse(&mut self) -> usize {
        let mut count = 0;
        while let Some(f) = self.hooks.pop() {
            (f)();
            count += 1;
        }
        count
    }

    /// Check if the bag is empty (no disposers registered).
    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
