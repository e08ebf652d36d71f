// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Busy flag shared by a reconciler's operations.

use tokio::sync::watch;

/// Sets the flag on creation and clears it on drop.
///
/// The flag is a plain boolean, not a counter: when two operations overlap,
/// the first to finish reports idle while the second is still running.
pub(crate) struct BusyGuard<'a> {
    flag: &'a watch::Sender<bool>,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn begin(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self { flag }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_guards_share_one_flag() {
        let (flag, rx) = watch::channel(false);

        let first = BusyGuard::begin(&flag);
        let second = BusyGuard::begin(&flag);
        assert!(*rx.borrow());

        drop(first);
        // Non-reentrant: idle is reported even though `second` is live
        assert!(!*rx.borrow());

        drop(second);
        assert!(!*rx.borrow());
    }
}
