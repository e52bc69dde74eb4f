//! Thread-bound "current host" slot.
//!
//! The engine calls back into the platform layer (font creation, text
//! measurement) from places that have no parameter for a host reference.
//! Every façade call binds its instance's host here for the duration of the
//! call, and the platform layer looks it up with [`with_current`].
//!
//! At most one host is bound per thread. Binding over a bound slot and
//! unbinding an empty one are invariant violations.

use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::host::{HostHandle, HostInterface};

thread_local! {
    static CURRENT_HOST: Cell<Option<NonNull<HostInterface>>> = const { Cell::new(None) };
}

/// Make `host` the current host of this thread.
///
/// # Safety
/// The host must stay valid until the matching [`unbind`]. Prefer [`scoped`],
/// which guarantees the unbind.
pub unsafe fn bind(host: HostHandle<'_>) {
    CURRENT_HOST.with(|slot| {
        crate::invariant!(slot.get().is_none(), "a host is already bound on this thread");
        slot.set(Some(host.as_non_null()));
    });
}

/// Clear the current host of this thread.
pub fn unbind() {
    CURRENT_HOST.with(|slot| {
        crate::invariant!(slot.get().is_some(), "no host is bound on this thread");
        slot.set(None);
    });
}

/// Whether a host is currently bound on this thread.
pub fn is_bound() -> bool {
    CURRENT_HOST.with(|slot| slot.get().is_some())
}

/// Run `f` with the current host. Fatal when none is bound.
///
/// The handle cannot outlive the closure.
pub fn with_current<R>(f: impl FnOnce(HostHandle<'_>) -> R) -> R {
    let ptr = CURRENT_HOST.with(Cell::get);
    match ptr {
        Some(ptr) => f(HostHandle::from_non_null(ptr)),
        None => crate::fatal!("a host is bound on this thread", "platform call outside a bridge entry point"),
    }
}

/// Run `f` with `host` bound, unbinding on every exit path.
pub fn scoped<R>(host: HostHandle<'_>, f: impl FnOnce() -> R) -> R {
    let _guard = ContextGuard::enter(host);
    f()
}

/// What a [`ContextGuard`] puts back when it ends.
enum Restore {
    Unbind,
    Keep,
    Previous(NonNull<HostInterface>),
}

/// Binds on construction, unbinds on drop (including during unwinding).
pub(crate) struct ContextGuard<'h> {
    restore: Restore,
    _host: PhantomData<HostHandle<'h>>,
}

impl<'h> ContextGuard<'h> {
    pub(crate) fn enter(host: HostHandle<'h>) -> Self {
        // SAFETY: the guard borrows `'h` and unbinds before it ends.
        unsafe { bind(host) };
        Self {
            restore: Restore::Unbind,
            _host: PhantomData,
        }
    }

    /// Make `host` current whatever is bound now, and put the previous
    /// binding back on drop. Used where resources must return to the host
    /// that created them, such as an editor destroyed from inside another
    /// editor's call.
    pub(crate) fn enter_owner(host: HostHandle<'h>) -> Self {
        let restore = CURRENT_HOST.with(|slot| match slot.get() {
            None => {
                slot.set(Some(host.as_non_null()));
                Restore::Unbind
            }
            Some(bound) if bound == host.as_non_null() => Restore::Keep,
            Some(bound) => {
                log::debug!("switching current host {:p} -> {:p}", bound, host.as_ptr());
                slot.set(Some(host.as_non_null()));
                Restore::Previous(bound)
            }
        });
        Self {
            restore,
            _host: PhantomData,
        }
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        match self.restore {
            Restore::Unbind => unbind(),
            Restore::Keep => {}
            Restore::Previous(previous) => CURRENT_HOST.with(|slot| slot.set(Some(previous))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(iface: &mut HostInterface) -> HostHandle<'_> {
        unsafe { HostHandle::from_raw(iface) }.unwrap()
    }

    #[test]
    fn bind_unbind_bind_succeeds() {
        let mut iface = HostInterface::default();
        let host = handle(&mut iface);
        unsafe { bind(host) };
        assert!(is_bound());
        unbind();
        assert!(!is_bound());
        unsafe { bind(host) };
        with_current(|current| assert_eq!(current, host));
        unbind();
    }

    #[test]
    #[should_panic(expected = "a host is already bound on this thread")]
    fn double_bind_is_fatal() {
        let mut iface = HostInterface::default();
        let host = handle(&mut iface);
        unsafe {
            bind(host);
            bind(host);
        }
    }

    #[test]
    #[should_panic(expected = "no host is bound on this thread")]
    fn unbind_without_bind_is_fatal() {
        unbind();
    }

    #[test]
    #[should_panic(expected = "platform call outside a bridge entry point")]
    fn current_without_bind_is_fatal() {
        with_current(|_| ());
    }

    #[test]
    fn scoped_unbinds_on_early_return() {
        let mut iface = HostInterface::default();
        let host = handle(&mut iface);

        fn early(host: HostHandle<'_>) -> Option<u32> {
            scoped(host, || {
                let missing: Option<u32> = None;
                let value = missing?;
                Some(value + 1)
            })
        }

        assert_eq!(early(host), None);
        assert!(!is_bound());
    }

    #[test]
    fn scoped_unbinds_on_unwind() {
        let mut iface = HostInterface::default();
        let host = handle(&mut iface);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scoped(host, || panic!("engine blew up"));
        }));

        assert!(result.is_err());
        assert!(!is_bound());
    }

    #[test]
    fn owner_guard_restores_the_previous_host() {
        let mut first = HostInterface::default();
        let mut second = HostInterface::default();
        let first = handle(&mut first);
        let second = handle(&mut second);

        scoped(first, || {
            {
                let _owner = ContextGuard::enter_owner(second);
                with_current(|current| assert_eq!(current, second));
            }
            with_current(|current| assert_eq!(current, first));

            {
                let _same = ContextGuard::enter_owner(first);
                with_current(|current| assert_eq!(current, first));
            }
            assert!(is_bound());
        });
        assert!(!is_bound());

        {
            let _owner = ContextGuard::enter_owner(second);
            with_current(|current| assert_eq!(current, second));
        }
        assert!(!is_bound());
    }

    #[test]
    fn binding_is_per_thread() {
        let mut iface = HostInterface::default();
        let host = handle(&mut iface);
        scoped(host, || {
            let other = std::thread::spawn(is_bound).join().unwrap();
            assert!(!other);
            assert!(is_bound());
        });
    }
}
