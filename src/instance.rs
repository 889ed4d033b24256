//! Owned instances of sized wrappers.
//!
//! An [`Instantiable`] allocates a zeroed buffer of exactly the wrapper's
//! declared size and binds the wrapper to it. An optional construction hook
//! runs when the instance is created through [`Instantiable::with`]; the
//! wrapper's [`SizedWrapper::DESTRUCT`] hook runs when it is dropped.
//!
//! Wrappers are `Copy`, so a wrapper handed out by value could outlive the
//! buffer. Getting one is therefore `unsafe` ([`Instantiable::wrapper`]);
//! the instance itself only exposes its address and bytes.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use tracing::trace;

use crate::core::address::RawAddress;
use crate::core::wrapper::{wrapper_cast, SizedWrapper};
use crate::memory;

/// Alignment of instance buffers.
pub const BUFFER_ALIGN: usize = 16;

/// Construction hook taking `Args`.
///
/// ```
/// use remodel::{Construct, Instantiable};
///
/// remodel::wrapper! {
///     pub struct Point(8) {
///         pub x: i32 => offset(0),
///         pub y: i32 => offset(4),
///     }
/// }
///
/// unsafe impl Construct<(i32, i32)> for Point {
///     fn construct(&self, (x, y): (i32, i32)) {
///         self.x().set(x);
///         self.y().set(y);
///     }
/// }
///
/// let p = Instantiable::<Point>::with((3, 4));
/// let point = unsafe { p.wrapper() };
/// assert_eq!(point.y().get(), 4);
/// ```
///
/// # Safety
///
/// `construct` must not keep a copy of `self` past the call; the buffer it
/// points to is freed when the instance is dropped.
pub unsafe trait Construct<Args>: SizedWrapper {
    /// Initialize the freshly zeroed object.
    fn construct(&self, args: Args);
}

/// A sized wrapper owning its backing buffer.
pub struct Instantiable<W: SizedWrapper> {
    wrapper: W,
    buffer: NonNull<u8>,
}

impl<W: SizedWrapper> Instantiable<W> {
    fn layout() -> Layout {
        match Layout::from_size_align(W::SIZE.max(1), BUFFER_ALIGN) {
            Ok(layout) => layout,
            Err(_) => panic!("declared size {:#x} is too large to instantiate", W::SIZE),
        }
    }

    /// Allocate a zeroed instance without running any construction hook.
    pub fn new() -> Self {
        let layout = Self::layout();
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(buffer) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout)
        };
        // SAFETY: the buffer holds `W::SIZE` bytes for as long as `self` lives.
        let wrapper = unsafe { wrapper_cast::<W>(RawAddress::from_mut_ptr(buffer.as_ptr())) };
        trace!(
            size = W::SIZE,
            address = %wrapper.address_of_obj(),
            "instantiated {}",
            std::any::type_name::<W>()
        );
        Instantiable { wrapper, buffer }
    }

    /// Allocate a zeroed instance and run its construction hook with `args`.
    pub fn with<A>(args: A) -> Self
    where
        W: Construct<A>,
    {
        let instance = Self::new();
        instance.wrapper.construct(args);
        instance
    }

    /// The bound wrapper.
    ///
    /// Handing out the wrapper needs an explicit `unsafe` block, just like
    /// [`wrapper_cast`]:
    ///
    /// ```compile_fail
    /// remodel::wrapper! {
    ///     pub struct Counter(8) {
    ///         pub hits: u64 => offset(0),
    ///     }
    /// }
    ///
    /// let counter = remodel::Instantiable::<Counter>::new().wrapper();
    /// counter.hits().set(1);
    /// ```
    ///
    /// # Safety
    ///
    /// The returned wrapper, and every field or function handle derived from
    /// it, must not be used after `self` is dropped.
    pub unsafe fn wrapper(&self) -> W {
        self.wrapper
    }

    /// Address of the instance's buffer.
    pub fn address(&self) -> RawAddress {
        self.wrapper.address_of_obj()
    }

    /// The instance's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the buffer holds `W::SIZE` initialized bytes.
        unsafe { memory::bytes(self.wrapper.address_of_obj(), W::SIZE) }
    }
}

impl<W: SizedWrapper> Default for Instantiable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SizedWrapper> Drop for Instantiable<W> {
    fn drop(&mut self) {
        if let Some(destruct) = W::DESTRUCT {
            destruct(&self.wrapper);
        }
        trace!(
            address = %self.wrapper.address_of_obj(),
            "dropping {}",
            std::any::type_name::<W>()
        );
        // SAFETY: allocated in `new` with the same layout.
        unsafe { alloc::dealloc(self.buffer.as_ptr(), Self::layout()) }
    }
}

impl<W: SizedWrapper + fmt::Debug> fmt::Debug for Instantiable<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instantiable")
            .field("wrapper", &self.wrapper)
            .field("size", &W::SIZE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wrapper::Wrapper;
    use std::cell::RefCell;

    thread_local! {
        static HOOK_LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn log(entry: String) {
        HOOK_LOG.with(|log| log.borrow_mut().push(entry));
    }

    fn take_log() -> Vec<String> {
        HOOK_LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
    }

    crate::wrapper! {
        struct Plain(12) {
            a: u32 => offset(0),
            b: u64 => offset(4),
        }
    }

    crate::wrapper! {
        struct Hooked(16, destruct = Hooked::release) {
            a: i32 => offset(0),
            b: f64 => offset(8),
        }
    }

    impl Hooked {
        fn release(&self) {
            log(format!("destruct a={}", self.a().get()));
        }
    }

    unsafe impl Construct<(i32, f64)> for Hooked {
        fn construct(&self, (a, b): (i32, f64)) {
            log(format!("construct {} {}", a, b));
            self.a().set(a);
            self.b().set(b);
        }
    }

    #[test]
    fn test_no_hook_leaves_zeroed_buffer() {
        let instance = Instantiable::<Plain>::new();
        assert_eq!(instance.as_bytes(), &[0u8; 12]);
        assert_eq!(instance.address().value() % BUFFER_ALIGN, 0);
        let plain = unsafe { instance.wrapper() };
        plain.b().set(u64::MAX);
        assert_eq!(plain.a().get(), 0);
    }

    #[test]
    fn test_hooks_run_exactly_once() {
        take_log();
        {
            let instance = Instantiable::<Hooked>::with((7, 0.5));
            let hooked = unsafe { instance.wrapper() };
            assert_eq!(hooked.a().get(), 7);
            assert_eq!(hooked.b().get(), 0.5);
            hooked.a().set(9);
            assert_eq!(take_log(), vec!["construct 7 0.5".to_string()]);
        }
        assert_eq!(take_log(), vec!["destruct a=9".to_string()]);
    }

    #[test]
    fn test_new_skips_construct_but_runs_destruct() {
        take_log();
        drop(Instantiable::<Hooked>::new());
        assert_eq!(take_log(), vec!["destruct a=0".to_string()]);
    }

    #[test]
    fn test_wrapper_copies_share_buffer() {
        let instance = Instantiable::<Plain>::default();
        let first = unsafe { instance.wrapper() };
        let second = unsafe { instance.wrapper() };
        first.a().set(5);
        assert_eq!(second.a().get(), 5);
        assert_eq!(first.address_of_obj(), instance.address());
        assert_eq!(&instance.as_bytes()[..4], &5u32.to_ne_bytes());
    }
}
