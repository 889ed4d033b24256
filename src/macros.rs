//! Declaration macros for wrapper types.

/// Declare a wrapper type with its fields and methods.
///
/// A size in parentheses makes the wrapper sized: it can then be embedded
/// by value in other wrappers, strided over through pointers and
/// instantiated. `destruct = path` names a `fn(&Self)` run when an
/// [`Instantiable`](crate::Instantiable) of the type is dropped.
///
/// Each field is `name: Type => getter(args)` and each method
/// `fn name @ getter(args): Signature;`, where the getter is one of
/// `offset(delta)`, `absolute(address)`, `vtable(index)` or
/// `vtable(index, vtable_offset)`. Methods located through `vtable` return a
/// [`VirtualFunction`](crate::VirtualFunction), all others a
/// [`MemberFunction`](crate::MemberFunction).
///
/// ```
/// use remodel::{wrapper, wrapper_cast, Ref};
///
/// wrapper! {
///     pub struct World(0x40) {
///         pub tick: u64 => offset(0x8),
///     }
/// }
///
/// wrapper! {
///     pub struct Player(0x80) {
///         pub health: u32 => offset(0x10),
///         pub target: *mut Player => offset(0x18),
///         pub world: Ref<World> => offset(0x20),
///         pub home: World => offset(0x28),
///     }
///     methods {
///         pub fn think @ vtable(3): extern "C" fn() -> u32;
///         pub fn damage @ absolute(0x1400_1000): extern "C" fn(f32);
///     }
/// }
///
/// let mut bytes = [0u8; 0x80];
/// let player: Player = unsafe { wrapper_cast(bytes.as_mut_ptr()) };
/// player.health().set(100);
/// player.health().increment();
/// assert_eq!(player.health().get(), 101);
/// assert!(player.target().is_null());
/// ```
#[macro_export]
macro_rules! wrapper {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $( ( $size:expr $(, destruct = $dtor:path)? ) )? {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty => $getter:ident ( $($getter_arg:expr),* $(,)? )
            ),* $(,)?
        }
        $(
            methods {
                $(
                    $(#[$method_meta:meta])*
                    $method_vis:vis fn $method:ident @ $method_getter:ident ( $($method_arg:expr),* $(,)? ) : $method_ty:ty
                );* $(;)?
            }
        )?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis struct $name {
            raw: $crate::RawAddress,
        }

        impl $crate::Wrapper for $name {
            #[inline]
            unsafe fn from_raw(raw: $crate::RawAddress) -> Self {
                $name { raw }
            }

            #[inline]
            fn address_of_obj(&self) -> $crate::RawAddress {
                self.raw
            }
        }

        $(
            $crate::__sized_wrapper!($name, $size $(, $dtor)?);
        )?

        #[allow(dead_code)]
        impl $name {
            $(
                $(#[$field_meta])*
                #[inline]
                $field_vis fn $field(&self) -> $crate::Field<'_, $field_ty> {
                    // SAFETY: the layout was attested when the wrapper was cast.
                    unsafe { $crate::Field::bind(self, $crate::__getter!($getter($($getter_arg),*))) }
                }
            )*

            $($(
                $(#[$method_meta])*
                #[inline]
                $method_vis fn $method(&self) -> $crate::__method_handle!($method_getter, '_, $method_ty) {
                    // SAFETY: the layout was attested when the wrapper was cast.
                    unsafe {
                        <$crate::__method_handle!($method_getter, '_, $method_ty)>::bind(
                            self,
                            $crate::__getter!($method_getter($($method_arg),*)),
                        )
                    }
                }
            )*)?
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __sized_wrapper {
    (@impl $name:ident, $size:expr, $destruct:expr) => {
        impl $crate::SizedWrapper for $name {
            type Storage = [u8; $size];
            const DESTRUCT: ::core::option::Option<fn(&Self)> = $destruct;
        }

        unsafe impl $crate::field::Access for $name {
            type Category = $crate::field::category::Wrapped;
            type Value = $name;
            type Repr = $crate::Weak<$name>;

            #[inline]
            unsafe fn load(addr: $crate::RawAddress) -> $name {
                // SAFETY: guaranteed by the caller.
                unsafe { $crate::field::nested::load_wrapper(addr) }
            }

            #[inline]
            unsafe fn store(addr: $crate::RawAddress, value: $name) {
                // SAFETY: guaranteed by the caller.
                unsafe { $crate::field::nested::store_wrapper(addr, value) }
            }
        }

        impl $crate::field::Nested for $name {
            type Strong = $name;
        }
    };
    ($name:ident, $size:expr) => {
        $crate::__sized_wrapper!(@impl $name, $size, ::core::option::Option::None);
    };
    ($name:ident, $size:expr, $dtor:path) => {
        $crate::__sized_wrapper!(
            @impl $name,
            $size,
            ::core::option::Option::Some($dtor as fn(&$name))
        );
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __getter {
    (offset($delta:expr)) => {
        $crate::PtrGetter::offset($delta)
    };
    (absolute($address:expr)) => {
        $crate::PtrGetter::Absolute {
            address: $crate::RawAddress::new($address),
        }
    };
    (vtable($index:expr)) => {
        $crate::PtrGetter::vtable($index)
    };
    (vtable($index:expr, $vtable_offset:expr)) => {
        $crate::PtrGetter::vtable_at($index, $vtable_offset)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __method_handle {
    (vtable, $lt:lifetime, $sig:ty) => {
        $crate::VirtualFunction<$lt, $sig>
    };
    ($getter:ident, $lt:lifetime, $sig:ty) => {
        $crate::MemberFunction<$lt, $sig>
    };
}
