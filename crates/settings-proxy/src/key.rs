//! Named keys that carry the Rust type of their setting.

use std::marker::PhantomData;

/// Declare a `const` [`Key`](crate::Key) binding a storage name to a Rust type.
///
/// ```rust
/// use settings_proxy::register_setting_key;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct WindowState {
///     width: u32,
///     maximized: bool,
/// }
///
/// register_setting_key!(pub const WINDOW: WindowState = "window");
///
/// assert_eq!(WINDOW.name(), "window");
/// ```
#[macro_export]
macro_rules! register_setting_key {
    ($vis:vis const $name:ident: $ty:ty = $key:literal) => {
        $vis const $name: $crate::Key<$ty> = $crate::Key::new($key);
    };
}

/// The storage name of a setting together with the type its value converts to.
///
/// The type only exists at compile time. Passing the key to
/// [`SettingsProxy::setting`](crate::SettingsProxy::setting) yields a handle that reads and
/// writes `T` instead of the proxy's value type.
#[derive(Debug)]
pub struct Key<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// A key stored under `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The name the host store sees.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls so that `T` does not need to be `Clone`/`Copy`.
impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}
