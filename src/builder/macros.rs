//! Macros for naming state and event ids.

/// Generate a `u16`-backed enum usable wherever a state id is expected.
///
/// Each variant needs an explicit, non-zero id; `0` fails to compile.
///
/// # Example
///
/// ```
/// use statechart::state_enum;
///
/// state_enum! {
///     pub enum Mode {
///         PoweredOn = 1,
///         Off = 2,
///         Heat = 3,
///     }
/// }
///
/// assert_eq!(u16::from(Mode::Heat), 3);
/// assert_eq!(Mode::Off.name(), "Off");
/// assert_eq!(Mode::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        #[repr(u16)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = ($value) as u16
            ),*
        }

        const _: () = {
            $(assert!(
                ($value) as u16 != 0,
                concat!("state id 0 is reserved: ", stringify!($variant))
            );)*
        };

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            pub fn from_id(id: $crate::core::StateId) -> Option<Self> {
                Self::ALL.iter().copied().find(|state| *state as u16 == id.get())
            }
        }

        impl From<$name> for u16 {
            fn from(state: $name) -> u16 {
                state as u16
            }
        }

        impl PartialEq<$name> for $crate::core::StateId {
            fn eq(&self, other: &$name) -> bool {
                self.get() == *other as u16
            }
        }
    };
}

/// Generate a `u16`-backed enum usable wherever an event id is expected.
///
/// Byte literals are accepted as ids. `0` is the completion sentinel and
/// fails to compile.
///
/// # Example
///
/// ```
/// use statechart::core::EventId;
/// use statechart::event_enum;
///
/// event_enum! {
///     pub enum Input {
///         Heat = b'1',
///         PowerOff = b'9',
///     }
/// }
///
/// assert_eq!(EventId::from(Input::Heat), EventId::from(b'1'));
/// assert_eq!(Input::from_event(EventId::from(b'9')), Some(Input::PowerOff));
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        #[repr(u16)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = ($value) as u16
            ),*
        }

        const _: () = {
            $(assert!(
                ($value) as u16 != 0,
                concat!("event id 0 is the completion sentinel: ", stringify!($variant))
            );)*
        };

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            pub fn from_event(event: $crate::core::EventId) -> Option<Self> {
                Self::ALL.iter().copied().find(|input| *input as u16 == event.get())
            }
        }

        impl From<$name> for $crate::core::EventId {
            fn from(event: $name) -> Self {
                $crate::core::EventId::new(event as u16)
            }
        }
    };
}
