//! Macros for declaring typed events.

/// Declare an event enum and implement [`Event`](crate::core::Event) for it.
///
/// Each variant's name is the event name handlers are registered under.
/// Variants may be unit, tuple or struct-like; their fields are the typed
/// payload of that event.
///
/// # Example
///
/// ```
/// use statetree::core::Event;
/// use statetree::event_enum;
///
/// event_enum! {
///     pub enum PlayerEvent {
///         Play,
///         Seek { position: u64 },
///         Rename(String),
///     }
/// }
///
/// assert_eq!(PlayerEvent::Play.name(), "Play");
/// assert_eq!(PlayerEvent::Seek { position: 10 }.name(), "Seek");
/// assert_eq!(PlayerEvent::Rename("x".into()).name(), "Rename");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $($tuple_ty:ty),* $(,)? ) )?
                $( { $($field:ident : $field_ty:ty),* $(,)? } )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $($tuple_ty),* ) )?
                $( { $($field : $field_ty),* } )?
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}
