// Wraps a foreign error into a `{ error }` variant of one of our Fail enums
macro_rules! from_error {
    ($from:ty, $to:ident, $variant:ident) => {
        impl From<$from> for $to {
            fn from(error: $from) -> Self {
                $to::$variant { error }
            }
        }
    };
}
