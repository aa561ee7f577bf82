// Message for states that the rules make unreachable, e.g. a position without a king where one
// is required. Such states are logged and the operation is skipped rather than panicking.
#[macro_export]
macro_rules! internal_error_message {
    () => {
        format!("Rule engine invariant violated at {}:{}.", file!(), line!())
    };
    ($($arg:tt)+) => {
        format!("Rule engine invariant violated at {}:{}: {}.", file!(), line!(), format!($($arg)*))
    };
}
