use crate::u2f::error::ErrorKind;

/// Replay protection based on the token usage counter.
pub struct CounterGuard;

impl CounterGuard {
    /// Accepts only strict forward progress, a credential never used before has a stored counter of 0.
    ///
    /// Returns the counter value the store must advance to.
    pub fn check(response_counter: u32, stored_counter: u32) -> Result<u32, ErrorKind> {
        if response_counter > stored_counter {
            Ok(response_counter)
        } else {
            Err(ErrorKind::CounterReplay)
        }
    }
}

#[test]
fn test_counter_must_increase() {
    assert_eq!(CounterGuard::check(6, 5), Ok(6));
    assert_eq!(CounterGuard::check(1, 0), Ok(1));
    assert_eq!(CounterGuard::check(u32::MAX, u32::MAX - 1), Ok(u32::MAX));
    assert_eq!(CounterGuard::check(5, 5), Err(ErrorKind::CounterReplay));
    assert_eq!(CounterGuard::check(4, 5), Err(ErrorKind::CounterReplay));
    assert_eq!(CounterGuard::check(0, 0), Err(ErrorKind::CounterReplay));
}
