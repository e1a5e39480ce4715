//! Constraint forwarding to a swappable receiver.

use std::sync::{Arc, RwLock};

use tracing::warn;
use vouch_core::{ScopedErrors, Value};

use crate::constraint::{Constraint, Options};

/// Forwards every operation to a receiver that can be replaced later.
///
/// Rebinding the receiver changes behavior wherever the delegator was
/// already registered.
#[derive(Debug)]
pub struct Delegator {
    receiver: RwLock<Arc<dyn Constraint>>,
}

impl Delegator {
    pub fn new(receiver: Arc<dyn Constraint>) -> Self {
        Self {
            receiver: RwLock::new(receiver),
        }
    }

    /// The current receiver. The lock is released before the receiver runs,
    /// so receivers may evaluate this delegator again.
    pub fn receiver(&self) -> Arc<dyn Constraint> {
        let guard = self.receiver.read().unwrap_or_else(|poisoned| {
            warn!("delegator lock poisoned; using last receiver");
            poisoned.into_inner()
        });
        Arc::clone(&guard)
    }

    pub fn set_receiver(&self, receiver: Arc<dyn Constraint>) {
        let mut guard = self.receiver.write().unwrap_or_else(|poisoned| {
            warn!("delegator lock poisoned; rebinding receiver");
            poisoned.into_inner()
        });
        *guard = receiver;
    }
}

impl Constraint for Delegator {
    fn type_token(&self) -> &'static str {
        self.receiver().type_token()
    }

    fn negated_type_token(&self) -> &'static str {
        self.receiver().negated_type_token()
    }

    fn options(&self) -> Options {
        self.receiver().options()
    }

    fn matches(&self, actual: &Value) -> bool {
        self.receiver().matches(actual)
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        self.receiver().does_not_match(actual)
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.receiver().update_errors(actual, errors)
    }

    fn update_negated_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.receiver().update_negated_errors(actual, errors)
    }

    fn check(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        self.receiver().check(actual, errors)
    }

    fn check_negated(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        self.receiver().check_negated(actual, errors)
    }

    fn descriptor(&self) -> Value {
        self.receiver().descriptor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Anything, Type};
    use vouch_core::tokens;

    #[test]
    fn test_forwards_to_receiver() {
        let delegator = Delegator::new(Type::named("String").unwrap().into_shared());

        assert!(delegator.matches(&Value::from("x")));
        assert_eq!(delegator.type_token(), tokens::IS_NOT_TYPE);
        assert_eq!(
            delegator.errors_for(&Value::Int(1)).iter().next().unwrap().kind,
            tokens::IS_NOT_TYPE
        );
    }

    #[test]
    fn test_rebinding_is_visible_to_existing_holders() {
        // GIVEN - a delegator shared by two holders
        let delegator = Arc::new(Delegator::new(Anything::new().into_shared()));
        let registered: Arc<dyn Constraint> = delegator.clone();
        assert!(registered.matches(&Value::Int(1)));

        // WHEN
        delegator.set_receiver(Type::named("String").unwrap().into_shared());

        // THEN
        assert!(!registered.matches(&Value::Int(1)));
        assert!(registered.matches(&Value::from("one")));
    }

    #[test]
    fn test_poisoned_lock_still_rebinds() {
        // GIVEN - a writer panicked while holding the lock
        let delegator = Delegator::new(Anything::new().into_shared());
        std::thread::scope(|scope| {
            let result = scope
                .spawn(|| {
                    let _guard = delegator.receiver.write().unwrap();
                    panic!("writer failed");
                })
                .join();
            assert!(result.is_err());
        });
        assert!(delegator.receiver.is_poisoned());

        // WHEN
        delegator.set_receiver(Type::named("String").unwrap().into_shared());

        // THEN
        assert!(!delegator.matches(&Value::Int(1)));
        assert!(delegator.matches(&Value::from("one")));
    }
}
