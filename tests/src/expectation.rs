//! Expectations over evaluation results.

use vouch_constraint::Constraint;
use vouch_core::{ErrorRecord, Errors, MessageGenerator, Path, Value};

use crate::error::{MatchFailure, MatchResult};

/// Assert that `constraint` accepts `value`, returning nothing on success.
pub fn expect_match(constraint: &dyn Constraint, value: &Value) -> MatchResult<()> {
    let (status, errors) = constraint.evaluate(value);
    if status {
        Ok(())
    } else {
        Err(MatchFailure::UnexpectedMismatch {
            value: value.clone(),
            errors,
        })
    }
}

/// Assert that `constraint` rejects `value`, returning the errors it reported.
pub fn expect_no_match(constraint: &dyn Constraint, value: &Value) -> MatchResult<Errors> {
    let (status, errors) = constraint.evaluate(value);
    if status {
        Err(MatchFailure::UnexpectedMatch {
            value: value.clone(),
            errors,
        })
    } else {
        Ok(errors)
    }
}

/// Start an expectation over `errors`.
pub fn expect(errors: &Errors) -> ErrorsExpectation<'_> {
    ErrorsExpectation { errors }
}

/// Assertions about one [`Errors`] value.
#[derive(Debug, Clone, Copy)]
pub struct ErrorsExpectation<'e> {
    errors: &'e Errors,
}

impl<'e> ErrorsExpectation<'e> {
    pub fn to_be_empty(self) -> MatchResult<Self> {
        self.to_have_len(0)
    }

    pub fn to_have_len(self, expected: usize) -> MatchResult<Self> {
        if self.errors.len() == expected {
            Ok(self)
        } else {
            Err(MatchFailure::count(expected, self.errors))
        }
    }

    /// Exactly these records, in order.
    pub fn to_have(self, records: impl IntoIterator<Item = ErrorRecord>) -> MatchResult<Self> {
        let expected = Errors::from(records.into_iter().collect::<Vec<_>>());
        if *self.errors == expected {
            Ok(self)
        } else {
            Err(MatchFailure::RecordsDiffer {
                expected,
                actual: self.errors.clone(),
            })
        }
    }

    /// Some record of type `kind` sits at `path`.
    pub fn to_include_at(self, path: &Path, kind: &str) -> MatchResult<Self> {
        if self.errors.iter().any(|r| &r.path == path && r.kind == kind) {
            Ok(self)
        } else {
            Err(MatchFailure::missing_record(path, kind, self.errors))
        }
    }

    /// Every record path, in order.
    pub fn paths(self) -> Vec<Path> {
        self.errors.iter().map(|r| r.path.clone()).collect()
    }

    /// Some generated message matches `pattern`.
    pub fn to_have_message_matching(
        self,
        generator: &dyn MessageGenerator,
        pattern: &str,
    ) -> MatchResult<Self> {
        let re = regex_lite::Regex::new(pattern)?;
        let found = self.errors.iter().any(|record| {
            let message = record
                .message
                .clone()
                .unwrap_or_else(|| generator.generate(record));
            re.is_match(&message)
        });
        if found {
            Ok(self)
        } else {
            Err(MatchFailure::NoMessageMatching {
                pattern: pattern.to_string(),
                errors: self.errors.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_constraint::{Presence, Type};
    use vouch_core::{path, tokens};
    use vouch_messages::DefaultMessages;

    #[test]
    fn test_expect_match_and_no_match() {
        let integer = Type::named("Integer").unwrap();

        assert!(expect_match(&integer, &Value::Int(1)).is_ok());
        assert!(matches!(
            expect_match(&integer, &Value::from("1")),
            Err(MatchFailure::UnexpectedMismatch { .. })
        ));
        assert_eq!(expect_no_match(&integer, &Value::from("1")).unwrap().len(), 1);
        assert!(matches!(
            expect_no_match(&integer, &Value::Int(1)),
            Err(MatchFailure::UnexpectedMatch { .. })
        ));
    }

    #[test]
    fn test_to_include_at() -> MatchResult<()> {
        let mut errors = Errors::new();
        errors.scope("name").add(tokens::ABSENT, Default::default());

        expect(&errors)
            .to_have_len(1)?
            .to_include_at(&path!["name"], tokens::ABSENT)?;
        assert!(matches!(
            expect(&errors).to_include_at(&path!["title"], tokens::ABSENT),
            Err(MatchFailure::MissingRecord { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_to_have_reports_both_sides() {
        let errors = Presence::new().errors_for(&Value::Null);

        let failure = expect(&errors).to_be_empty().unwrap_err();

        assert!(failure.to_string().contains(tokens::ABSENT));
        assert!(expect(&errors)
            .to_have([ErrorRecord::new(tokens::PRESENT)])
            .is_err());
    }

    #[test]
    fn test_message_matching() {
        let errors = Presence::new().errors_for(&Value::from(""));
        let messages = DefaultMessages::new();

        assert!(expect(&errors)
            .to_have_message_matching(&messages, "^must be present$")
            .is_ok());
        assert!(matches!(
            expect(&errors).to_have_message_matching(&messages, "("),
            Err(MatchFailure::InvalidPattern(_))
        ));
    }
}
