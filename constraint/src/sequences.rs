//! Item-count policies for sequences: missing, extra and variadic items.

use std::fmt;
use std::sync::Arc;

use vouch_core::{tokens, Data, ScopedErrors, Value};

use crate::constraint::{data, message_options, Constraint, Options};
use crate::types::add_type_error;

type CountFn = dyn Fn() -> usize + Send + Sync;

/// An item count, fixed or recomputed on every check.
#[derive(Clone)]
pub enum ItemCount {
    Fixed(usize),
    /// Invoked on every evaluation; must be cheap and side-effect free.
    Dynamic(Arc<CountFn>),
}

impl ItemCount {
    pub fn dynamic(f: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        ItemCount::Dynamic(Arc::new(f))
    }

    pub fn get(&self) -> usize {
        match self {
            ItemCount::Fixed(count) => *count,
            ItemCount::Dynamic(f) => f(),
        }
    }
}

impl From<usize> for ItemCount {
    fn from(count: usize) -> Self {
        ItemCount::Fixed(count)
    }
}

impl fmt::Debug for ItemCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCount::Fixed(count) => f.debug_tuple("Fixed").field(count).finish(),
            ItemCount::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

fn count_data(expected: usize) -> Data {
    data([("expected", Value::from(expected))])
}

/// Matches sequences with at most the expected number of items.
#[derive(Debug, Clone)]
pub struct ExtraItems {
    expected: ItemCount,
    options: Options,
}

impl ExtraItems {
    pub fn new(expected: impl Into<ItemCount>) -> Self {
        Self {
            expected: expected.into(),
            options: Options::new(),
        }
    }

    pub fn expected_count(&self) -> usize {
        self.expected.get()
    }
}

/// Matches sequences with at least the expected number of items.
#[derive(Debug, Clone)]
pub struct MissingItems {
    expected: ItemCount,
    options: Options,
}

impl MissingItems {
    pub fn new(expected: impl Into<ItemCount>) -> Self {
        Self {
            expected: expected.into(),
            options: Options::new(),
        }
    }

    pub fn expected_count(&self) -> usize {
        self.expected.get()
    }
}

message_options!(ExtraItems, MissingItems);

impl Constraint for ExtraItems {
    fn type_token(&self) -> &'static str {
        tokens::EXTRA_ITEMS
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::NO_EXTRA_ITEMS
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual
            .item_count()
            .is_some_and(|count| count <= self.expected.get())
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        actual
            .item_count()
            .is_some_and(|count| count > self.expected.get())
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        let Some(items) = actual.as_list() else {
            add_type_error(errors, "Array");
            return;
        };
        let expected = self.expected.get();
        for (index, item) in items.iter().enumerate().skip(expected) {
            errors.scope(index).add_with_message(
                self.type_token(),
                data([("value", item.clone())]),
                self.options.message(),
            );
        }
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            count_data(self.expected.get()),
            self.options.negated_message(),
        );
    }
}

impl Constraint for MissingItems {
    fn type_token(&self) -> &'static str {
        tokens::MISSING_ITEM
    }

    fn negated_type_token(&self) -> &'static str {
        tokens::NO_MISSING_ITEMS
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual
            .item_count()
            .is_some_and(|count| count >= self.expected.get())
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        actual
            .item_count()
            .is_some_and(|count| count < self.expected.get())
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        let Some(count) = actual.item_count() else {
            add_type_error(errors, "Array");
            return;
        };
        for index in count..self.expected.get() {
            errors
                .scope(index)
                .add_with_message(self.type_token(), Data::new(), self.options.message());
        }
    }

    fn update_negated_errors(&self, _actual: &Value, errors: &mut ScopedErrors<'_>) {
        errors.add_with_message(
            self.negated_type_token(),
            count_data(self.expected.get()),
            self.options.negated_message(),
        );
    }
}

/// Applies an item constraint to every item from `start` onwards.
#[derive(Debug, Clone)]
pub struct VariadicItems {
    start: ItemCount,
    item: Arc<dyn Constraint>,
    options: Options,
}

impl VariadicItems {
    pub fn new(start: impl Into<ItemCount>, item: Arc<dyn Constraint>) -> Self {
        Self {
            start: start.into(),
            item,
            options: Options::new(),
        }
    }

    pub fn item_constraint(&self) -> &Arc<dyn Constraint> {
        &self.item
    }
}

message_options!(VariadicItems);

impl Constraint for VariadicItems {
    fn options(&self) -> Options {
        self.options.clone()
    }

    fn matches(&self, actual: &Value) -> bool {
        actual.as_list().is_some_and(|items| {
            items
                .iter()
                .skip(self.start.get())
                .all(|item| self.item.matches(item))
        })
    }

    fn does_not_match(&self, actual: &Value) -> bool {
        actual.as_list().is_some_and(|items| {
            items
                .iter()
                .skip(self.start.get())
                .all(|item| self.item.does_not_match(item))
        })
    }

    fn update_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check(actual, errors);
    }

    fn update_negated_errors(&self, actual: &Value, errors: &mut ScopedErrors<'_>) {
        self.check_negated(actual, errors);
    }

    fn check(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let Some(items) = actual.as_list() else {
            add_type_error(errors, "Array");
            return false;
        };
        let mut status = true;
        for (index, item) in items.iter().enumerate().skip(self.start.get()) {
            status &= self.item.check(item, &mut errors.scope(index));
        }
        status
    }

    fn check_negated(&self, actual: &Value, errors: &mut ScopedErrors<'_>) -> bool {
        let Some(items) = actual.as_list() else {
            return false;
        };
        let mut status = true;
        for (index, item) in items.iter().enumerate().skip(self.start.get()) {
            status &= self.item.check_negated(item, &mut errors.scope(index));
        }
        status
    }
}
