//! Error type tokens reported by the built-in constraints.
//!
//! These identifiers are stable: message catalogs and test matchers key on
//! them, so a token never changes meaning once published.

/// Generic failure of a composite constraint.
pub const INVALID: &str = "vouch.constraints.invalid";
/// Generic negated failure of a composite constraint.
pub const VALID: &str = "vouch.constraints.valid";

/// Value matched a constraint that accepts nothing.
pub const ANYTHING: &str = "vouch.constraints.anything";
/// Value failed a constraint that accepts anything.
pub const NOTHING: &str = "vouch.constraints.nothing";

/// Value is nil or empty.
pub const ABSENT: &str = "vouch.constraints.absent";
/// Value is neither nil nor empty.
pub const PRESENT: &str = "vouch.constraints.present";

pub const IS_NOT_EQUAL_TO: &str = "vouch.constraints.is_not_equal_to";
pub const IS_EQUAL_TO: &str = "vouch.constraints.is_equal_to";

pub const IS_NOT_VALUE: &str = "vouch.constraints.is_not_value";
pub const IS_VALUE: &str = "vouch.constraints.is_value";

pub const IS_NOT_TYPE: &str = "vouch.constraints.is_not_type";
pub const IS_TYPE: &str = "vouch.constraints.is_type";

pub const IS_NOT_IN_LIST: &str = "vouch.constraints.is_not_in_list";
pub const IS_IN_LIST: &str = "vouch.constraints.is_in_list";

pub const IS_NOT_IN_UNION: &str = "vouch.constraints.is_not_in_union";
pub const IS_IN_UNION: &str = "vouch.constraints.is_in_union";

pub const DOES_NOT_MATCH_FORMAT: &str = "vouch.constraints.does_not_match_format";
pub const MATCHES_FORMAT: &str = "vouch.constraints.matches_format";

pub const DOES_NOT_HAVE_METHODS: &str = "vouch.constraints.does_not_have_methods";
pub const HAS_METHODS: &str = "vouch.constraints.has_methods";

pub const EXTRA_KEYS: &str = "vouch.constraints.maps.extra_keys";
pub const NO_EXTRA_KEYS: &str = "vouch.constraints.maps.no_extra_keys";

pub const EXTRA_ITEMS: &str = "vouch.constraints.sequences.extra_items";
pub const NO_EXTRA_ITEMS: &str = "vouch.constraints.sequences.no_extra_items";

pub const MISSING_ITEM: &str = "vouch.constraints.sequences.missing_item";
pub const NO_MISSING_ITEMS: &str = "vouch.constraints.sequences.no_missing_items";

/// Every token above, for catalogs that must cover the full set.
pub const ALL: &[&str] = &[
    INVALID,
    VALID,
    ANYTHING,
    NOTHING,
    ABSENT,
    PRESENT,
    IS_NOT_EQUAL_TO,
    IS_EQUAL_TO,
    IS_NOT_VALUE,
    IS_VALUE,
    IS_NOT_TYPE,
    IS_TYPE,
    IS_NOT_IN_LIST,
    IS_IN_LIST,
    IS_NOT_IN_UNION,
    IS_IN_UNION,
    DOES_NOT_MATCH_FORMAT,
    MATCHES_FORMAT,
    DOES_NOT_HAVE_METHODS,
    HAS_METHODS,
    EXTRA_KEYS,
    NO_EXTRA_KEYS,
    EXTRA_ITEMS,
    NO_EXTRA_ITEMS,
    MISSING_ITEM,
    NO_MISSING_ITEMS,
];
