//! Range checks shared by the section validators.

use std::fmt::Display;
use std::ops::RangeInclusive;

/// Record `"<field> = <value> must be within <lo>..=<hi>"` unless `value`
/// lies in `range`. NaN is never in range.
pub(crate) fn check_range<T>(errors: &mut Vec<String>, field: &str, value: T, range: RangeInclusive<T>)
where
    T: PartialOrd + Display,
{
    if !range.contains(&value) {
        errors.push(format!(
            "{field} = {value} must be within {}..={}",
            range.start(),
            range.end()
        ));
    }
}
