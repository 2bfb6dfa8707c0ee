use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Textual representation of a field value
///
/// `None` is the null value, written as an empty cell.
pub trait ToCell {
    /// The text of this value, or `None` for null
    fn to_cell(&self) -> Option<String>;
}

/// Implement [`ToCell`] for types through their [`Display`](std::fmt::Display) implementation
///
/// ```
/// use annotated_csv::{impl_to_cell_display, ToCell};
///
/// struct Celsius(f32);
///
/// impl std::fmt::Display for Celsius {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}°C", self.0)
///     }
/// }
///
/// impl_to_cell_display!(Celsius);
/// assert_eq!(Celsius(21.5).to_cell(), Some("21.5°C".to_string()));
/// ```
#[macro_export]
macro_rules! impl_to_cell_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::ToCell for $t {
                fn to_cell(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_to_cell_display!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, str,
    String, NaiveDate, NaiveDateTime, NaiveTime, uuid::Uuid
);

impl<Tz: TimeZone> ToCell for DateTime<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    fn to_cell(&self) -> Option<String> {
        Some(self.to_rfc3339())
    }
}

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> Option<String> {
        self.as_ref().and_then(ToCell::to_cell)
    }
}

impl<T: ToCell + ?Sized> ToCell for &T {
    fn to_cell(&self) -> Option<String> {
        (**self).to_cell()
    }
}

impl<T: ToCell + ?Sized> ToCell for Box<T> {
    fn to_cell(&self) -> Option<String> {
        (**self).to_cell()
    }
}

impl<T: ToCell + ?Sized> ToCell for Rc<T> {
    fn to_cell(&self) -> Option<String> {
        (**self).to_cell()
    }
}

impl<T: ToCell + ?Sized> ToCell for Arc<T> {
    fn to_cell(&self) -> Option<String> {
        (**self).to_cell()
    }
}

impl ToCell for Cow<'_, str> {
    fn to_cell(&self) -> Option<String> {
        Some(self.to_string())
    }
}
