//! Decimal number extraction.
//!
//! A parse finds the longest numeric lexeme at the cursor and converts it.
//! Integers read their whole digit run, so a literal with more digits than
//! the type can hold is a range error rather than a short read. Floats look
//! at the run of float characters, at most [`Number::MAX_CHARS`] of them.
//! Failures are classified in a fixed order: not found, overflow, underflow,
//! trailing data. The cursor only moves on success, by the lexeme length.
//!
//! Integers: `[+-]?[0-9]+`. Floats:
//! `[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?`. No whitespace is
//! skipped.

use crate::{
    byte_set::ByteSet,
    error::{NumberError, ParseErrorKind},
    view::ViewMut,
};

/// What to do with bytes left in the view after a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trailing {
    /// Stop at the end of the number and leave the rest for the caller.
    #[default]
    Allow,
    /// The number must be the last thing in the view.
    Reject,
}

mod sealed {
    pub trait Sealed {}
}

/// Types that [`ViewMut::parse`] can extract.
///
/// Implemented for the fixed-width integers `i8` to `i64` and `u8` to `u64`,
/// and for `f32` and `f64`.
pub trait Number: Sized + Copy + sealed::Sealed {
    /// For floats, the longest run of float characters considered; a longer
    /// run is rejected as trailing data.
    ///
    /// For integers the value is informational only: the length of the
    /// longest in-range literal without leading zeros, sign included. Integer
    /// parsing never truncates the digit run to it, so longer literals are
    /// range errors (or parse, if the extra digits are leading zeros).
    const MAX_CHARS: usize;

    #[doc(hidden)]
    fn convert(input: &[u8], trailing: Trailing) -> Result<(Self, usize), NumberError<Self>>;
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn integer_lexeme(candidate: &[u8]) -> Option<usize> {
    let sign = sign_len(candidate);
    let digits = ByteSet::DIGITS.span(&candidate[sign..]);
    (digits > 0).then_some(sign + digits)
}

/// Length of the float lexeme at the front of `candidate`, and whether its
/// mantissa has a non-zero digit.
fn float_lexeme(candidate: &[u8]) -> Option<(usize, bool)> {
    let digits = |from: usize| ByteSet::DIGITS.span(&candidate[from..]);
    let nonzero = |from: usize, to: usize| candidate[from..to].iter().any(|&b| b != b'0');

    let mut at = sign_len(candidate);
    let int = digits(at);
    let mut mantissa_nonzero = nonzero(at, at + int);
    at += int;

    if candidate.get(at) == Some(&b'.') {
        let frac = digits(at + 1);
        if int > 0 || frac > 0 {
            mantissa_nonzero |= nonzero(at + 1, at + 1 + frac);
            at += 1 + frac;
        }
    }
    if at == sign_len(candidate) {
        return None;
    }

    if matches!(candidate.get(at), Some(b'e' | b'E')) {
        let sign = sign_len(&candidate[at + 1..]);
        let exp = digits(at + 1 + sign);
        if exp > 0 {
            at += 1 + sign + exp;
        }
    }
    Some((at, mantissa_nonzero))
}

fn ascii(lexeme: &[u8]) -> Option<&str> {
    core::str::from_utf8(lexeme).ok()
}

fn finish<T>(
    input: &[u8],
    len: usize,
    value: T,
    trailing: Trailing,
) -> Result<(T, usize), NumberError<T>> {
    if trailing == Trailing::Reject && len < input.len() {
        return Err(NumberError::with_value(ParseErrorKind::Trailing, value));
    }
    Ok((value, len))
}

macro_rules! integer {
    ($($ty:ty => $max_chars:literal),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Number for $ty {
            const MAX_CHARS: usize = $max_chars;

            fn convert(input: &[u8], trailing: Trailing) -> Result<(Self, usize), NumberError<Self>> {
                let len = integer_lexeme(input)
                    .ok_or_else(|| NumberError::new(ParseErrorKind::NotFound))?;
                let negative = input[0] == b'-';
                let overflow = || NumberError::with_value(ParseErrorKind::NumOverflow, <$ty>::MAX);
                let underflow = || NumberError::with_value(ParseErrorKind::NumUnderflow, <$ty>::MIN);

                // Anything i128 cannot hold is out of range for every target.
                let Some(wide) = ascii(&input[..len]).and_then(|text| text.parse::<i128>().ok()) else {
                    return Err(if negative { underflow() } else { overflow() });
                };
                let value = match <$ty>::try_from(wide) {
                    Ok(value) => value,
                    Err(_) if wide > 0 => return Err(overflow()),
                    Err(_) => return Err(underflow()),
                };
                finish(input, len, value, trailing)
            }
        }
    )*};
}

integer! {
    i8 => 4,
    i16 => 6,
    i32 => 11,
    i64 => 20,
    u8 => 3,
    u16 => 5,
    u32 => 10,
    u64 => 20,
}

macro_rules! float {
    ($($ty:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Number for $ty {
            const MAX_CHARS: usize = 100;

            fn convert(input: &[u8], trailing: Trailing) -> Result<(Self, usize), NumberError<Self>> {
                let window = &input[..input.len().min(Self::MAX_CHARS + 1)];
                let run = ByteSet::FLOAT.span(window);
                if run > Self::MAX_CHARS {
                    return Err(NumberError::new(ParseErrorKind::Trailing));
                }
                let candidate = &window[..run];
                let not_found = || NumberError::new(ParseErrorKind::NotFound);

                let (len, mantissa_nonzero) = float_lexeme(candidate).ok_or_else(not_found)?;
                let value: $ty = ascii(&candidate[..len])
                    .and_then(|text| text.parse().ok())
                    .ok_or_else(not_found)?;

                if value.is_infinite() {
                    let clamped = if value.is_sign_negative() { $ty::MIN } else { $ty::MAX };
                    return Err(NumberError::with_value(ParseErrorKind::NumOverflow, clamped));
                }
                if value == 0.0 && mantissa_nonzero {
                    return Err(NumberError::with_value(ParseErrorKind::NumUnderflow, value));
                }
                finish(input, len, value, trailing)
            }
        }
    )*};
}

float!(f32, f64);

impl ViewMut<'_, '_> {
    /// Parses a number at the cursor.
    ///
    /// On success returns the value and the number of bytes consumed, and
    /// advances past them. On failure the cursor stays put; range errors
    /// carry the clamped value and trailing-data errors the converted one.
    ///
    /// # Errors
    ///
    /// A [`NumberError`] whose kind is one of [`ParseErrorKind`].
    ///
    /// ```rust
    /// use bufview::{Buffer, ParseErrorKind, Trailing};
    ///
    /// let mut buf = Buffer::from("127,128");
    /// let mut view = buf.root_view();
    /// assert_eq!(view.parse::<i8>(Trailing::Allow), Ok((127, 3)));
    /// assert!(view.next_if(b','));
    /// let err = view.parse::<i8>(Trailing::Allow).unwrap_err();
    /// assert_eq!(err.kind, ParseErrorKind::NumOverflow);
    /// assert_eq!(err.value, Some(i8::MAX));
    /// ```
    pub fn parse<T: Number>(&mut self, trailing: Trailing) -> Result<(T, usize), NumberError<T>> {
        let (value, len) = T::convert(self.current(), trailing)?;
        self.advance(len);
        Ok((value, len))
    }
}
