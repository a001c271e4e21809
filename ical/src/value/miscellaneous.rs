// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Small building-block parsers shared by the value parsers.

use chumsky::Parser;
use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::keyword::KW_TZID;

macro_rules! define_digit_select {
    ($fname:ident : $ty:ty => { $($ch:literal),+ $(,)? }) => {
        #[allow(trivial_numeric_casts, clippy::cast_lossless, clippy::char_lit_as_u8, clippy::cast_possible_wrap)]
        pub(crate) const fn $fname<'src, I, E>() -> impl Parser<'src, I, $ty, E> + Copy
        where
            I: Input<'src, Token = char, Span = SimpleSpan>,
            E: ParserExtra<'src, I>,
        {
            select! {
                $(
                    $ch => (($ch as u8 - b'0') as $ty),
                )+
            }
        }
    };
}

define_digit_select!(i8_0_9 : i8 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(i16_0_9 : i16 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });
define_digit_select!(u32_0_9 : u32 => { '0', '1', '2', '3', '4', '5', '6', '7', '8', '9' });

/// Two digits, `00`-`99`.
pub(crate) fn two_digits<'src, I, E>() -> impl Parser<'src, I, i8, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    i8_0_9().then(i8_0_9()).map(|(a, b)| 10 * a + b)
}

/// Four digits, `0000`-`9999`.
pub(crate) fn four_digits<'src, I, E>() -> impl Parser<'src, I, i16, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    i16_0_9()
        .then(i16_0_9())
        .then(i16_0_9())
        .then(i16_0_9())
        .map(|(((a, b), c), d)| 1000 * a + 100 * b + 10 * c + d)
}

/// Unsigned integer of one to nine digits, so it always fits in `u32`.
pub(crate) fn uint<'src, I, E>() -> impl Parser<'src, I, u32, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    u32_0_9()
        .repeated()
        .at_least(1)
        .at_most(9)
        .collect::<Vec<_>>()
        .map(|digits| digits.into_iter().fold(0, |acc, d| acc * 10 + d))
}

/// Optional sign, `true` unless a `-` is present.
pub(crate) fn is_positive<'src, I, E>() -> impl Parser<'src, I, bool, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ ('+' | '-') => c }
        .or_not()
        .map(|c| !matches!(c, Some('-')))
}

/// ```txt
/// tzidparam  = "TZID" "=" [tzidprefix] paramtext
/// ```
///
/// Followed by the `:` that separates the parameter from the value, as
/// in `TZID=Europe/Berlin:20240101T090000`.
pub(crate) fn tzid_prefix<'src, I, E>() -> impl Parser<'src, I, String, E>
where
    I: chumsky::input::ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    just(KW_TZID)
        .ignore_then(just('='))
        .ignore_then(none_of(':').repeated().at_least(1).collect::<String>())
        .then_ignore(just(':'))
}
