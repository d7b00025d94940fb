//! Stroke colours and their `#RRGGBB` / `#RGB` text form
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map, map_res},
    sequence::{preceded, tuple},
    IResult,
};
use std::fmt;
use std::str::FromStr;

use crate::error::TorusError;

/// An opaque RGB stroke colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl StrokeColor {
    pub const CYAN: StrokeColor = StrokeColor::new(0x00, 0xFF, 0xFF);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::CYAN
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for StrokeColor {
    type Err = TorusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match all_consuming(parse_color)(s.trim()) {
            Ok((_, color)) => Ok(color),
            Err(_) => Err(TorusError::InvalidColor(s.to_string())),
        }
    }
}

fn parse_color(input: &str) -> IResult<&str, StrokeColor> {
    preceded(tag("#"), alt((long_form, short_form)))(input)
}

fn long_form(input: &str) -> IResult<&str, StrokeColor> {
    map(
        tuple((hex_pair, hex_pair, hex_pair)),
        |(red, green, blue)| StrokeColor::new(red, green, blue),
    )(input)
}

// #RGB expands each digit, so #0FF == #00FFFF
fn short_form(input: &str) -> IResult<&str, StrokeColor> {
    map(
        tuple((hex_digit, hex_digit, hex_digit)),
        |(red, green, blue)| StrokeColor::new(red * 0x11, green * 0x11, blue * 0x11),
    )(input)
}

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex_digit), |s: &str| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn hex_digit(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex_digit), |s: &str| {
        u8::from_str_radix(s, 16)
    })(input)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}
