//! Line grammar of the capture stream.
//!
//! Each line is `TAG: value [suffix...]` with space separated fields and
//! case-sensitive tags. [`Directive::parse`] maps a line onto the closed set
//! of directives the session understands.
//!
//! Fields are split on any run of whitespace, so tabs and repeated spaces are
//! accepted where the capture side writes a single space.

use std::str::FromStr;

use crate::calibration::{AxisField, Channel, VerticalField};
use crate::error::DirectiveError;

#[derive(Debug, Clone, PartialEq)]
pub enum Directive<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// `DEBUG:` / `IDN:` diagnostics from the capture side.
    Passthrough,
    Depth(usize),
    Axis(AxisField, f64),
    Vertical(Channel, VerticalField, f64),
    /// Start of a capture; `None` when the timestamp is absent or unparsable.
    Trigger { timestamp: Option<f64> },
    /// Waveform payload; `None` when the capture of that channel failed.
    Wave {
        channel: Channel,
        payload: Option<&'a str>,
    },
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    pub fn parse(line: &'a str) -> Result<Self, DirectiveError> {
        let mut words = line.split_whitespace();
        let Some(tag) = words.next() else {
            return Ok(Directive::Blank);
        };
        let value = words.next();

        use AxisField::*;
        use Channel::*;
        use VerticalField::*;
        let directive = match tag {
            "DEBUG:" | "IDN:" => Directive::Passthrough,
            "DEPTH:" => Directive::Depth(number("DEPTH", value)?),
            "XINCREMENT:" => Directive::Axis(XIncrement, number("XINCREMENT", value)?),
            "XORIGIN:" => Directive::Axis(XOrigin, number("XORIGIN", value)?),
            "XREFERENCE:" => Directive::Axis(XReference, number("XREFERENCE", value)?),
            "Y1INCREMENT:" => Directive::Vertical(One, Increment, number("Y1INCREMENT", value)?),
            "Y1ORIGIN:" => Directive::Vertical(One, Origin, number("Y1ORIGIN", value)?),
            "Y1REFERENCE:" => Directive::Vertical(One, Reference, number("Y1REFERENCE", value)?),
            "Y2INCREMENT:" => Directive::Vertical(Two, Increment, number("Y2INCREMENT", value)?),
            "Y2ORIGIN:" => Directive::Vertical(Two, Origin, number("Y2ORIGIN", value)?),
            "Y2REFERENCE:" => Directive::Vertical(Two, Reference, number("Y2REFERENCE", value)?),
            // Anything after the timestamp (e.g. "waited 0.35") is informational.
            "TRIGGER:" => Directive::Trigger {
                timestamp: value.and_then(|v| v.parse().ok()),
            },
            "WAVE1:" => Directive::Wave {
                channel: One,
                payload: value,
            },
            "WAVE2:" => Directive::Wave {
                channel: Two,
                payload: value,
            },
            other => Directive::Unknown(other),
        };
        Ok(directive)
    }
}

fn number<T: FromStr>(tag: &'static str, value: Option<&str>) -> Result<T, DirectiveError> {
    let value = value.ok_or(DirectiveError::MissingValue { tag })?;
    value.parse().map_err(|_| DirectiveError::InvalidNumber {
        tag,
        value: value.to_string(),
    })
}
