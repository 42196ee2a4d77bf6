//! Scope calibration: time axis and per-channel vertical scale.
//!
//! Every field starts unset. The capture stream fills them in as the scope
//! preamble lines arrive and may overwrite them at any point; the latest value
//! is the one used.

use std::fmt;

use crate::error::CalibrationUnset;

/// One of the two captured channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    One,
    Two,
}

impl Channel {
    pub fn number(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisField {
    XIncrement,
    XOrigin,
    XReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalField {
    Increment,
    Origin,
    Reference,
}

/// Names a calibration value; displays as its stream tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationField {
    Depth,
    Axis(AxisField),
    Vertical(Channel, VerticalField),
}

impl fmt::Display for CalibrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationField::Depth => f.write_str("DEPTH"),
            CalibrationField::Axis(AxisField::XIncrement) => f.write_str("XINCREMENT"),
            CalibrationField::Axis(AxisField::XOrigin) => f.write_str("XORIGIN"),
            CalibrationField::Axis(AxisField::XReference) => f.write_str("XREFERENCE"),
            CalibrationField::Vertical(ch, field) => {
                let name = match field {
                    VerticalField::Increment => "INCREMENT",
                    VerticalField::Origin => "ORIGIN",
                    VerticalField::Reference => "REFERENCE",
                };
                write!(f, "Y{}{name}", ch.number())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelCalibration {
    pub y_increment: Option<f64>,
    pub y_origin: Option<f64>,
    pub y_reference: Option<f64>,
}

/// Fully resolved vertical scale for one channel.
/// volts = (code - origin - reference) * increment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalScale {
    pub increment: f64,
    pub origin: f64,
    pub reference: f64,
}

impl VerticalScale {
    #[inline]
    pub fn voltage(&self, code: u8) -> f64 {
        (f64::from(code) - self.origin - self.reference) * self.increment
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    /// Expected number of samples per captured waveform.
    pub depth: Option<usize>,
    /// Seconds between samples.
    pub x_increment: Option<f64>,
    pub x_origin: Option<f64>,
    pub x_reference: Option<f64>,
    pub ch1: ChannelCalibration,
    pub ch2: ChannelCalibration,
}

impl Calibration {
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = Some(depth);
    }

    pub fn set_axis(&mut self, field: AxisField, value: f64) {
        let slot = match field {
            AxisField::XIncrement => &mut self.x_increment,
            AxisField::XOrigin => &mut self.x_origin,
            AxisField::XReference => &mut self.x_reference,
        };
        *slot = Some(value);
    }

    pub fn set_vertical(&mut self, channel: Channel, field: VerticalField, value: f64) {
        let ch = self.channel_mut(channel);
        let slot = match field {
            VerticalField::Increment => &mut ch.y_increment,
            VerticalField::Origin => &mut ch.y_origin,
            VerticalField::Reference => &mut ch.y_reference,
        };
        *slot = Some(value);
    }

    pub fn channel(&self, channel: Channel) -> &ChannelCalibration {
        match channel {
            Channel::One => &self.ch1,
            Channel::Two => &self.ch2,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelCalibration {
        match channel {
            Channel::One => &mut self.ch1,
            Channel::Two => &mut self.ch2,
        }
    }

    pub fn depth(&self) -> Result<usize, CalibrationUnset> {
        self.depth.ok_or(CalibrationUnset(CalibrationField::Depth))
    }

    pub fn x_increment(&self) -> Result<f64, CalibrationUnset> {
        self.x_increment
            .ok_or(CalibrationUnset(CalibrationField::Axis(AxisField::XIncrement)))
    }

    /// Resolve the vertical scale of `channel`, naming the first missing field.
    pub fn vertical(&self, channel: Channel) -> Result<VerticalScale, CalibrationUnset> {
        let ch = self.channel(channel);
        let missing = |field| CalibrationUnset(CalibrationField::Vertical(channel, field));
        Ok(VerticalScale {
            increment: ch
                .y_increment
                .ok_or_else(|| missing(VerticalField::Increment))?,
            origin: ch.y_origin.ok_or_else(|| missing(VerticalField::Origin))?,
            reference: ch
                .y_reference
                .ok_or_else(|| missing(VerticalField::Reference))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_display_matches_stream_tags() {
        assert_eq!(CalibrationField::Depth.to_string(), "DEPTH");
        assert_eq!(
            CalibrationField::Axis(AxisField::XReference).to_string(),
            "XREFERENCE"
        );
        assert_eq!(
            CalibrationField::Vertical(Channel::Two, VerticalField::Origin).to_string(),
            "Y2ORIGIN"
        );
    }

    #[test]
    fn vertical_reports_first_unset_field() {
        let mut cal = Calibration::default();
        cal.set_vertical(Channel::One, VerticalField::Increment, 0.5);
        let err = cal.vertical(Channel::One).unwrap_err();
        assert_eq!(
            err.0,
            CalibrationField::Vertical(Channel::One, VerticalField::Origin)
        );
        assert!(cal.vertical(Channel::Two).is_err());
    }

    #[test]
    fn last_write_wins() {
        let mut cal = Calibration::default();
        cal.set_axis(AxisField::XIncrement, 1e-9);
        cal.set_axis(AxisField::XIncrement, 2e-9);
        cal.set_depth(10);
        cal.set_depth(12);
        assert_eq!(cal.x_increment(), Ok(2e-9));
        assert_eq!(cal.depth(), Ok(12));
    }

    #[test]
    fn voltage_applies_origin_and_reference() {
        let scale = VerticalScale {
            increment: 0.1,
            origin: 10.0,
            reference: 100.0,
        };
        assert!((scale.voltage(130) - 2.0).abs() < 1e-12);
        assert!((scale.voltage(0) + 11.0).abs() < 1e-12);
    }
}
