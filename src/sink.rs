//! Output channels for published readings.
//!
//! The host decides which values it wants: any of the X/Y/Z components and the
//! scalar field strength. Every channel is optional and is published on its own.

use crate::orientation::OrientedReading;

/// Receiver of one published value per successful poll.
pub trait Sink {
    fn publish(&mut self, value: f32);
}

impl<F: FnMut(f32)> Sink for F {
    fn publish(&mut self, value: f32) {
        self(value)
    }
}

/// The four optional output channels.
#[derive(Debug)]
pub struct Outputs<S> {
    pub x: Option<S>,
    pub y: Option<S>,
    pub z: Option<S>,
    pub field: Option<S>,
}

impl<S> Default for Outputs<S> {
    fn default() -> Self {
        Self::none()
    }
}

impl<S> Outputs<S> {
    pub const fn none() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            field: None,
        }
    }

    /// Component channels only
    pub fn components(x: S, y: S, z: S) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            field: None,
        }
    }

    /// Add the field strength channel
    /// (consumes and returns `Self` to be callable in a "builder-like" pattern)
    pub fn with_field(self, field: S) -> Self {
        Self {
            field: Some(field),
            ..self
        }
    }
}

impl<S: Sink> Outputs<S> {
    /// Publish to every configured channel. The magnitude is only computed when
    /// somebody listens to it.
    pub fn publish(&mut self, reading: &OrientedReading) {
        if let Some(x) = self.x.as_mut() {
            x.publish(reading.x);
        }
        if let Some(y) = self.y.as_mut() {
            y.publish(reading.y);
        }
        if let Some(z) = self.z.as_mut() {
            z.publish(reading.z);
        }
        if let Some(field) = self.field.as_mut() {
            field.publish(reading.magnitude());
        }
    }
}
