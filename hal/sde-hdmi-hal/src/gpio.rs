//! GPIO pin abstractions
//!
//! The HDMI transmitter uses one input (hot-plug detect) and one output
//! (the 5V/HPD supply enable).

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input pin with configurable polarity
///
/// Some boards route HPD through an inverting level shifter.
pub struct ActiveLevel<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> ActiveLevel<P> {
    /// Wrap a pin that is asserted when high
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Wrap a pin that is asserted when low
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Check if the signal is asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_high() != self.active_low
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}
