//! QMC5883P I2C Address Configuration
//!
//! The QMC5883P answers on a single fixed 7-bit address, 0x2C.
//! The wrapper still accepts any value so boards behind an address
//! translator or a mux can be driven too.

/// 7-bit bus address of a QMC5883P, passed to every transaction unshifted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Address(pub u8);

impl Default for Address {
    /// Returns the factory I2C address (0x2C).
    fn default() -> Self {
        Self(0x2C)
    }
}

impl From<Address> for u8 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<u8> for Address {
    fn from(addr: u8) -> Self {
        Self(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::Address;

    #[test]
    fn default_address_is_0x2c() {
        assert_eq!(u8::from(Address::default()), 0x2C);
        assert_eq!(Address::from(0x0D), Address(0x0D));
    }
}
