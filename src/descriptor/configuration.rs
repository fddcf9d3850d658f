use super::{DecodeError, Fields};
use serde::Serialize;
use std::fmt;

/// Configuration and Other Speed Configuration descriptors share this layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub total_length: u16,
    pub num_interfaces: u8,
    /// Value which when used as an argument in the SET_CONFIGURATION request,
    /// causes the device to assume the configuration described by this descriptor.
    pub configuration_value: u8,
    pub index_configuration: u8,
    pub attributes: ConfigurationAttributes,
    /// In units of 2 mA.
    pub max_power: u8,
}

impl Configuration {
    pub(crate) fn from_raw(d: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("Configuration", d);
        let w_total_length = f.u16(2)?;
        let b_num_interfaces = f.u8(4)?;
        let b_configuration_value = f.u8(5)?;
        let i_configuration = f.u8(6)?;
        let bm_attributes = f.u8(7)?;
        let b_max_power = f.u8(8)?;

        Ok(Configuration {
            total_length: w_total_length,
            num_interfaces: b_num_interfaces,
            configuration_value: b_configuration_value,
            index_configuration: i_configuration,
            attributes: ConfigurationAttributes(bm_attributes),
            max_power: b_max_power,
        })
    }

    pub fn max_power_milliamps(&self) -> u16 {
        u16::from(self.max_power) * 2
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigurationAttributes(pub u8);

macro_rules! flag {
    ($i:literal $f:ident) => {
        pub fn $f(&self) -> bool {
            self.0 & 1 << $i != 0
        }
    };
}

impl ConfigurationAttributes {
    flag!(6 self_powered);
    flag!(5 remote_wakeup);
}

impl fmt::Debug for ConfigurationAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_set();
        self.self_powered()
            .then(|| f.entry(&format_args!("SELF_POWERED")));
        self.remote_wakeup()
            .then(|| f.entry(&format_args!("REMOTE_WAKEUP")));
        f.finish()
    }
}

/// Binary Object Store header. The device capability descriptors follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bos {
    pub total_length: u16,
    pub num_device_caps: u8,
}

impl Bos {
    pub(crate) fn from_raw(d: &[u8]) -> Result<Self, DecodeError> {
        let f = Fields::new("BOS", d);
        Ok(Bos {
            total_length: f.u16(2)?,
            num_device_caps: f.u8(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration() {
        let c = Configuration::from_raw(&[0x09, 0x02, 0x22, 0x00, 0x01, 0x01, 0x00, 0xa0, 0x32])
            .unwrap();
        assert_eq!(c.total_length, 34);
        assert_eq!(c.num_interfaces, 1);
        assert_eq!(c.configuration_value, 1);
        assert!(c.attributes.remote_wakeup());
        assert!(!c.attributes.self_powered());
        assert_eq!(c.max_power_milliamps(), 100);
        assert_eq!(format!("{:?}", c.attributes), "{REMOTE_WAKEUP}");
    }

    #[test]
    fn bos() {
        let b = Bos::from_raw(&[0x05, 0x0f, 0x16, 0x00, 0x02]).unwrap();
        assert_eq!(b.total_length, 22);
        assert_eq!(b.num_device_caps, 2);
        assert!(Bos::from_raw(&[0x04, 0x0f, 0x16, 0x00]).is_err());
    }
}
