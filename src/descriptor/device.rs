use super::{ClassCode, DecodeError, Fields};
use crate::names::NameResolver;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub usb: String,
    pub class: ClassCode,
    pub max_packet_size_0: u8,
    pub vendor: u16,
    pub vendor_name: String,
    pub product: u16,
    pub product_name: String,
    pub device: String,
    pub index_manufacturer: u8,
    pub index_product: u8,
    pub index_serial_number: u8,
    pub num_configurations: u8,
}

impl Device {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("Device", buf);
        let vendor = f.u16(8)?;
        let product = f.u16(10)?;
        Ok(Device {
            usb: f.bcd(2)?,
            class: ClassCode::read(&f, 4, names)?,
            max_packet_size_0: f.u8(7)?,
            vendor,
            vendor_name: names.vendor_name(vendor),
            product,
            product_name: names.product_name(vendor, product),
            device: f.bcd(12)?,
            index_manufacturer: f.u8(14)?,
            index_product: f.u8(15)?,
            index_serial_number: f.u8(16)?,
            num_configurations: f.u8(17)?,
        })
    }
}

/// How a high-speed capable device would behave at the other speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceQualifier {
    pub usb: String,
    pub class: ClassCode,
    pub max_packet_size_0: u8,
    pub num_configurations: u8,
    pub reserved: u8,
}

impl DeviceQualifier {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("Device Qualifier", buf);
        Ok(DeviceQualifier {
            usb: f.bcd(2)?,
            class: ClassCode::read(&f, 4, names)?,
            max_packet_size_0: f.u8(7)?,
            num_configurations: f.u8(8)?,
            reserved: f.u8(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::BuiltinNames;

    const KEYBOARD: [u8; 18] = [
        0x12, 0x01, 0x10, 0x02, 0x00, 0x00, 0x00, 0x40, 0xd0, 0x04, 0x01, 0x01, 0x00, 0x01, 0x01,
        0x02, 0x03, 0x01,
    ];

    #[test]
    fn device() {
        let d = Device::from_raw(&KEYBOARD, &BuiltinNames).unwrap();
        assert_eq!(d.usb, "2.10");
        assert_eq!(d.device, "1.00");
        assert_eq!(d.vendor, 0x04d0);
        assert_eq!(d.product, 0x0101);
        assert_eq!(d.vendor_name, "Unknown Vendor (0x04d0)");
        assert_eq!(d.max_packet_size_0, 64);
        assert_eq!(d.class.class_name, "(Defined at Interface level)");
        assert_eq!(
            (d.index_manufacturer, d.index_product, d.index_serial_number),
            (1, 2, 3)
        );
        assert_eq!(d.num_configurations, 1);
    }

    #[test]
    fn truncated_device() {
        assert!(matches!(
            Device::from_raw(&KEYBOARD[..17], &BuiltinNames),
            Err(DecodeError::FieldBounds { offset: 17, .. })
        ));
    }

    #[test]
    fn qualifier() {
        let q = DeviceQualifier::from_raw(
            &[0x0a, 0x06, 0x00, 0x02, 0xef, 0x02, 0x01, 0x40, 0x01, 0x00],
            &BuiltinNames,
        )
        .unwrap();
        assert_eq!(q.usb, "2.00");
        assert_eq!(q.class.class_name, "Miscellaneous Device");
        assert_eq!(q.class.protocol_name, "Interface Association");
        assert_eq!(q.num_configurations, 1);
        assert_eq!(q.reserved, 0);
    }
}
