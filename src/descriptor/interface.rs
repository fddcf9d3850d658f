use super::{DecodeError, Fields};
use crate::names::NameResolver;
use serde::Serialize;

/// A class/subclass/protocol triple together with its resolved names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCode {
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub class_name: String,
    pub subclass_name: String,
    pub protocol_name: String,
}

impl ClassCode {
    /// Reads the three consecutive code bytes starting at `at`.
    pub(crate) fn read(f: &Fields<'_>, at: usize, names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let class = f.u8(at)?;
        let subclass = f.u8(at + 1)?;
        let protocol = f.u8(at + 2)?;
        Ok(ClassCode {
            class,
            subclass,
            protocol,
            class_name: names.class_name(class),
            subclass_name: names.subclass_name(class, subclass),
            protocol_name: names.protocol_name(class, subclass, protocol),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interface {
    pub number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub class: ClassCode,
    pub index: u8,
}

impl Interface {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("Interface", buf);
        Ok(Interface {
            number: f.u8(2)?,
            alternate_setting: f.u8(3)?,
            num_endpoints: f.u8(4)?,
            class: ClassCode::read(&f, 5, names)?,
            index: f.u8(8)?,
        })
    }

    pub fn subclass(&self) -> u8 {
        self.class.subclass
    }
}

/// Groups consecutive interfaces into one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceAssociation {
    pub first_interface: u8,
    pub interface_count: u8,
    pub function_class: ClassCode,
    pub index_function: u8,
}

impl InterfaceAssociation {
    pub(crate) fn from_raw(buf: &[u8], names: &dyn NameResolver) -> Result<Self, DecodeError> {
        let f = Fields::new("Interface Association", buf);
        Ok(InterfaceAssociation {
            first_interface: f.u8(2)?,
            interface_count: f.u8(3)?,
            function_class: ClassCode::read(&f, 4, names)?,
            index_function: f.u8(7)?,
        })
    }
}
