//! Abstract Heap Location
//!
//! Each allocation statement (and each dimension of a `newmultiarray`) is one
//! location. A single `external` location stands for every object created
//! outside the analyzed program.

use std::fmt;

pub type LocationId = u32;

/// Location id reserved for objects of unknown origin
pub const EXTERNAL_LOCATION: LocationId = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbstractLocation {
    pub id: LocationId,

    /// e.g. `<DepTest: main([Ljava/lang/String;)V>#3[1]`
    pub allocation_site: String,

    pub type_info: Option<String>,
}

impl AbstractLocation {
    pub fn new(id: LocationId, allocation_site: impl Into<String>) -> Self {
        Self {
            id,
            allocation_site: allocation_site.into(),
            type_info: None,
        }
    }

    pub fn with_type(mut self, type_info: impl Into<String>) -> Self {
        self.type_info = Some(type_info.into());
        self
    }

    pub fn is_external(&self) -> bool {
        self.id == EXTERNAL_LOCATION
    }
}

impl fmt::Display for AbstractLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_info {
            Some(ty) => write!(f, "{}:{}", self.allocation_site, ty),
            None => write!(f, "{}", self.allocation_site),
        }
    }
}

/// Hands out location ids; id 0 is always the external location
#[derive(Debug)]
pub struct LocationFactory {
    locations: Vec<AbstractLocation>,
}

impl LocationFactory {
    pub fn new() -> Self {
        Self {
            locations: vec![AbstractLocation::new(EXTERNAL_LOCATION, "external")],
        }
    }

    pub fn create(&mut self, allocation_site: impl Into<String>, type_info: impl Into<String>) -> LocationId {
        let id = self.locations.len() as LocationId;
        self.locations
            .push(AbstractLocation::new(id, allocation_site).with_type(type_info));
        id
    }

    pub fn into_locations(self) -> Vec<AbstractLocation> {
        self.locations
    }
}
