//! Locations
//!
//! Static reference data for cascading address selection: divisions contain
//! districts, districts contain upazilas.

use serde::Deserialize;
use thiserror::Error;

use crate::checkout::form::ShippingAddress;

const BANGLADESH_YAML: &str = include_str!("locations.yaml");

/// Errors raised when loading reference data or selecting an address part.
#[derive(Debug, Error)]
pub enum LocationError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Division not in the dataset
    #[error("Unknown division: {0}")]
    UnknownDivision(String),

    /// District not in the selected division
    #[error("Unknown district {district} in division {division}")]
    UnknownDistrict {
        /// Selected division
        division: String,
        /// Requested district
        district: String,
    },

    /// Upazila not in the selected district
    #[error("Unknown upazila {upazila} in district {district}")]
    UnknownUpazila {
        /// Selected district
        district: String,
        /// Requested upazila
        upazila: String,
    },
}

/// A top-level administrative division.
#[derive(Debug, Clone, Deserialize)]
pub struct Division {
    /// Division name
    pub name: String,

    /// Districts in the division
    pub districts: Vec<District>,
}

/// A district within a division.
#[derive(Debug, Clone, Deserialize)]
pub struct District {
    /// District name
    pub name: String,

    /// Upazilas in the district
    pub upazilas: Vec<String>,
}

/// Location reference dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct Locations {
    divisions: Vec<Division>,
}

impl Locations {
    /// The bundled dataset of Bangladesh divisions, districts and upazilas.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Yaml`] if the bundled data fails to parse.
    pub fn bangladesh() -> Result<Self, LocationError> {
        Self::from_yaml(BANGLADESH_YAML)
    }

    /// Load a dataset from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Yaml`] if the document is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, LocationError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// All division names.
    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.divisions.iter().map(|division| division.name.as_str())
    }

    /// District names within a division. Empty if the division is unknown or unset.
    pub fn districts<'a>(&'a self, division: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.division(division)
            .into_iter()
            .flat_map(|division| division.districts.iter())
            .map(|district| district.name.as_str())
    }

    /// Upazila names within a district of a division. Empty if either is unknown or unset.
    pub fn upazilas<'a>(
        &'a self,
        division: &str,
        district: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.district(division, district)
            .into_iter()
            .flat_map(|district| district.upazilas.iter())
            .map(String::as_str)
    }

    /// Select a division on an address, clearing its district and upazila.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::UnknownDivision`] if the division is not in the dataset.
    pub fn select_division(
        &self,
        address: &mut ShippingAddress,
        division: &str,
    ) -> Result<(), LocationError> {
        let Some(found) = self.division(division) else {
            return Err(LocationError::UnknownDivision(division.to_string()));
        };

        address.set_division(found.name.as_str());

        Ok(())
    }

    /// Select a district within the address's division, clearing its upazila.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::UnknownDistrict`] if the district is not in the selected division.
    pub fn select_district(
        &self,
        address: &mut ShippingAddress,
        district: &str,
    ) -> Result<(), LocationError> {
        let Some(found) = self.district(&address.division, district) else {
            return Err(LocationError::UnknownDistrict {
                division: address.division.clone(),
                district: district.to_string(),
            });
        };

        address.set_district(found.name.as_str());

        Ok(())
    }

    /// Select an upazila within the address's district.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::UnknownUpazila`] if the upazila is not in the selected district.
    pub fn select_upazila(
        &self,
        address: &mut ShippingAddress,
        upazila: &str,
    ) -> Result<(), LocationError> {
        let found = self
            .upazilas(&address.division, &address.district)
            .find(|name| matches_name(name, upazila));

        let Some(found) = found else {
            return Err(LocationError::UnknownUpazila {
                district: address.district.clone(),
                upazila: upazila.to_string(),
            });
        };

        address.set_upazila(found);

        Ok(())
    }

    fn division(&self, name: &str) -> Option<&Division> {
        self.divisions
            .iter()
            .find(|division| matches_name(&division.name, name))
    }

    fn district(&self, division: &str, name: &str) -> Option<&District> {
        self.division(division)?
            .districts
            .iter()
            .find(|district| matches_name(&district.name, name))
    }
}

fn matches_name(known: &str, requested: &str) -> bool {
    let requested = requested.trim();

    !requested.is_empty() && known.eq_ignore_ascii_case(requested)
}
