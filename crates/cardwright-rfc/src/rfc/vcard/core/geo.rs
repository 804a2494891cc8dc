//! Geographic position values (RFC 5870 `geo:` URIs).
//!
//! Used both by the GEO property and by the GEO parameter of ADR.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A `geo:` URI.
#[derive(Debug, Clone)]
pub struct GeoUri {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    /// Coordinate reference system (`crs` parameter).
    pub crs: Option<String>,
    /// Uncertainty in meters (`u` parameter).
    pub uncertainty: Option<f64>,
    /// Any other URI parameters, in order of appearance.
    pub parameters: Vec<(String, String)>,
}

impl GeoUri {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            crs: None,
            uncertainty: None,
            parameters: Vec::new(),
        }
    }

    /// Returns whether latitude and longitude are within their ranges.
    #[must_use]
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

fn bits(value: Option<f64>) -> Option<u64> {
    value.map(f64::to_bits)
}

impl PartialEq for GeoUri {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
            && bits(self.altitude) == bits(other.altitude)
            && self.crs == other.crs
            && bits(self.uncertainty) == bits(other.uncertainty)
            && self.parameters == other.parameters
    }
}

impl Eq for GeoUri {}

impl Hash for GeoUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
        bits(self.altitude).hash(state);
        self.crs.hash(state);
        bits(self.uncertainty).hash(state);
        self.parameters.hash(state);
    }
}

impl fmt::Display for GeoUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geo:{},{}", self.latitude, self.longitude)?;
        if let Some(altitude) = self.altitude {
            write!(f, ",{altitude}")?;
        }
        if let Some(crs) = &self.crs {
            write!(f, ";crs={crs}")?;
        }
        if let Some(uncertainty) = self.uncertainty {
            write!(f, ";u={uncertainty}")?;
        }
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

/// Error returned for a value that is not a `geo:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidGeoUri(pub String);

impl FromStr for GeoUri {
    type Err = InvalidGeoUri;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidGeoUri(s.to_string());

        let rest = s
            .get(..4)
            .filter(|scheme| scheme.eq_ignore_ascii_case("geo:"))
            .map(|_| &s[4..])
            .ok_or_else(invalid)?;

        let mut sections = rest.split(';');
        let coords = sections.next().unwrap_or_default();
        let coords: Vec<&str> = coords.split(',').collect();
        if !(2..=3).contains(&coords.len()) {
            return Err(invalid());
        }

        let number = |v: &str| v.trim().parse::<f64>().map_err(|_err| invalid());
        let mut geo = Self::new(number(coords[0])?, number(coords[1])?);
        if let Some(altitude) = coords.get(2) {
            geo.altitude = Some(number(altitude)?);
        }

        for section in sections {
            let (name, value) = section.split_once('=').ok_or_else(invalid)?;
            if name.eq_ignore_ascii_case("crs") {
                geo.crs = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("u") {
                geo.uncertainty = Some(number(value)?);
            } else {
                geo.parameters.push((name.to_string(), value.to_string()));
            }
        }

        Ok(geo)
    }
}
