//! JSON dataset format for the catalogue.

use std::path::Path;

use serde::Deserialize;

use crate::domain::{
    Area, Coordinates, FareSchedule, Frequency, Route, RouteNumber, ServiceType, Stop, Zone,
};

use super::error::CatalogueError;

/// Top-level dataset document.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogueDto {
    pub routes: Vec<RouteDto>,
    #[serde(default)]
    pub areas: Vec<AreaDto>,
    #[serde(default)]
    pub stops: Vec<StopDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub fare: FareDto,
    pub frequency: String,
    pub operating_hours: String,
    pub key_stops: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    pub distance: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FareDto {
    pub ordinary: u32,
    pub deluxe: u32,
}

#[derive(Debug, Deserialize)]
pub struct AreaDto {
    pub name: String,
    pub places: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct StopDto {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub zone: String,
    #[serde(default)]
    pub facilities: Vec<String>,
}

/// Validated, domain-typed contents of a dataset.
#[derive(Debug)]
pub struct Dataset {
    pub routes: Vec<Route>,
    pub stops: Vec<Stop>,
    pub areas: Vec<Area>,
}

/// Parse a dataset from a JSON string.
pub fn parse_dataset(json: &str) -> Result<Dataset, CatalogueError> {
    let dto: CatalogueDto = serde_json::from_str(json)?;
    dto.try_into()
}

/// Read and parse a dataset file.
pub fn read_dataset(path: &Path) -> Result<Dataset, CatalogueError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_dataset(&contents)
}

impl TryFrom<CatalogueDto> for Dataset {
    type Error = CatalogueError;

    fn try_from(dto: CatalogueDto) -> Result<Self, Self::Error> {
        let routes = dto
            .routes
            .into_iter()
            .map(Route::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let stops = dto
            .stops
            .into_iter()
            .map(Stop::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let areas = dto
            .areas
            .into_iter()
            .map(|a| Area::new(a.name, a.places))
            .collect();

        Ok(Dataset {
            routes,
            stops,
            areas,
        })
    }
}

impl TryFrom<RouteDto> for Route {
    type Error = CatalogueError;

    fn try_from(dto: RouteDto) -> Result<Self, Self::Error> {
        Ok(Route {
            number: RouteNumber::parse(&dto.number)?,
            name: dto.name,
            service_type: ServiceType::parse(&dto.service_type)?,
            fare: FareSchedule {
                ordinary: dto.fare.ordinary,
                deluxe: dto.fare.deluxe,
            },
            frequency: Frequency::new(dto.frequency),
            operating_hours: dto.operating_hours,
            key_stops: dto.key_stops,
            accessibility: dto.accessibility,
            distance: dto.distance,
        })
    }
}

impl TryFrom<StopDto> for Stop {
    type Error = CatalogueError;

    fn try_from(dto: StopDto) -> Result<Self, Self::Error> {
        Ok(Stop::new(
            dto.name,
            Coordinates::new(dto.lat, dto.lng),
            Zone::parse(&dto.zone)?,
            dto.facilities,
        ))
    }
}
