//! BigCommerce management (REST) API types and requests.
//!
//! Only the two read-only endpoints the shipping country list needs are
//! covered: `/v2/countries` and `/v2/shipping/zones`.

use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::BigCommerceError;

/// A country known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub id: i64,
    pub country: String,
    pub country_iso2: String,
    pub country_iso3: String,
    pub states: CountryStates,
}

/// Link to a country's states resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryStates {
    pub url: String,
    pub resource: String,
}

/// A shipping zone and the locations it covers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShippingZone {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub locations: Vec<ZoneLocation>,
    pub free_shipping: FreeShipping,
    pub enabled: bool,
}

/// One location inside a shipping zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneLocation {
    pub id: i64,
    pub country_iso2: String,
    pub zip: Option<String>,
}

/// Free-shipping rule of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FreeShipping {
    pub enabled: bool,
    pub minimum_sub_total: String,
    pub exclude_fixed_shipping_products: bool,
}

/// Minimal client for the management API.
#[derive(Clone)]
pub(crate) struct ManagementClient {
    client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl ManagementClient {
    pub(crate) fn new(
        client: reqwest::Client,
        base_url: String,
        access_token: SecretString,
    ) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    pub(crate) async fn countries(&self) -> Result<Vec<Country>, BigCommerceError> {
        let countries: Vec<Country> = self.get("/v2/countries").await?;
        validate_countries(&countries)?;
        Ok(countries)
    }

    pub(crate) async fn shipping_zones(&self) -> Result<Vec<ShippingZone>, BigCommerceError> {
        self.get("/v2/shipping/zones").await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, BigCommerceError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", self.access_token.expose_secret())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "BigCommerce management API returned non-success status"
            );
            return Err(BigCommerceError::InvalidResponse(format!(
                "HTTP {status} from {path}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path, "Failed to parse management API response");
            BigCommerceError::Parse(e)
        })
    }
}

/// Reject the whole list when any entry is malformed.
fn validate_countries(countries: &[Country]) -> Result<(), BigCommerceError> {
    match countries
        .iter()
        .find(|c| c.id < 1 || c.country.trim().is_empty())
    {
        Some(bad) => Err(BigCommerceError::InvalidResponse(format!(
            "country {} has an invalid id or name",
            bad.id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn country(id: i64, name: &str) -> Country {
        Country {
            id,
            country: name.to_string(),
            country_iso2: "US".to_string(),
            country_iso3: "USA".to_string(),
            states: CountryStates {
                url: String::new(),
                resource: "/countries/226/states".to_string(),
            },
        }
    }

    #[test]
    fn test_zone_deserializes_type_field() {
        let zone: ShippingZone = serde_json::from_value(json!({
            "id": 1,
            "name": "Domestic",
            "type": "country",
            "locations": [{"id": 4, "country_iso2": "US"}],
            "free_shipping": {
                "enabled": false,
                "minimum_sub_total": "0.0000",
                "exclude_fixed_shipping_products": false
            },
            "enabled": true
        }))
        .unwrap();
        assert_eq!(zone.zone_type, "country");
        assert!(zone.locations[0].zip.is_none());
    }

    #[test]
    fn test_validate_countries_rejects_whole_list() {
        let countries = vec![country(226, "United States"), country(0, "Nowhere")];
        assert!(matches!(
            validate_countries(&countries),
            Err(BigCommerceError::InvalidResponse(_))
        ));

        let countries = vec![country(226, "United States"), country(13, " ")];
        assert!(validate_countries(&countries).is_err());

        assert!(validate_countries(&[country(226, "United States")]).is_ok());
    }
}
