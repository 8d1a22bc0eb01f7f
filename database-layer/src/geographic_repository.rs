use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::error::{DatabaseError, DatabaseResult};

/// Mean Earth radius used by every distance computation, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 12.9716)]
    pub latitude: f64,
    #[schema(example = 77.5946)]
    pub longitude: f64,
}

impl GeoPoint {
    /// # Errors
    ///
    /// `InvalidCoordinates` when latitude is outside [-90, 90] or longitude
    /// outside [-180, 180] (NaN included).
    pub fn new(latitude: f64, longitude: f64) -> DatabaseResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DatabaseError::InvalidCoordinates(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DatabaseError::InvalidCoordinates(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Great-circle distance by the spherical law of cosines.
    ///
    /// Mirrors the SQL expression used by [`GeographicRepository::search_nearby`].
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let delta_lon = (other.longitude - self.longitude).to_radians();
        let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lon.cos();
        EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
    }
}

/// Store found within the search radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NearbyStore {
    /// Store mobile number, the identifier the rest of the flow keys on
    pub mobile: String,
    pub distance_km: f64,
}

/// Validate a search radius in kilometres
///
/// # Errors
///
/// `Validation` for a negative, NaN or infinite radius.
pub fn validate_radius(radius_km: f64) -> DatabaseResult<f64> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(DatabaseError::Validation(format!(
            "radius_km must be a finite, non-negative number, got {radius_km}"
        )))
    }
}

/// Repository for location based store queries
#[derive(Debug, Clone)]
pub struct GeographicRepository {
    pool: PgPool,
}

impl GeographicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active stores within `radius_km` of `origin`, nearest first.
    ///
    /// Ties keep whatever order the database produces. An empty result is
    /// not an error.
    ///
    /// # Errors
    ///
    /// `Validation` for a bad radius, `QueryFailed`/`ConnectionFailed` when
    /// the query fails.
    pub async fn search_nearby(
        &self,
        origin: GeoPoint,
        radius_km: f64,
    ) -> DatabaseResult<Vec<NearbyStore>> {
        let radius_km = validate_radius(radius_km)?;
        debug!(radius_km, "Searching stores by distance");

        // LEAST/GREATEST keep acos inside its domain when the store sits
        // exactly on the origin and rounding pushes the cosine above 1.
        let stores = sqlx::query_as::<_, NearbyStore>(
            r#"
            SELECT mobile, distance_km
            FROM (
                SELECT mobile,
                       $3 * acos(LEAST(1.0, GREATEST(-1.0,
                           sin(radians($1)) * sin(radians(latitude))
                           + cos(radians($1)) * cos(radians(latitude))
                             * cos(radians(longitude) - radians($2))
                       ))) AS distance_km
                FROM tbl_store
                WHERE active_flag = 1
            ) AS candidates
            WHERE distance_km <= $4
            ORDER BY distance_km ASC
            "#,
        )
        .bind(origin.latitude)
        .bind(origin.longitude)
        .bind(EARTH_RADIUS_KM)
        .bind(radius_km)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::query("Database error while searching nearby stores"))?;

        info!(radius_km, found = stores.len(), "Hyperlocal store search finished");
        Ok(stores)
    }
}
