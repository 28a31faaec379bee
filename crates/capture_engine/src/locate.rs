use std::time::Duration;

use capture_core::{Coordinates, LocationFailure, Msg};
use rand::Rng;

use crate::Geolocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Substitute a flagged approximate fix near the reference point.
    #[default]
    Approximate,
    /// Report the location as unavailable and send without one.
    Withhold,
}

/// What to report when the device cannot provide a position.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackLocation {
    pub policy: FallbackPolicy,
    pub reference_latitude: f64,
    pub reference_longitude: f64,
    /// Upper bound of the random offset added to each axis, in degrees.
    pub radius_degrees: f64,
    pub place_name: String,
}

impl Default for FallbackLocation {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::Approximate,
            reference_latitude: 19.0760,
            reference_longitude: 72.8777,
            radius_degrees: 0.1,
            place_name: "Mumbai, Maharashtra".to_string(),
        }
    }
}

impl FallbackLocation {
    /// Message reporting `failure` under this policy.
    ///
    /// A device without the capability gets the reference point itself; any
    /// other failure gets a uniform offset in `[0, radius)` on both axes.
    pub fn resolve<R: Rng + ?Sized>(&self, failure: LocationFailure, rng: &mut R) -> Msg {
        if self.policy == FallbackPolicy::Withhold {
            return Msg::LocationUnavailable(failure);
        }
        let (lat_offset, lng_offset) = if failure == LocationFailure::Unsupported {
            (0.0, 0.0)
        } else {
            (
                rng.gen::<f64>() * self.radius_degrees,
                rng.gen::<f64>() * self.radius_degrees,
            )
        };
        match Coordinates::new(
            self.reference_latitude + lat_offset,
            self.reference_longitude + lng_offset,
        ) {
            Some(coordinates) => Msg::LocationApproximated {
                coordinates,
                place_name: self.place_name.clone(),
                failure,
            },
            None => Msg::LocationUnavailable(failure),
        }
    }
}

/// Requests the current position once, bounded by `timeout`.
pub async fn locate(
    geolocator: Option<&dyn Geolocator>,
    timeout: Duration,
) -> Result<Coordinates, LocationFailure> {
    let Some(geolocator) = geolocator else {
        return Err(LocationFailure::Unsupported);
    };
    let position = tokio::time::timeout(timeout, geolocator.current_position())
        .await
        .map_err(|_| LocationFailure::Timeout)?
        .map_err(|err| err.failure())?;
    Coordinates::new(position.latitude, position.longitude).ok_or(LocationFailure::Invalid)
}

#[cfg(test)]
mod tests {
    use capture_core::{LocationFailure, Msg};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{FallbackLocation, FallbackPolicy};

    #[test]
    fn missing_capability_uses_reference_point() {
        let fallback = FallbackLocation::default();
        let mut rng = StdRng::seed_from_u64(7);
        match fallback.resolve(LocationFailure::Unsupported, &mut rng) {
            Msg::LocationApproximated {
                coordinates,
                place_name,
                ..
            } => {
                assert_eq!(coordinates.latitude(), 19.0760);
                assert_eq!(coordinates.longitude(), 72.8777);
                assert_eq!(place_name, "Mumbai, Maharashtra");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failures_stay_within_radius() {
        let fallback = FallbackLocation::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let Msg::LocationApproximated { coordinates, .. } =
                fallback.resolve(LocationFailure::Denied, &mut rng)
            else {
                panic!("expected approximate fix");
            };
            let lat = coordinates.latitude() - 19.0760;
            let lng = coordinates.longitude() - 72.8777;
            assert!((0.0..0.1 + 1e-9).contains(&lat), "lat offset {lat}");
            assert!((0.0..0.1 + 1e-9).contains(&lng), "lng offset {lng}");
        }
    }

    #[test]
    fn withhold_policy_reports_unavailable() {
        let fallback = FallbackLocation {
            policy: FallbackPolicy::Withhold,
            ..FallbackLocation::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            fallback.resolve(LocationFailure::Timeout, &mut rng),
            Msg::LocationUnavailable(LocationFailure::Timeout)
        );
    }

    #[test]
    fn non_finite_reference_reports_unavailable() {
        let fallback = FallbackLocation {
            reference_latitude: f64::NAN,
            ..FallbackLocation::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            fallback.resolve(LocationFailure::Denied, &mut rng),
            Msg::LocationUnavailable(LocationFailure::Denied)
        );
    }
}
