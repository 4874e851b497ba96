use dashmap::DashMap;
use uuid::Uuid;

use crate::models::driver::GeoPoint;
use crate::models::zone::Zone;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Picks the zone covering the given point. When radii overlap, the zone
/// whose center is closest wins.
pub fn resolve_zone(zones: &DashMap<Uuid, Zone>, point: &GeoPoint) -> Option<Uuid> {
    zones
        .iter()
        .filter_map(|entry| {
            let zone = entry.value();
            let distance = haversine_km(&zone.center, point);
            (distance <= zone.radius_km).then_some((zone.id, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use dashmap::DashMap;
    use uuid::Uuid;

    use super::{haversine_km, resolve_zone};
    use crate::models::driver::GeoPoint;
    use crate::models::zone::Zone;

    fn zone(id_seed: u128, name: &str, lat: f64, lng: f64, radius_km: f64) -> Zone {
        Zone {
            id: Uuid::from_u128(id_seed),
            name: name.to_string(),
            center: GeoPoint { lat, lng },
            radius_km,
        }
    }

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 53.5511,
            lng: 9.9937,
        };
        assert!(haversine_km(&p, &p) < 1e-9);
    }

    #[test]
    fn london_to_paris_is_around_343_km() {
        let london = GeoPoint {
            lat: 51.5074,
            lng: -0.1278,
        };
        let paris = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        assert!((haversine_km(&london, &paris) - 343.0).abs() < 5.0);
    }

    #[test]
    fn point_outside_every_radius_resolves_to_none() {
        let zones = DashMap::new();
        let z = zone(1, "harbor", 53.5511, 9.9937, 5.0);
        zones.insert(z.id, z);

        let far = GeoPoint {
            lat: 48.8566,
            lng: 2.3522,
        };
        assert!(resolve_zone(&zones, &far).is_none());
    }

    #[test]
    fn closest_center_wins_when_radii_overlap() {
        let zones = DashMap::new();
        let near = zone(1, "harbor", 53.55, 9.99, 50.0);
        let far = zone(2, "airport", 53.63, 10.00, 50.0);
        let near_id = near.id;
        zones.insert(near.id, near);
        zones.insert(far.id, far);

        let point = GeoPoint {
            lat: 53.551,
            lng: 9.991,
        };
        assert_eq!(resolve_zone(&zones, &point), Some(near_id));
    }
}
