//! Movement system - advances walking and flying robots along their route.

use crate::components::{Location, Route};

/// Advance `route` by one tick and update `location`.
///
/// Walkers cover `walk_speed * real_secs` tiles but step through at most one
/// waypoint per tick. Flights burn `sim_hours` of transit time; the location
/// stays in transit until the behavior system lands the robot.
///
/// Returns true once the route is exhausted.
pub fn advance_route(
    route: &mut Route,
    location: &mut Location,
    real_secs: f32,
    sim_hours: f32,
    walk_speed: f32,
) -> bool {
    match route {
        Route::Walk { steps, progress } => {
            if steps.is_empty() {
                return true;
            }
            *progress += walk_speed * real_secs.max(0.0);
            if *progress >= 1.0 {
                if let Some(next) = steps.pop_front() {
                    *location = Location::Cell(next);
                }
                *progress = (*progress - 1.0).min(0.99);
            }
            steps.is_empty()
        }
        Route::Flight {
            remaining_hours, ..
        } => {
            *remaining_hours -= sim_hours.max(0.0);
            *remaining_hours <= 0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbots_logic::hex::Hex;

    #[test]
    fn test_walk_one_waypoint_per_tick() {
        let mut route = Route::walk(vec![Hex::new(1, 0), Hex::new(2, 0), Hex::new(3, 0)]);
        let mut location = Location::Cell(Hex::ORIGIN);

        // 2.5 tiles/s for 2s would be 5 tiles, but only one step is taken.
        assert!(!advance_route(&mut route, &mut location, 2.0, 0.0, 2.5));
        assert_eq!(location, Location::Cell(Hex::new(1, 0)));
        assert_eq!(route.len(), 2);

        assert!(!advance_route(&mut route, &mut location, 2.0, 0.0, 2.5));
        assert!(advance_route(&mut route, &mut location, 2.0, 0.0, 2.5));
        assert_eq!(location, Location::Cell(Hex::new(3, 0)));
    }

    #[test]
    fn test_walk_accumulates_partial_steps() {
        let mut route = Route::walk(vec![Hex::new(0, 1)]);
        let mut location = Location::Cell(Hex::ORIGIN);
        // 0.25 tiles per tick
        for _ in 0..3 {
            assert!(!advance_route(&mut route, &mut location, 0.1, 0.0, 2.5));
            assert_eq!(location, Location::Cell(Hex::ORIGIN));
        }
        assert!(advance_route(&mut route, &mut location, 0.1, 0.0, 2.5));
        assert_eq!(location, Location::Cell(Hex::new(0, 1)));
    }

    #[test]
    fn test_flight_counts_down() {
        let mut route = Route::Flight {
            to: "mars".into(),
            remaining_hours: 3.0,
        };
        let mut location = Location::InTransit {
            from: "earth".into(),
            to: "mars".into(),
        };
        assert!(!advance_route(&mut route, &mut location, 1.0, 2.0, 2.5));
        assert!(advance_route(&mut route, &mut location, 1.0, 2.0, 2.5));
        assert!(matches!(location, Location::InTransit { .. }));
    }
}
