use bevy::camera::primitives::Aabb;
use bevy::prelude::*;

use super::components::{CharacterBody, MapCollider};

/// World-space horizontal extent of the map, from its mesh bounds.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MapBounds {
    /// Grow to include an axis-aligned box in world space.
    pub fn include(bounds: Option<Self>, min: Vec3, max: Vec3) -> Self {
        let (lo, hi) = (min.xz(), max.xz());
        match bounds {
            Some(b) => Self {
                min: b.min.min(lo),
                max: b.max.max(hi),
            },
            None => Self { min: lo, max: hi },
        }
    }

    /// Push a position back inside the bounds on X and Z.
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min.x, self.max.x),
            position.y,
            position.z.clamp(self.min.y, self.max.y),
        )
    }
}

/// World-space corners of a local AABB.
fn world_extent(aabb: &Aabb, transform: &GlobalTransform) -> (Vec3, Vec3) {
    let center = Vec3::from(aabb.center);
    let half = Vec3::from(aabb.half_extents);
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { -half.x } else { half.x },
            if i & 2 == 0 { -half.y } else { half.y },
            if i & 4 == 0 { -half.z } else { half.z },
        );
        let p = transform.transform_point(center + corner);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Compute bounds once the map's meshes have their AABBs.
pub fn compute_map_bounds(
    mut commands: Commands,
    existing: Option<Res<MapBounds>>,
    maps: Query<(), With<MapCollider>>,
    parents: Query<&ChildOf>,
    meshes: Query<(Entity, &Aabb, &GlobalTransform)>,
) {
    if existing.is_some() {
        return;
    }

    let mut bounds = None;
    for (entity, aabb, transform) in &meshes {
        let on_map = parents
            .iter_ancestors(entity)
            .any(|ancestor| maps.contains(ancestor));
        if !on_map {
            continue;
        }
        let (min, max) = world_extent(aabb, transform);
        bounds = Some(MapBounds::include(bounds, min, max));
    }

    if let Some(bounds) = bounds {
        info!("Map bounds: {:?} .. {:?}", bounds.min, bounds.max);
        commands.insert_resource(bounds);
    }
}

/// Keep the character on the map after each movement tick.
pub fn clamp_to_map(
    bounds: Option<Res<MapBounds>>,
    mut query: Query<&mut Transform, With<CharacterBody>>,
) {
    let Some(bounds) = bounds else {
        return;
    };
    for mut transform in &mut query {
        let clamped = bounds.clamp(transform.translation);
        if clamped != transform.translation {
            transform.translation = clamped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_grow_to_cover_boxes() {
        let b = MapBounds::include(None, Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 3.0, 2.0));
        let b = MapBounds::include(Some(b), Vec3::new(0.0, 0.0, 1.0), Vec3::new(5.0, 1.0, 4.0));
        assert_eq!(b.min, Vec2::new(-1.0, -2.0));
        assert_eq!(b.max, Vec2::new(5.0, 4.0));
    }

    #[test]
    fn clamp_keeps_height() {
        let b = MapBounds {
            min: Vec2::splat(-10.0),
            max: Vec2::splat(10.0),
        };
        assert_eq!(b.clamp(Vec3::new(12.0, 0.5, -11.0)), Vec3::new(10.0, 0.5, -10.0));
        assert_eq!(b.clamp(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bounds_come_from_map_meshes_only() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, compute_map_bounds);

        let map = app.world_mut().spawn(MapCollider).id();
        app.world_mut().spawn((
            Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
            GlobalTransform::from_scale(Vec3::splat(8.0)),
            ChildOf(map),
        ));
        app.world_mut().spawn((
            Aabb::from_min_max(Vec3::splat(-100.0), Vec3::splat(100.0)),
            GlobalTransform::IDENTITY,
        ));
        app.update();

        let bounds = *app.world().resource::<MapBounds>();
        assert_eq!(bounds.min, Vec2::splat(-8.0));
        assert_eq!(bounds.max, Vec2::splat(8.0));
    }
}
