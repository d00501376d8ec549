//! Pointer interaction primitives for selector surfaces.
//!
//! This module tracks the cursor in world space, resolves which interactive
//! element is hovered (topmost z wins, entity rank breaks ties), and raises
//! one-frame click triggers on `Clickable` elements. Widget behavior stays in
//! `systems::ui`; nothing here knows about selection semantics.
use bevy::{prelude::*, window::PrimaryWindow};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum InteractionSystem {
    Reset,
    Cursor,
    Hoverable,
    Clickable,
}

/// Cursor position projected into world coordinates, refreshed each frame.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct CursorWorldPosition {
    /// `None` while the cursor is outside the primary window.
    pub position: Option<Vec2>,
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Hoverable {
    /// Canonical hover truth for behavior systems.
    pub hovered: bool,
}

#[derive(Component)]
#[require(Hoverable)]
pub struct Clickable<T>
where
    T: Copy + Send + Sync,
{
    /// Typed actions emitted when this element is activated.
    pub actions: Vec<T>,
    /// Local-region size used for hover/click hit testing.
    pub region: Option<Vec2>,
    /// One-frame activation flag written by interaction systems.
    pub triggered: bool,
}

impl<T> Default for Clickable<T>
where
    T: Copy + Send + Sync,
{
    fn default() -> Self {
        Self {
            actions: vec![],
            region: None,
            triggered: false,
        }
    }
}

impl<T> Clickable<T>
where
    T: Copy + Send + Sync,
{
    pub fn new(actions: Vec<T>) -> Self {
        Self {
            actions,
            ..default()
        }
    }

    pub fn with_region(actions: Vec<T>, region: Vec2) -> Self {
        Self {
            actions,
            region: Some(region),
            ..default()
        }
    }
}

fn get_cursor_world_position(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) -> Option<Vec2> {
    let screen_position = window_query.single().ok()?.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    camera
        .viewport_to_world_2d(camera_transform, screen_position)
        .ok()
}

pub fn track_cursor_world_position(
    mut cursor: ResMut<CursorWorldPosition>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) {
    cursor.position = get_cursor_world_position(&window_query, &camera_query);
}

/// Tests whether the cursor falls inside a rectangular region attached to an
/// entity, honoring the entity's full world transform.
pub fn is_cursor_within_region(
    cursor_position: Vec2,
    transform: &Transform,
    global_transform: &GlobalTransform,
    region_size: Vec2,
) -> bool {
    let model_matrix = global_transform.to_matrix();

    let half_width = region_size.x / 2.0;
    let half_height = region_size.y / 2.0;

    let corners = [
        Vec3::new(-half_width, -half_height, 0.0),
        Vec3::new(half_width, -half_height, 0.0),
        Vec3::new(half_width, half_height, 0.0),
        Vec3::new(-half_width, half_height, 0.0),
    ];

    let world_corners: Vec<Vec2> = corners
        .iter()
        .map(|corner| {
            let scaled_corner = Vec3::new(
                corner.x * transform.scale.x,
                corner.y * transform.scale.y,
                corner.z * transform.scale.z,
            );
            let transformed = model_matrix.transform_point3(scaled_corner);
            Vec2::new(transformed.x, transformed.y)
        })
        .collect();

    is_point_in_polygon(cursor_position, &world_corners)
}

fn is_point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let vi = polygon[i];
        let vj = polygon[j];

        // Ray casting: count edge crossings left of the point.
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }

        j = i;
    }

    inside
}

pub fn reset_hoverable_state(mut query: Query<&mut Hoverable>) {
    for mut hoverable in query.iter_mut() {
        hoverable.hovered = false;
    }
}

/// Resolves the hovered element among all `Clickable<T>` regions.
///
/// When several regions contain the cursor, the highest z wins; equal z falls
/// back to entity rank so the outcome stays deterministic within a frame.
pub fn hoverable_system<T: Send + Sync + Copy + 'static>(
    cursor: Res<CursorWorldPosition>,
    mut hoverable_query: Query<(
        Entity,
        &Transform,
        &GlobalTransform,
        &Clickable<T>,
        Option<&InheritedVisibility>,
        &mut Hoverable,
    )>,
) {
    let Some(cursor_position) = cursor.position else {
        return;
    };

    let mut hovered_top: Option<(Entity, f32)> = None;
    for (entity, transform, global_transform, clickable, inherited_visibility, _) in
        hoverable_query.iter()
    {
        if inherited_visibility.is_some_and(|visibility| !visibility.get()) {
            continue;
        }
        let Some(region) = clickable.region else {
            continue;
        };
        if !is_cursor_within_region(cursor_position, transform, global_transform, region) {
            continue;
        }

        let z = global_transform.translation().z;
        let replace = match hovered_top {
            None => true,
            Some((current_entity, current_z)) => {
                z > current_z || (z == current_z && entity.index() > current_entity.index())
            }
        };
        if replace {
            hovered_top = Some((entity, z));
        }
    }

    if let Some((entity, _)) = hovered_top {
        if let Ok((_, _, _, _, _, mut hoverable)) = hoverable_query.get_mut(entity) {
            hoverable.hovered = true;
        }
    }
}

pub fn clickable_system<T: Send + Sync + Copy + 'static>(
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut clickable_query: Query<(&Hoverable, &mut Clickable<T>)>,
) {
    let pressed = mouse_input.just_pressed(MouseButton::Left);
    for (hoverable, mut clickable) in clickable_query.iter_mut() {
        clickable.triggered = pressed && hoverable.hovered;
    }
}

/// Registers the typed hover/click systems for one action type.
///
/// Call once per action type; the untyped cursor/reset systems come from
/// `InteractionPlugin` and run exactly once per frame.
pub fn register_pointer_systems<T: Send + Sync + Copy + 'static>(app: &mut App) {
    app.add_systems(
        Update,
        (
            hoverable_system::<T>.in_set(InteractionSystem::Hoverable),
            clickable_system::<T>
                .in_set(InteractionSystem::Clickable)
                .after(InteractionSystem::Hoverable),
        ),
    );
}

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorWorldPosition>()
            .init_resource::<ButtonInput<MouseButton>>()
            .configure_sets(
                Update,
                (
                    InteractionSystem::Reset,
                    InteractionSystem::Cursor.after(InteractionSystem::Reset),
                    InteractionSystem::Hoverable.after(InteractionSystem::Cursor),
                    InteractionSystem::Clickable.after(InteractionSystem::Hoverable),
                ),
            )
            .add_systems(
                Update,
                reset_hoverable_state.in_set(InteractionSystem::Reset),
            )
            .add_systems(
                Update,
                track_cursor_world_position.in_set(InteractionSystem::Cursor),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn region_hit_test_respects_translation() {
        let transform = Transform::from_xyz(100.0, 50.0, 0.0);
        let global_transform = GlobalTransform::from(transform);
        let region = Vec2::new(40.0, 20.0);

        assert!(is_cursor_within_region(
            Vec2::new(100.0, 50.0),
            &transform,
            &global_transform,
            region,
        ));
        assert!(is_cursor_within_region(
            Vec2::new(119.0, 59.0),
            &transform,
            &global_transform,
            region,
        ));
        assert!(!is_cursor_within_region(
            Vec2::new(121.0, 50.0),
            &transform,
            &global_transform,
            region,
        ));
    }

    #[test]
    fn clickable_insertion_adds_hoverable() {
        let mut world = World::new();
        let clickable = world.spawn(Clickable::<u8>::new(vec![0])).id();

        assert!(world.entity(clickable).get::<Hoverable>().is_some());
    }

    #[test]
    fn hover_resolution_prefers_higher_z() {
        let mut world = World::new();
        world.insert_resource(CursorWorldPosition {
            position: Some(Vec2::ZERO),
        });

        let region = Vec2::new(10.0, 10.0);
        let low = world
            .spawn((
                Clickable::<u8>::with_region(vec![0], region),
                Transform::from_xyz(0.0, 0.0, 0.0),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0)),
            ))
            .id();
        let high = world
            .spawn((
                Clickable::<u8>::with_region(vec![0], region),
                Transform::from_xyz(0.0, 0.0, 1.0),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 1.0)),
            ))
            .id();

        world
            .run_system_once(hoverable_system::<u8>)
            .expect("hover system");

        assert!(!world.entity(low).get::<Hoverable>().unwrap().hovered);
        assert!(world.entity(high).get::<Hoverable>().unwrap().hovered);
    }

    #[test]
    fn click_triggers_only_hovered_elements() {
        let mut world = World::new();
        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        world.insert_resource(mouse);

        let hovered = world.spawn(Clickable::<u8>::new(vec![0])).id();
        world.entity_mut(hovered).get_mut::<Hoverable>().unwrap().hovered = true;
        let idle = world.spawn(Clickable::<u8>::new(vec![0])).id();

        world
            .run_system_once(clickable_system::<u8>)
            .expect("click system");

        assert!(world.entity(hovered).get::<Clickable<u8>>().unwrap().triggered);
        assert!(!world.entity(idle).get::<Clickable<u8>>().unwrap().triggered);
    }
}
