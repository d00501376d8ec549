//! Timed transform translation used for animated indicator movement.
use std::time::Duration;

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

#[derive(Default, States, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MotionSystemsActive {
    #[default]
    False,
    True,
}

/// Moves an entity's `Transform` to a target position over a fixed duration.
///
/// The starting position is captured from the entity's `Transform` when the
/// component is inserted, so insertion order matters: `Transform` first. The
/// component removes itself once the target is reached.
#[derive(Component, Clone, Debug)]
#[component(on_insert = PointToPointTranslation::on_insert)]
pub struct PointToPointTranslation {
    pub initial_position: Vec3,
    pub final_position: Vec3,
    pub timer: Timer,
}

impl PointToPointTranslation {
    pub fn new(final_position: Vec3, duration: Duration) -> Self {
        Self {
            initial_position: Vec3::default(),
            final_position,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(transform) = world.entity(entity).get::<Transform>().copied() else {
            warn!(
                "PointToPointTranslation inserted before Transform on {:?}",
                entity
            );
            return;
        };
        if let Some(mut motion) = world
            .entity_mut(entity)
            .get_mut::<PointToPointTranslation>()
        {
            motion.initial_position = transform.translation;
        }
    }

    pub fn enact(
        mut commands: Commands,
        time: Res<Time>,
        mut query: Query<(Entity, &mut PointToPointTranslation, &mut Transform)>,
    ) {
        for (entity, mut motion, mut transform) in query.iter_mut() {
            motion.timer.tick(time.delta());

            if motion.timer.finished() {
                transform.translation = motion.final_position;
                commands.entity(entity).remove::<PointToPointTranslation>();
            } else {
                let fraction_complete = motion.timer.fraction();
                let difference = motion.final_position - motion.initial_position;
                transform.translation = motion.initial_position + difference * fraction_complete;
            }
        }
    }
}

fn activate_systems(
    mut state: ResMut<NextState<MotionSystemsActive>>,
    query: Query<(), With<PointToPointTranslation>>,
) {
    if !query.is_empty() {
        state.set(MotionSystemsActive::True)
    } else {
        state.set(MotionSystemsActive::False)
    }
}

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<bevy::state::app::StatesPlugin>() {
            app.add_plugins(bevy::state::app::StatesPlugin);
        }
        app.init_state::<MotionSystemsActive>()
            .init_resource::<Time>()
            .add_systems(Update, activate_systems)
            .add_systems(
                Update,
                PointToPointTranslation::enact.run_if(in_state(MotionSystemsActive::True)),
            );
    }
}
