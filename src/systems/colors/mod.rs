//! Palette defaults and timed text color transitions.
use std::time::Duration;

use bevy::{
    color::ColorToComponents,
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

pub const NORMAL_TEXT_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
pub const SELECTED_TEXT_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const INDICATOR_COLOR: Color = Color::srgb(0.1015, 0.5195, 0.9961);

#[derive(Default, States, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorsSystemsActive {
    #[default]
    False,
    True,
}

/// Interpolates an entity's `TextColor` to a target over a fixed duration.
///
/// The starting color is captured from the entity's `TextColor` when the
/// component is inserted. The component removes itself once the target color
/// is reached.
#[derive(Component, Clone, Debug)]
#[component(on_insert = ColorTranslation::on_insert)]
pub struct ColorTranslation {
    pub initial_color: Vec4,
    pub final_color: Vec4,
    pub timer: Timer,
}

impl ColorTranslation {
    pub fn new(final_color: Color, duration: Duration) -> Self {
        Self {
            initial_color: Vec4::default(),
            final_color: final_color.to_linear().to_vec4(),
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(current) = world.entity(entity).get::<TextColor>().copied() else {
            warn!("ColorTranslation inserted before TextColor on {:?}", entity);
            return;
        };
        if let Some(mut translation) = world.entity_mut(entity).get_mut::<ColorTranslation>() {
            translation.initial_color = current.0.to_linear().to_vec4();
        }
    }

    pub fn translate(
        mut commands: Commands,
        time: Res<Time>,
        mut query: Query<(Entity, &mut ColorTranslation, &mut TextColor)>,
    ) {
        for (entity, mut translation, mut color) in query.iter_mut() {
            translation.timer.tick(time.delta());

            if translation.timer.finished() {
                color.0 = Color::LinearRgba(LinearRgba::from_vec4(translation.final_color));
                commands.entity(entity).remove::<ColorTranslation>();
            } else {
                let fraction_complete = translation.timer.fraction();
                let difference = translation.final_color - translation.initial_color;
                let blended = translation.initial_color + difference * fraction_complete;
                color.0 = Color::LinearRgba(LinearRgba::from_vec4(blended));
            }
        }
    }
}

fn activate_systems(
    mut state: ResMut<NextState<ColorsSystemsActive>>,
    query: Query<(), With<ColorTranslation>>,
) {
    if !query.is_empty() {
        state.set(ColorsSystemsActive::True)
    } else {
        state.set(ColorsSystemsActive::False)
    }
}

pub struct ColorsPlugin;

impl Plugin for ColorsPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<bevy::state::app::StatesPlugin>() {
            app.add_plugins(bevy::state::app::StatesPlugin);
        }
        app.init_state::<ColorsSystemsActive>()
            .init_resource::<Time>()
            .add_systems(Update, activate_systems)
            .add_systems(
                Update,
                ColorTranslation::translate.run_if(in_state(ColorsSystemsActive::True)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn insert_hook_captures_initial_color() {
        let mut world = World::new();
        let label = world
            .spawn((
                TextColor(NORMAL_TEXT_COLOR),
                ColorTranslation::new(SELECTED_TEXT_COLOR, Duration::from_millis(150)),
            ))
            .id();

        let translation = world
            .entity(label)
            .get::<ColorTranslation>()
            .cloned()
            .expect("color translation");
        assert_eq!(
            translation.initial_color,
            NORMAL_TEXT_COLOR.to_linear().to_vec4()
        );
        assert_eq!(
            translation.final_color,
            SELECTED_TEXT_COLOR.to_linear().to_vec4()
        );
    }

    #[test]
    fn finished_translation_snaps_and_removes_itself() {
        let mut world = World::new();
        world.init_resource::<Time>();
        let label = world
            .spawn((
                TextColor(NORMAL_TEXT_COLOR),
                ColorTranslation::new(SELECTED_TEXT_COLOR, Duration::ZERO),
            ))
            .id();

        world
            .run_system_once(ColorTranslation::translate)
            .expect("color system");

        let color = world.entity(label).get::<TextColor>().copied().unwrap();
        assert_eq!(
            color.0.to_linear().to_vec4(),
            SELECTED_TEXT_COLOR.to_linear().to_vec4()
        );
        assert!(world.entity(label).get::<ColorTranslation>().is_none());
    }
}
