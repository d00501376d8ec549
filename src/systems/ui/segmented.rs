//! Segmented selector: a horizontal row of tappable titles with an indicator
//! bar tracking the selected one.
//!
//! The widget is a single `SegmentedSelector` component; label and indicator
//! children are spawned on insert and kept consistent by the plugin's
//! ensure/apply/sync systems. Selection changes requested by pointer clicks
//! pass through an optional `SelectionGate` veto before being applied.
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};

use crate::systems::{
    colors::{
        ColorTranslation, ColorsPlugin, INDICATOR_COLOR, NORMAL_TEXT_COLOR, SELECTED_TEXT_COLOR,
    },
    interaction::{
        register_pointer_systems, Clickable, InteractionPlugin, InteractionSystem,
    },
    motion::{MotionPlugin, PointToPointTranslation},
};

/// Duration of one animated selection transition.
pub const SELECT_TRANSITION: Duration = Duration::from_millis(150);

const LABEL_Z: f32 = 1.0;
const INDICATOR_Z: f32 = 0.5;

/// Pointer action emitted by selector labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentedAction {
    Select,
}

/// Capability injected by the host to veto pending selection changes.
///
/// Consulted once per differing click with the candidate index; returning
/// `false` rejects the change and leaves all selector state untouched.
pub trait SelectionObserver: Send + Sync {
    fn should_select(&self, selector: Entity, proposed: usize) -> bool;
}

impl<F> SelectionObserver for F
where
    F: Fn(Entity, usize) -> bool + Send + Sync,
{
    fn should_select(&self, selector: Entity, proposed: usize) -> bool {
        self(selector, proposed)
    }
}

/// Optional veto hook attached next to a `SegmentedSelector`.
#[derive(Component, Clone)]
pub struct SelectionGate(pub Arc<dyn SelectionObserver>);

impl SelectionGate {
    pub fn new<O: SelectionObserver + 'static>(observer: O) -> Self {
        Self(Arc::new(observer))
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionChanged {
    /// Selector entity whose selection changed.
    pub selector: Entity,
    /// Newly selected index.
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingSelect {
    previous: usize,
    animated: bool,
}

/// The segmented selector widget.
///
/// Constructed with a non-empty ordered title sequence and a valid initial
/// index; both preconditions are programmer-error contracts enforced with
/// panics, here and in [`SegmentedSelector::set_titles`]. Styling fields are
/// public and may be rewritten at any time without touching selection state.
#[derive(Component, Clone, Debug)]
#[require(Transform, Visibility)]
#[component(on_insert = SegmentedSelector::on_insert)]
pub struct SegmentedSelector {
    titles: Vec<String>,
    selected: usize,
    generation: u32,
    pending: Option<PendingSelect>,
    /// Total track footprint; labels divide its width equally.
    pub track_size: Vec2,
    pub normal_color: Color,
    pub selected_color: Color,
    pub indicator_color: Color,
    pub normal_font: TextFont,
    pub selected_font: TextFont,
    /// Indicator bar height, anchored to the bottom edge of the track.
    pub indicator_thickness: f32,
}

impl SegmentedSelector {
    pub fn new<I, S>(titles: I, selected: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        assert!(
            !titles.is_empty(),
            "segmented selector requires at least one title"
        );
        assert!(
            selected < titles.len(),
            "selected index {selected} out of bounds for {} titles",
            titles.len()
        );
        Self {
            titles,
            selected,
            generation: 0,
            pending: None,
            track_size: Vec2::new(320.0, 48.0),
            normal_color: NORMAL_TEXT_COLOR,
            selected_color: SELECTED_TEXT_COLOR,
            indicator_color: INDICATOR_COLOR,
            normal_font: TextFont {
                font_size: 14.0,
                ..default()
            },
            selected_font: TextFont {
                font_size: 14.0,
                ..default()
            },
            indicator_thickness: 3.0,
        }
    }

    pub fn with_track_size(mut self, track_size: Vec2) -> Self {
        self.track_size = track_size.max(Vec2::splat(1.0));
        self
    }

    pub fn with_normal_color(mut self, normal_color: Color) -> Self {
        self.normal_color = normal_color;
        self
    }

    pub fn with_selected_color(mut self, selected_color: Color) -> Self {
        self.selected_color = selected_color;
        self
    }

    pub fn with_indicator_color(mut self, indicator_color: Color) -> Self {
        self.indicator_color = indicator_color;
        self
    }

    pub fn with_normal_font(mut self, normal_font: TextFont) -> Self {
        self.normal_font = normal_font;
        self
    }

    pub fn with_selected_font(mut self, selected_font: TextFont) -> Self {
        self.selected_font = selected_font;
        self
    }

    pub fn with_indicator_thickness(mut self, indicator_thickness: f32) -> Self {
        self.indicator_thickness = indicator_thickness.max(1.0);
        self
    }

    /// Currently selected index, always in `[0, len)`.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Always `false`: a selector cannot be constructed without titles.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Changes the selection. No-op when `index` is already selected.
    ///
    /// With `animated`, label restyle and indicator movement run as one timed
    /// transition of [`SELECT_TRANSITION`]; otherwise both snap immediately.
    pub fn select(&mut self, index: usize, animated: bool) {
        assert!(
            index < self.titles.len(),
            "selected index {index} out of bounds for {} titles",
            self.titles.len()
        );
        if index == self.selected {
            return;
        }
        self.pending = Some(PendingSelect {
            previous: self.selected,
            animated,
        });
        self.selected = index;
    }

    /// Replaces all titles and the selection, rebuilding every label and the
    /// indicator. The indicator snaps to the new index with no animation.
    pub fn set_titles<I, S>(&mut self, titles: I, selected: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        assert!(
            !titles.is_empty(),
            "segmented selector requires at least one title"
        );
        assert!(
            selected < titles.len(),
            "selected index {selected} out of bounds for {} titles",
            titles.len()
        );
        let previous = self.selected;
        self.titles = titles;
        self.selected = selected;
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(PendingSelect {
            previous,
            animated: false,
        });
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(selector) = world.entity(entity).get::<SegmentedSelector>().cloned() else {
            return;
        };

        let mut present_indices = HashSet::new();
        let mut indicator_present = false;
        if let Some(children) = world.entity(entity).get::<Children>() {
            for child in children.iter() {
                if let Some(label) = world.entity(child).get::<SelectorLabel>() {
                    if label.generation == selector.generation {
                        present_indices.insert(label.index);
                    }
                } else if let Some(indicator) = world.entity(child).get::<SelectorIndicator>() {
                    indicator_present |= indicator.generation == selector.generation;
                }
            }
        }

        let missing: Vec<usize> = (0..selector.titles.len())
            .filter(|index| !present_indices.contains(index))
            .collect();
        if missing.is_empty() && indicator_present {
            return;
        }

        spawn_selector_segments(
            &mut world.commands(),
            entity,
            &selector,
            missing.into_iter(),
            !indicator_present,
        );
    }
}

/// One tappable titled label in the row.
#[derive(Component, Clone, Copy, Debug)]
pub struct SelectorLabel {
    /// Selector root entity this label belongs to.
    pub selector: Entity,
    /// Logical segment index within the row.
    pub index: usize,
    generation: u32,
}

/// The highlight bar tracking the selected label.
#[derive(Component, Clone, Copy, Debug)]
pub struct SelectorIndicator {
    generation: u32,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SegmentedSelectorSystems {
    EnsureSegments,
    Requests,
    ApplyTransitions,
    SyncVisuals,
}

/// Width of one segment: the track width divided equally across all titles.
pub fn segment_width(track_width: f32, count: usize) -> f32 {
    track_width / count.max(1) as f32
}

/// Indicator offset from the track's left edge: `index * (track_width / count)`.
pub fn indicator_offset_x(index: usize, track_width: f32, count: usize) -> f32 {
    index as f32 * segment_width(track_width, count)
}

/// Segment center in the selector's local, origin-centered coordinates.
pub fn segment_center_x(index: usize, track_width: f32, count: usize) -> f32 {
    -track_width * 0.5
        + indicator_offset_x(index, track_width, count)
        + segment_width(track_width, count) * 0.5
}

fn indicator_center_y(track_height: f32, thickness: f32) -> f32 {
    -track_height * 0.5 + thickness * 0.5
}

fn spawn_selector_segments(
    commands: &mut Commands,
    selector_entity: Entity,
    selector: &SegmentedSelector,
    missing: impl Iterator<Item = usize>,
    spawn_indicator: bool,
) {
    let count = selector.titles.len();
    let track = selector.track_size;
    let width = segment_width(track.x, count);
    let generation = selector.generation;

    commands.entity(selector_entity).with_children(|parent| {
        for index in missing {
            let is_selected = index == selector.selected;
            parent.spawn((
                Name::new(format!("selector_label_{index}")),
                SelectorLabel {
                    selector: selector_entity,
                    index,
                    generation,
                },
                Text2d::new(selector.titles[index].clone()),
                TextColor(if is_selected {
                    selector.selected_color
                } else {
                    selector.normal_color
                }),
                if is_selected {
                    selector.selected_font.clone()
                } else {
                    selector.normal_font.clone()
                },
                Clickable::with_region(
                    vec![SegmentedAction::Select],
                    Vec2::new(width, track.y),
                ),
                Transform::from_xyz(segment_center_x(index, track.x, count), 0.0, LABEL_Z),
            ));
        }

        if spawn_indicator {
            parent.spawn((
                Name::new("selector_indicator"),
                SelectorIndicator { generation },
                Sprite::from_color(
                    selector.indicator_color,
                    Vec2::new(width, selector.indicator_thickness),
                ),
                Transform::from_xyz(
                    segment_center_x(selector.selected, track.x, count),
                    indicator_center_y(track.y, selector.indicator_thickness),
                    INDICATOR_Z,
                ),
            ));
        }
    });
}

/// Despawns stale-generation children and spawns any missing segments.
pub fn ensure_selector_segments(
    mut commands: Commands,
    selector_query: Query<(Entity, &SegmentedSelector, Option<&Children>)>,
    label_query: Query<&SelectorLabel>,
    indicator_query: Query<&SelectorIndicator>,
) {
    for (selector_entity, selector, children) in selector_query.iter() {
        let mut present_indices = HashSet::new();
        let mut indicator_present = false;

        if let Some(children) = children {
            for child in children.iter() {
                if let Ok(label) = label_query.get(child) {
                    if label.generation == selector.generation
                        && label.index < selector.titles.len()
                    {
                        present_indices.insert(label.index);
                    } else {
                        commands.entity(child).despawn();
                    }
                } else if let Ok(indicator) = indicator_query.get(child) {
                    if indicator.generation == selector.generation && !indicator_present {
                        indicator_present = true;
                    } else {
                        commands.entity(child).despawn();
                    }
                }
            }
        }

        let missing: Vec<usize> = (0..selector.titles.len())
            .filter(|index| !present_indices.contains(index))
            .collect();
        if missing.is_empty() && indicator_present {
            continue;
        }

        spawn_selector_segments(
            &mut commands,
            selector_entity,
            selector,
            missing.into_iter(),
            !indicator_present,
        );
    }
}

/// Collects clicked label indices keyed by selector root entity.
///
/// When multiple clicked labels exist for one root in a frame, the highest
/// entity-rank winner is chosen deterministically.
pub fn collect_clicked_label_indices(
    label_query: &Query<(Entity, &SelectorLabel, &Clickable<SegmentedAction>)>,
) -> HashMap<Entity, usize> {
    let mut clicked_by_selector: HashMap<Entity, (usize, u64)> = HashMap::new();
    for (entity, label, clickable) in label_query.iter() {
        if !clickable.triggered || !clickable.actions.contains(&SegmentedAction::Select) {
            continue;
        }
        let rank = entity.to_bits();
        match clicked_by_selector.get_mut(&label.selector) {
            Some((selected_index, selected_rank)) => {
                if rank >= *selected_rank {
                    *selected_index = label.index;
                    *selected_rank = rank;
                }
            }
            None => {
                clicked_by_selector.insert(label.selector, (label.index, rank));
            }
        }
    }
    clicked_by_selector
        .into_iter()
        .map(|(selector, (index, _))| (selector, index))
        .collect()
}

/// Turns label clicks into selection changes, honoring the veto gate.
///
/// Clicks on the already-selected label are dropped without consulting the
/// gate; a differing click consults it exactly once.
pub fn handle_selection_requests(
    mut selector_query: Query<(&mut SegmentedSelector, Option<&SelectionGate>)>,
    label_query: Query<(Entity, &SelectorLabel, &Clickable<SegmentedAction>)>,
) {
    for (selector_entity, index) in collect_clicked_label_indices(&label_query) {
        let Ok((mut selector, gate)) = selector_query.get_mut(selector_entity) else {
            continue;
        };
        // Stale click raced a rebuild; not a caller error.
        if index >= selector.len() {
            continue;
        }
        if index == selector.selected_index() {
            continue;
        }
        if gate.is_some_and(|gate| !gate.0.should_select(selector_entity, index)) {
            continue;
        }
        selector.select(index, true);
    }
}

/// Applies a pending selection change and reports it.
///
/// Animated changes restyle only the outgoing and incoming labels and move
/// the indicator through timed transitions; snapped changes leave the work to
/// `sync_selector_visuals`. In-flight transitions are stripped first so a
/// rapid re-selection never blends two targets.
pub fn apply_selection_transitions(
    mut commands: Commands,
    mut selector_query: Query<
        (Entity, &mut SegmentedSelector, &Children),
        Changed<SegmentedSelector>,
    >,
    label_query: Query<&SelectorLabel>,
    indicator_query: Query<(), With<SelectorIndicator>>,
    mut selection_changed: MessageWriter<SelectionChanged>,
) {
    for (selector_entity, mut selector, children) in selector_query.iter_mut() {
        if selector.pending.is_none() {
            continue;
        }
        let Some(pending) = selector.pending.take() else {
            continue;
        };

        for child in children.iter() {
            commands
                .entity(child)
                .remove::<(ColorTranslation, PointToPointTranslation)>();
        }

        if pending.animated {
            let count = selector.titles.len();
            let track = selector.track_size;
            for child in children.iter() {
                if let Ok(label) = label_query.get(child) {
                    if label.index == selector.selected {
                        commands.entity(child).insert((
                            selector.selected_font.clone(),
                            ColorTranslation::new(selector.selected_color, SELECT_TRANSITION),
                        ));
                    } else if label.index == pending.previous {
                        commands.entity(child).insert((
                            selector.normal_font.clone(),
                            ColorTranslation::new(selector.normal_color, SELECT_TRANSITION),
                        ));
                    }
                } else if indicator_query.get(child).is_ok() {
                    let target = Vec3::new(
                        segment_center_x(selector.selected, track.x, count),
                        indicator_center_y(track.y, selector.indicator_thickness),
                        INDICATOR_Z,
                    );
                    commands
                        .entity(child)
                        .insert(PointToPointTranslation::new(target, SELECT_TRANSITION));
                }
            }
        }

        selection_changed.write(SelectionChanged {
            selector: selector_entity,
            index: selector.selected,
        });
    }
}

/// Re-marks a selector whose children just finished (or lost) a timed
/// transition, so the next `sync_selector_visuals` pass reapplies current
/// styling to them. Without this, a style edit landing mid-transition would
/// never reach the animating entities: the sync queries skip them while the
/// transition components are present, and those components remove themselves
/// on completion.
pub fn resync_finished_transitions(
    mut removed_colors: RemovedComponents<ColorTranslation>,
    mut removed_motions: RemovedComponents<PointToPointTranslation>,
    child_query: Query<&ChildOf>,
    mut selector_query: Query<&mut SegmentedSelector>,
) {
    for entity in removed_colors.read().chain(removed_motions.read()) {
        let Ok(child_of) = child_query.get(entity) else {
            continue;
        };
        if let Ok(mut selector) = selector_query.get_mut(child_of.parent()) {
            selector.set_changed();
        }
    }
}

/// Reapplies styling and geometry to non-animating children of changed
/// selectors. Covers style property edits and non-animated selection snaps;
/// entities mid-transition are picked up by `resync_finished_transitions`
/// once their transition completes.
pub fn sync_selector_visuals(
    selector_query: Query<(&SegmentedSelector, &Children), Changed<SegmentedSelector>>,
    mut label_query: Query<
        (
            &SelectorLabel,
            &mut TextColor,
            &mut TextFont,
            &mut Transform,
            &mut Clickable<SegmentedAction>,
        ),
        (Without<ColorTranslation>, Without<SelectorIndicator>),
    >,
    mut indicator_query: Query<
        (&SelectorIndicator, &mut Sprite, &mut Transform),
        (Without<SelectorLabel>, Without<PointToPointTranslation>),
    >,
) {
    for (selector, children) in selector_query.iter() {
        let count = selector.titles.len();
        let width = segment_width(selector.track_size.x, count);

        for child in children.iter() {
            if let Ok((label, mut color, mut font, mut transform, mut clickable)) =
                label_query.get_mut(child)
            {
                let is_selected = label.index == selector.selected;
                color.0 = if is_selected {
                    selector.selected_color
                } else {
                    selector.normal_color
                };
                *font = if is_selected {
                    selector.selected_font.clone()
                } else {
                    selector.normal_font.clone()
                };
                transform.translation.x =
                    segment_center_x(label.index, selector.track_size.x, count);
                clickable.region = Some(Vec2::new(width, selector.track_size.y));
            } else if let Ok((_, mut sprite, mut transform)) = indicator_query.get_mut(child) {
                sprite.color = selector.indicator_color;
                sprite.custom_size = Some(Vec2::new(width, selector.indicator_thickness));
                transform.translation.x =
                    segment_center_x(selector.selected, selector.track_size.x, count);
                transform.translation.y =
                    indicator_center_y(selector.track_size.y, selector.indicator_thickness);
            }
        }
    }
}

pub struct SegmentedSelectorPlugin;

impl Plugin for SegmentedSelectorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<InteractionPlugin>() {
            app.add_plugins(InteractionPlugin);
        }
        if !app.is_plugin_added::<MotionPlugin>() {
            app.add_plugins(MotionPlugin);
        }
        if !app.is_plugin_added::<ColorsPlugin>() {
            app.add_plugins(ColorsPlugin);
        }
        register_pointer_systems::<SegmentedAction>(app);

        app.add_message::<SelectionChanged>()
            .configure_sets(
                Update,
                (
                    SegmentedSelectorSystems::EnsureSegments,
                    SegmentedSelectorSystems::Requests,
                    SegmentedSelectorSystems::ApplyTransitions,
                    SegmentedSelectorSystems::SyncVisuals,
                )
                    .chain()
                    .after(InteractionSystem::Clickable),
            )
            .add_systems(
                Update,
                ensure_selector_segments.in_set(SegmentedSelectorSystems::EnsureSegments),
            )
            .add_systems(
                Update,
                handle_selection_requests.in_set(SegmentedSelectorSystems::Requests),
            )
            .add_systems(
                Update,
                apply_selection_transitions.in_set(SegmentedSelectorSystems::ApplyTransitions),
            )
            .add_systems(
                Update,
                (resync_finished_transitions, sync_selector_visuals)
                    .chain()
                    .in_set(SegmentedSelectorSystems::SyncVisuals),
            );
    }
}
