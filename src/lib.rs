//! Segmented selector widget for Bevy.
//!
//! A horizontal row of tappable text labels with an indicator bar that tracks
//! the currently selected one. Hosts spawn a [`SegmentedSelector`] (optionally
//! alongside a [`SelectionGate`] veto hook), add [`SegmentedSelectorPlugin`],
//! and listen for [`SelectionChanged`] messages.
//!
//! ```no_run
//! use bevy::prelude::*;
//! use segmented_selector::{SegmentedSelector, SegmentedSelectorPlugin};
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(SegmentedSelectorPlugin)
//!     .add_systems(Startup, |mut commands: Commands| {
//!         commands.spawn(Camera2d);
//!         commands.spawn(SegmentedSelector::new(["hourly", "daily", "weekly"], 0));
//!     })
//!     .run();
//! ```
pub mod systems;

pub use systems::ui::{
    config::SegmentedSelectorConfig,
    segmented::{
        indicator_offset_x, segment_center_x, segment_width, SegmentedAction, SegmentedSelector,
        SegmentedSelectorPlugin, SegmentedSelectorSystems, SelectionChanged, SelectionGate,
        SelectionObserver, SelectorIndicator, SelectorLabel, SELECT_TRANSITION,
    },
};
