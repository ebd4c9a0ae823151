// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The overlay scene is headless: `loupe_core` owns the data model,
//! geometry, and session logic, and platform backends mirror the scene
//! into whatever actually draws (a compositor layer tree, DOM elements, a
//! GPU display list). Backends depend on `loupe_core` and implement
//! [`Presenter`]; application code wires both together in its frame loop.

use crate::scene::{SceneChanges, SceneStore};

/// Applies evaluated scene changes to a platform-native presentation
/// tree.
///
/// Both native-layer and test-double presenters implement this trait,
/// enabling generic frame loops and assertions on what actually got
/// applied.
///
/// # Frame loop pseudocode
///
/// A typical embedder wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_selection_drag(context: ContextId, bound: FocusBound) {
///     session.show(&mut scene, &host, context, bound);
///     presenter.apply(&scene, &scene.evaluate());
/// }
///
/// fn on_frame(now: Timestamp) {
///     // Advance any in-flight glide toward its target.
///     session.tick(&mut scene, now);
///     presenter.apply(&scene, &scene.evaluate());
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`SceneChanges`] to the backing presentation
    /// tree, reading current property values from `scene` as needed.
    fn apply(&mut self, scene: &SceneStore, changes: &SceneChanges);
}
