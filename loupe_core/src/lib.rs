// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and session logic for touch-selection magnifier overlays.
//!
//! `loupe_core` implements the magnifying loupe that appears above a text
//! caret or selection handle while the user drags it: a pure geometry
//! engine that decides where the loupe sits and what it samples, and a
//! session controller that owns the overlay's scene nodes and glides them
//! between positions. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is organized around a show/tick loop that the embedding
//! toolkit drives from its touch-selection handler and compositor clock:
//!
//! ```text
//!   touch-selection handler
//!       │ show(context, focus bound)
//!       ▼
//!   MagnifierSession ──► geometry::overlay_layout() ──► scene mutations
//!       │ tick(now)                                          │
//!       ▼                                                    ▼
//!   BoundsAnimator ──► scene mutations ──► SceneStore::evaluate()
//!                                                │
//!                                                ▼
//!                                  SceneChanges ──► Presenter::apply()
//! ```
//!
//! **[`geometry`]** — Pure placement math: the magnified source region,
//! the overlay layer bounds (lifted above the focus rect, outset for the
//! shadow, fitted into the host surface), and the backdrop sampling
//! offset. Stateless and deterministic.
//!
//! **[`session`]** — The Idle/Active magnifier session. The first
//! [`show`](session::MagnifierSession::show) builds the overlay node
//! bundle and snaps it into place; subsequent shows glide it toward the
//! new placement; [`close`](session::MagnifierSession::close) dismantles
//! the bundle as one unit.
//!
//! **[`scene`]** — Struct-of-arrays overlay node store with generational
//! handles. Properties (bounds, fill, corner radius, backdrop, painter)
//! are set by the session; absolute bounds are computed by evaluation.
//!
//! **[`animate`]** — Tick-driven bounds transitions with explicit
//! retargeting policies (snap vs. glide-with-preemption).
//!
//! **[`paint`]** — The [`Canvas`](paint::Canvas) and
//! [`PaintDelegate`](paint::PaintDelegate) seams, plus the border/shadow
//! painter registered on the overlay's border node.
//!
//! **[`host`]** — The [`OverlayHost`](host::OverlayHost) trait that
//! resolves a source context to the surface hosting the overlay and maps
//! coordinates into it.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) trait that
//! platform backends implement to apply scene changes to native trees.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for session instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animate;
pub mod backend;
pub mod color;
pub mod dirty;
pub mod geometry;
pub mod host;
pub mod paint;
pub mod scene;
pub mod session;
pub mod shadow;
pub mod time;
pub mod trace;
