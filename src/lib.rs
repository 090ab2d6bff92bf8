//! Geomotion is a reactive geometry and animation-scheduling engine for scripted math
//! visualizations.
//!
//! Authoring code builds geometric models (points, lines, vectors, polygons, conics, parameters)
//! that keep each other consistent under mutation, binds them to render delegates through a
//! [`Registry`], and animates them with reversible [`Effect`]s played by a [`Scheduler`],
//! optionally paced by narrated speech.
//!
//! # Data flow
//!
//! 1. **Models**: leaf [`Model`]s hold state; [`Derived`] models recompute in place when a source
//!    notifies, then notify their own subscribers.
//! 2. **Registry**: each registered model morphs its drawable into the delegate's new
//!    [`Visual`] on every notification.
//! 3. **Effects**: a forward/reverse [`Transition`] pair with a requested duration and optional
//!    narration.
//! 4. **Scheduler**: parallel, staggered, sequential or bookmark-paced playback against a
//!    [`Scene`], which steps frames on a [`RenderBackend`].
//!
//! Everything runs on the calling thread. Playback is a blocking call and there is no
//! cancellation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod foundation;
mod model;
mod narration;
mod render;
mod scene;

pub use animation::ease::Ease;
pub use animation::lerp::Lerp;
pub use effects::effect::{Effect, EffectState, TransitionBuilder, compose};
pub use effects::library::{
    copy_subpart_onto, fade_in, fade_out, indicate, move_camera, transform_to, unwrite, wait,
    write,
};
pub use effects::scheduler::{PlayOpts, Scheduler};
pub use effects::transition::{Transition, TweenDriver};
pub use foundation::core::{
    Affine, BezPath, Circle, Color, Line, Point, PointInput, Rect, Seconds, Vec2,
};
pub use foundation::error::{GeomotionError, GeomotionResult};
pub use foundation::math::{
    Complex, Conic, ConicKind, angle_sweep, circle_line_intersections, line_line_intersection,
    normalize,
};
pub use model::derived::Derived;
pub use model::geometry::{
    Angle, Vector, angle, circle, circle_line_intersection, complex_quotient, ellipse_from_foci,
    hyperbola_from_foci, line_from_points, line_intersection, midpoint, point, vector_from_points,
};
pub use model::observable::{
    Model, ModelId, Observable, Observe, Propagate, SubscriptionId, WeakModel,
};
pub use model::parameter::Parameter;
pub use model::polygon::{Polygon, regular_polygon};
pub use narration::bookmarks::{
    Bookmark, MarkedText, bookmark_label, bookmark_marker, parse_bookmarks,
};
pub use narration::speech::{NarrationTrack, SpeechClip, SpeechSynthesizer, WordRateSynthesizer};
pub use render::backend::{
    DrawableId, DrawableRecord, NarrationRecord, PlayRequest, RecordingBackend, RenderBackend,
    Window,
};
pub use render::delegates::{
    AngleDelegate, CircleDelegate, ConicDelegate, Delegate, Entrance, LabelDelegate,
    PartiallyRenderable, PointDelegate, PointSet, PolygonDelegate, SegmentDelegate,
    VectorDelegate,
};
pub use render::visual::{Style, Visual};
pub use scene::config::{SceneConfig, Theme};
pub use scene::registry::{BoundDelegate, RegisterOpts, Registry};
pub use scene::stage::{Scene, SceneBuilder};
