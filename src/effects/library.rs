//! Ready-made effects over scene drawables.

use crate::effects::effect::Effect;
use crate::effects::transition::Transition;
use crate::foundation::core::Rect;
use crate::foundation::error::GeomotionResult;
use crate::render::backend::DrawableId;
use crate::render::delegates::PartiallyRenderable;
use crate::render::visual::Visual;
use crate::scene::stage::Scene;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Fade `target` in; reverses to a fade out that keeps the drawable.
pub fn fade_in(scene: &Scene, target: DrawableId) -> Effect {
    Effect::new(scene, "fade_in", move |_| Ok(Transition::FadeIn { target })).with_reverse(
        move |s| {
            Ok(Transition::FadeOut {
                target,
                from: s.opacity(target)?,
                remove: false,
            })
        },
    )
}

/// Fade `target` out from its current opacity, optionally removing it.
///
/// Only a kept drawable can be faded back in by [`Effect::clear`].
pub fn fade_out(scene: &Scene, target: DrawableId, remove: bool) -> Effect {
    let e = Effect::new(scene, "fade_out", move |s| {
        Ok(Transition::FadeOut {
            target,
            from: s.opacity(target)?,
            remove,
        })
    });
    if remove {
        e
    } else {
        e.with_reverse(move |_| Ok(Transition::FadeIn { target }))
    }
}

/// Draw the outline of `target` progressively; reverses to an unwrite.
pub fn write(scene: &Scene, target: DrawableId) -> Effect {
    Effect::new(scene, "write", move |_| Ok(Transition::Write { target })).with_reverse(
        move |_| {
            Ok(Transition::Unwrite {
                target,
                remove: false,
            })
        },
    )
}

/// Erase the outline of `target`, optionally removing it.
pub fn unwrite(scene: &Scene, target: DrawableId, remove: bool) -> Effect {
    Effect::new(scene, "unwrite", move |_| {
        Ok(Transition::Unwrite { target, remove })
    })
}

/// Pulse `target` to `scale` in the theme accent colour and back.
pub fn indicate(scene: &Scene, target: DrawableId, scale: f64) -> Effect {
    Effect::new(scene, "indicate", move |s| {
        Ok(Transition::Indicate {
            target,
            base: s.visual(target)?,
            scale,
            color: s.theme().accent,
        })
    })
}

/// Morph `target` into `to`; reverses to the visual it had when built.
pub fn transform_to(scene: &Scene, target: DrawableId, to: Visual) -> Effect {
    let before: Rc<RefCell<Option<Visual>>> = Rc::default();
    let captured = Rc::clone(&before);
    Effect::new(scene, "transform", move |s| {
        let from = s.visual(target)?;
        *captured.borrow_mut() = Some(from.clone());
        Ok(Transition::Morph {
            target,
            from,
            to: to.clone(),
        })
    })
    .with_reverse(move |s| {
        Ok(match before.borrow().clone() {
            Some(original) => Transition::Morph {
                target,
                from: s.visual(target)?,
                to: original,
            },
            None => Transition::Wait,
        })
    })
}

/// Move the camera to `frame`; reverses to the framing in place when built.
pub fn move_camera(scene: &Scene, frame: Rect) -> Effect {
    let prior: Rc<Cell<Option<Rect>>> = Rc::default();
    let captured = Rc::clone(&prior);
    Effect::new(scene, "move_camera", move |s| {
        let from = s.camera();
        captured.set(Some(from));
        Ok(Transition::Camera { from, to: frame })
    })
    .with_reverse(move |s| {
        Ok(match prior.get() {
            Some(to) => Transition::Camera {
                from: s.camera(),
                to,
            },
            None => Transition::Wait,
        })
    })
}

/// Copy the `[from, to]` part of `source`'s outline and morph the copy onto `target`.
///
/// Each build allocates a temporary drawable for the copy; the reverse fades out and removes
/// every copy allocated so far.
pub fn copy_subpart_onto(
    scene: &Scene,
    source: Rc<dyn PartiallyRenderable>,
    from: f64,
    to: f64,
    target: DrawableId,
) -> Effect {
    let copies: Rc<RefCell<Vec<DrawableId>>> = Rc::default();
    let allocated = Rc::clone(&copies);
    Effect::new(scene, "copy_subpart", move |s| {
        let part = source.partial_visual(from, to)?;
        let onto = s.visual(target)?;
        let id = s.add(&part)?;
        allocated.borrow_mut().push(id);
        Ok(Transition::Morph {
            target: id,
            from: part,
            to: onto,
        })
    })
    .with_reverse(move |s| temporary_fade(s, copies.take()))
}

fn temporary_fade(scene: &Scene, ids: Vec<DrawableId>) -> GeomotionResult<Transition> {
    let mut members = ids
        .into_iter()
        .filter(|id| scene.contains(*id))
        .map(|target| {
            Ok(Transition::FadeOut {
                target,
                from: scene.opacity(target)?,
                remove: true,
            })
        })
        .collect::<GeomotionResult<Vec<_>>>()?;
    Ok(match members.len() {
        0 => Transition::Wait,
        1 => members.remove(0),
        _ => Transition::parallel(members),
    })
}

/// Let time pass.
pub fn wait(scene: &Scene) -> Effect {
    Effect::new(scene, "wait", |_| Ok(Transition::Wait))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/library.rs"]
mod tests;
